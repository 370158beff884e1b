//! Wiring errors (load time) and pipeline errors (run time).

use thiserror::Error;

use crate::types::ContainerId;

/// Configuration error raised while building a graph, router, or app.
///
/// Wiring errors are fatal: they surface before the first request and
/// never per request.
#[derive(Error, Debug)]
pub enum WiringError {
  #[error("route already registered for pattern: {pattern}")]
  DuplicateRoute { pattern: String },

  #[error("`**` must be the last segment in pattern: {pattern}")]
  TrailingAfterGlob { pattern: String },

  #[error("invalid segment {segment:?} in pattern {pattern}: {detail}")]
  BadSegment {
    pattern: String,
    segment: String,
    detail: String,
  },

  #[error("{container}: {detail}")]
  EdgeShape { container: String, detail: String },

  #[error("{container} is wired as a fuse but is a {kind}")]
  NotAFuse {
    container: String,
    kind: &'static str,
  },

  #[error("{container} is wired as an exception handler but is a {kind}")]
  NotAHandler {
    container: String,
    kind: &'static str,
  },

  #[error("cycle through {container}")]
  Cycle { container: String },

  #[error("{container} ({kind}) may only appear in the {phase} chain")]
  MisplacedGlobal {
    container: String,
    kind: &'static str,
    phase: &'static str,
  },

  #[error("container id {0} is out of range")]
  UnknownContainer(ContainerId),
}

/// Runtime error carried through one dispatch branch.
///
/// Cloneable so recovery can present the original error to each fuse and
/// handler in turn and re-raise it unchanged when none resolves.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
  /// Domain failure carrying the HTTP status the fallback should use.
  #[error("{status}: {message}")]
  Status { status: u16, message: String },

  /// The routing trie had no candidate for the remaining path.
  #[error("no route matches {path:?}")]
  RouteNotFound { path: String },

  /// A node operation failed internally.
  #[error("{container}: {message}")]
  Node { container: String, message: String },

  /// A replicator returned a copy count different from its lane count.
  #[error("{container}: produced {produced} copies for {expected} lanes")]
  NonstandardOutput {
    container: String,
    expected: usize,
    produced: usize,
  },

  /// A diverter or replicator was dispatched with no children.
  #[error("{container}: {kind} has no children")]
  UnexpectedTopology {
    container: String,
    kind: &'static str,
  },

  /// A diverter chose a container outside its own child list.
  #[error("{container}: selected child is not in the child list")]
  ForeignChild { container: String },

  /// A responder ran on a lineage that already carries a response.
  #[error("{container}: response already exists for this lineage")]
  ResponseExists { container: String },
}

impl PipelineError {
  /// Domain error with an explicit HTTP status.
  pub fn status(status: u16, message: impl Into<String>) -> Self {
    PipelineError::Status {
      status,
      message: message.into(),
    }
  }

  /// Internal node failure attributed to `container`.
  pub fn node(container: impl Into<String>, message: impl Into<String>) -> Self {
    PipelineError::Node {
      container: container.into(),
      message: message.into(),
    }
  }

  /// Status the default fallback maps this error to.
  pub fn fallback_status(&self) -> u16 {
    match self {
      PipelineError::Status { status, .. } => *status,
      PipelineError::RouteNotFound { .. } => 404,
      _ => 500,
    }
  }
}
