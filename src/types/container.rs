//! Graph containers: arena ids, edges, and the per-node wiring record.

use std::fmt;

use crate::node::Node;

/// Arena index of a container within its [`Graph`](crate::graph::Graph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(pub(crate) usize);

impl ContainerId {
  pub(crate) fn index(self) -> usize {
    self.0
  }
}

impl fmt::Display for ContainerId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

/// Outgoing wiring of a container.
///
/// Diverters and replicators carry `Many`; every other kind carries
/// `None` or `Single`. The builder enforces the shape.
#[derive(Debug, Clone, Default)]
pub enum Edge {
  /// Terminal: the branch ends after the node runs.
  #[default]
  None,
  /// Linear continuation.
  Single(ContainerId),
  /// Candidate children for diverters and replication lanes.
  Many(Vec<ContainerId>),
}

impl Edge {
  /// Continuation for single-successor kinds.
  pub fn follow(&self) -> Option<ContainerId> {
    match self {
      Edge::Single(id) => Some(*id),
      _ => None,
    }
  }

  /// Child list for diverters and replicators.
  pub fn fan(&self) -> &[ContainerId] {
    match self {
      Edge::Many(ids) => ids,
      _ => &[],
    }
  }
}

/// One graph cell: an identified node instance plus its wiring.
#[derive(Debug, Clone)]
pub struct Container {
  /// Module the node was resolved from (loader-facing identity).
  pub module: String,
  /// Node name within its module.
  pub name: String,
  /// The resolved node instance.
  pub node: Node,
  /// Outgoing edge(s).
  pub next: Edge,
  /// Ordered local fuses, tried first during recovery.
  pub fuses: Vec<ContainerId>,
  /// Ordered local exception handlers, tried after the fuses.
  pub handlers: Vec<ContainerId>,
}

impl Container {
  /// `module/name` label used in traces, logs, and errors.
  pub fn label(&self) -> String {
    format!("{}/{}", self.module, self.name)
  }
}
