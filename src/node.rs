//! Node taxonomy: one capability trait per kind plus the closed sum type
//! the dispatcher matches on.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::PipelineError;
use crate::types::{ContainerId, Request, Response};

/// Transforms or inspects the request on the way in.
#[async_trait]
pub trait RequestHandler: Send + Sync {
  async fn handle(&self, req: &mut Request) -> Result<(), PipelineError>;
}

/// Picks exactly one child container to continue into.
#[async_trait]
pub trait Diverter: Send + Sync {
  /// Must return a member of `children`.
  async fn shunt(
    &self,
    req: &mut Request,
    children: &[ContainerId],
  ) -> Result<ContainerId, PipelineError>;
}

/// Produces one request copy per lane; the only fan-out primitive.
#[async_trait]
pub trait Replicator: Send + Sync {
  /// Must return exactly `lanes` requests. The first continues the
  /// synchronous branch; the rest run detached.
  async fn copy(&self, req: &Request, lanes: usize) -> Result<Vec<Request>, PipelineError>;
}

/// Originates the response for a lineage.
#[async_trait]
pub trait Responder: Send + Sync {
  async fn respond(&self, req: &mut Request) -> Result<Response, PipelineError>;
}

/// Post-processes an existing response.
#[async_trait]
pub trait ResponseHandler: Send + Sync {
  async fn handle(&self, res: &mut Response) -> Result<(), PipelineError>;
}

/// Turns a pending error into a response, or declines.
#[async_trait]
pub trait ExceptionHandler: Send + Sync {
  /// `Ok(Some(res))` accepts and installs `res`; `Ok(None)` declines so
  /// the next recovery candidate is tried.
  async fn catch(
    &self,
    err: &PipelineError,
    req: &Request,
    res: Option<&Response>,
  ) -> Result<Option<Response>, PipelineError>;
}

/// Repairs the request after an error so traversal can resume, or
/// declines.
#[async_trait]
pub trait Fuse: Send + Sync {
  /// `Ok(Some(patched))` accepts: the branch continues from this fuse
  /// container's `next` with the patched request. `Ok(None)` declines.
  async fn fuse(
    &self,
    err: &PipelineError,
    req: &Request,
  ) -> Result<Option<Request>, PipelineError>;
}

/// A node instance tagged with its kind.
///
/// The taxonomy is closed: dispatch is an exhaustive match, so adding a
/// kind means adding a variant and its dispatch arm, not a runtime
/// registration.
#[derive(Clone)]
pub enum Node {
  Handler(Arc<dyn RequestHandler>),
  Diverter(Arc<dyn Diverter>),
  Replicator(Arc<dyn Replicator>),
  Responder(Arc<dyn Responder>),
  ResponseHandler(Arc<dyn ResponseHandler>),
  ExceptionHandler(Arc<dyn ExceptionHandler>),
  Fuse(Arc<dyn Fuse>),
  /// Request handler restricted to the app's pre chain.
  GlobalPre(Arc<dyn RequestHandler>),
  /// Response handler restricted to the app's post chain.
  GlobalPost(Arc<dyn ResponseHandler>),
}

impl Node {
  pub fn handler(node: impl RequestHandler + 'static) -> Self {
    Node::Handler(Arc::new(node))
  }

  pub fn diverter(node: impl Diverter + 'static) -> Self {
    Node::Diverter(Arc::new(node))
  }

  pub fn replicator(node: impl Replicator + 'static) -> Self {
    Node::Replicator(Arc::new(node))
  }

  pub fn responder(node: impl Responder + 'static) -> Self {
    Node::Responder(Arc::new(node))
  }

  pub fn response_handler(node: impl ResponseHandler + 'static) -> Self {
    Node::ResponseHandler(Arc::new(node))
  }

  pub fn exception_handler(node: impl ExceptionHandler + 'static) -> Self {
    Node::ExceptionHandler(Arc::new(node))
  }

  pub fn fuse(node: impl Fuse + 'static) -> Self {
    Node::Fuse(Arc::new(node))
  }

  pub fn global_pre(node: impl RequestHandler + 'static) -> Self {
    Node::GlobalPre(Arc::new(node))
  }

  pub fn global_post(node: impl ResponseHandler + 'static) -> Self {
    Node::GlobalPost(Arc::new(node))
  }

  /// Kind tag used in traces, logs, and wiring errors.
  pub fn kind(&self) -> &'static str {
    match self {
      Node::Handler(_) => "handler",
      Node::Diverter(_) => "diverter",
      Node::Replicator(_) => "replicator",
      Node::Responder(_) => "responder",
      Node::ResponseHandler(_) => "response-handler",
      Node::ExceptionHandler(_) => "exception-handler",
      Node::Fuse(_) => "fuse",
      Node::GlobalPre(_) => "global-pre",
      Node::GlobalPost(_) => "global-post",
    }
  }

  /// True for kinds that fan out over [`Edge::Many`](crate::types::Edge).
  pub fn fans_out(&self) -> bool {
    matches!(self, Node::Diverter(_) | Node::Replicator(_))
  }
}

impl fmt::Debug for Node {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.kind())
  }
}
