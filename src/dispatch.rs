//! Dispatch engine: recursive kind-directed traversal with replication
//! and two-tier recovery.

use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::{debug, instrument, trace};

use crate::error::PipelineError;
use crate::graph::Graph;
use crate::node::Node;
use crate::types::{ContainerId, RequestContext};

/// How one traversal branch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  /// The branch ran to its terminal edge.
  Ran,
  /// A fuse or exception handler declined; the branch stopped early.
  Declined,
}

/// What a visited node asks the engine to do next.
enum Step {
  /// Continue into the given container, or stop cleanly on `None`.
  Advance(Option<ContainerId>),
  /// Stop this branch and report [`Outcome::Declined`].
  Decline,
}

/// The traversal engine over one immutable graph.
///
/// Cloning is cheap and shares the graph; detached replica branches run
/// on their own clone.
#[derive(Debug, Clone)]
pub struct Pipeline {
  graph: Arc<Graph>,
}

impl Pipeline {
  pub fn new(graph: Graph) -> Self {
    Self {
      graph: Arc::new(graph),
    }
  }

  pub fn graph(&self) -> &Graph {
    &self.graph
  }

  /// Runs one branch from `entry` to its terminal edge.
  ///
  /// An error that no recovery list on the path resolves surfaces here
  /// unchanged.
  #[instrument(level = "trace", skip(self, ctx), fields(entry = %entry))]
  pub async fn run(
    &self,
    ctx: &mut RequestContext,
    entry: ContainerId,
  ) -> Result<Outcome, PipelineError> {
    self.dispatch(ctx, Some(entry)).await
  }

  /// One traversal frame: visit the container, then recurse along the
  /// chosen edge. Each frame offers errors from itself or anywhere
  /// downstream to its own recovery lists, so recovery climbs the
  /// traversal path bottom-up.
  fn dispatch<'a>(
    &'a self,
    ctx: &'a mut RequestContext,
    at: Option<ContainerId>,
  ) -> BoxFuture<'a, Result<Outcome, PipelineError>> {
    Box::pin(async move {
      let Some(id) = at else {
        return Ok(Outcome::Ran);
      };
      let container = self.graph.container(id);
      ctx.request.trace().push(container.label());
      trace!(container = %container.label(), kind = container.node.kind(), "dispatching");
      let step = match self.visit(ctx, id).await {
        Ok(step) => step,
        Err(err) => return self.recover(ctx, id, err).await,
      };
      match step {
        Step::Decline => Ok(Outcome::Declined),
        Step::Advance(next) => match self.dispatch(ctx, next).await {
          Err(err) => self.recover(ctx, id, err).await,
          done => done,
        },
      }
    })
  }

  /// Runs one node and translates its result into a [`Step`].
  async fn visit(&self, ctx: &mut RequestContext, at: ContainerId) -> Result<Step, PipelineError> {
    let container = self.graph.container(at);
    match &container.node {
      Node::Handler(handler) | Node::GlobalPre(handler) => {
        handler.handle(&mut ctx.request).await?;
        Ok(Step::Advance(container.next.follow()))
      }

      Node::Diverter(diverter) => {
        let children = container.next.fan();
        if children.is_empty() {
          return Err(PipelineError::UnexpectedTopology {
            container: container.label(),
            kind: container.node.kind(),
          });
        }
        let chosen = diverter.shunt(&mut ctx.request, children).await?;
        if !children.contains(&chosen) {
          return Err(PipelineError::ForeignChild {
            container: container.label(),
          });
        }
        Ok(Step::Advance(Some(chosen)))
      }

      Node::Replicator(replicator) => {
        let lanes = container.next.fan();
        if lanes.is_empty() {
          return Err(PipelineError::UnexpectedTopology {
            container: container.label(),
            kind: container.node.kind(),
          });
        }
        let mut copies = replicator.copy(&ctx.request, lanes.len()).await?;
        if copies.len() != lanes.len() {
          return Err(PipelineError::NonstandardOutput {
            container: container.label(),
            expected: lanes.len(),
            produced: copies.len(),
          });
        }
        // Lane 0 stays on this branch; the rest run detached and are
        // never joined.
        let primary = copies.remove(0);
        for (replica, lane) in copies.into_iter().zip(lanes[1..].iter().copied()) {
          self.spawn_detached(ctx.fork(replica), lane);
        }
        ctx.request = primary;
        Ok(Step::Advance(Some(lanes[0])))
      }

      Node::Responder(responder) => {
        if ctx.response.is_some() {
          return Err(PipelineError::ResponseExists {
            container: container.label(),
          });
        }
        let response = responder.respond(&mut ctx.request).await?;
        ctx.response = Some(response);
        Ok(Step::Advance(container.next.follow()))
      }

      Node::ResponseHandler(handler) | Node::GlobalPost(handler) => {
        if let Some(response) = ctx.response.as_mut() {
          handler.handle(response).await?;
        }
        Ok(Step::Advance(container.next.follow()))
      }

      Node::ExceptionHandler(handler) => {
        let Some(err) = ctx.error.clone() else {
          return Ok(Step::Advance(container.next.follow()));
        };
        match handler.catch(&err, &ctx.request, ctx.response.as_ref()).await? {
          Some(response) => {
            ctx.response = Some(response);
            ctx.error = None;
            Ok(Step::Advance(container.next.follow()))
          }
          None => Ok(Step::Decline),
        }
      }

      Node::Fuse(fuse) => {
        let Some(err) = ctx.error.clone() else {
          return Ok(Step::Advance(container.next.follow()));
        };
        match fuse.fuse(&err, &ctx.request).await? {
          Some(patched) => {
            ctx.request = patched;
            ctx.error = None;
            Ok(Step::Advance(container.next.follow()))
          }
          None => Ok(Step::Decline),
        }
      }
    }
  }

  /// Offers `err` to the container's fuses, then its exception handlers,
  /// in wiring order. A candidate resolves only by running to completion
  /// with the pending error consumed; errors raised by a candidate are
  /// logged and discarded. When every candidate declines, the original
  /// error re-raises unchanged.
  async fn recover(
    &self,
    ctx: &mut RequestContext,
    at: ContainerId,
    err: PipelineError,
  ) -> Result<Outcome, PipelineError> {
    let container = self.graph.container(at);
    if container.fuses.is_empty() && container.handlers.is_empty() {
      return Err(err);
    }
    debug!(container = %container.label(), error = %err, "entering recovery");
    for candidate in container.fuses.iter().chain(container.handlers.iter()).copied() {
      ctx.error = Some(err.clone());
      match self.dispatch(ctx, Some(candidate)).await {
        Ok(Outcome::Ran) if ctx.error.is_none() => {
          trace!(container = %container.label(), via = %candidate, "recovered");
          return Ok(Outcome::Ran);
        }
        Ok(_) => {}
        Err(attempt) => {
          debug!(via = %candidate, error = %attempt, "recovery attempt failed");
        }
      }
    }
    ctx.error = None;
    Err(err)
  }

  /// Runs a replica branch on its own task. The handle is dropped: the
  /// branch is never joined and never cancelled, and its outcome is
  /// discarded.
  fn spawn_detached(&self, mut ctx: RequestContext, entry: ContainerId) {
    let pipeline = self.clone();
    tokio::spawn(async move {
      match pipeline.dispatch(&mut ctx, Some(entry)).await {
        Ok(_) => trace!(entry = %entry, "detached branch finished"),
        Err(err) => debug!(entry = %entry, error = %err, "detached branch failed"),
      }
    });
  }
}
