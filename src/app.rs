//! Application shell: phase sequencing, app-wide catchers, and the
//! default fallback response.

use tracing::{debug, instrument};

use crate::dispatch::{Outcome, Pipeline};
use crate::error::{PipelineError, WiringError};
use crate::graph::Graph;
use crate::node::Node;
use crate::types::{ContainerId, Request, RequestContext, Response};

/// App-level wiring around the main entry: an optional pre chain, an
/// optional post chain, and the ordered app-wide catchers.
#[derive(Debug, Clone, Default)]
pub struct Phases {
  /// Runs before the main entry; its failure skips the main entry.
  pub pre: Option<ContainerId>,
  /// Runs after the main entry, settled or not.
  pub post: Option<ContainerId>,
  /// Tried in order when a branch error survives every local recovery
  /// list.
  pub catchers: Vec<ContainerId>,
}

/// One assembled application: a graph, its entry, and the phase wiring.
///
/// Construction validates placement; `handle` never panics and never
/// leaks a [`PipelineError`] to the caller.
#[derive(Debug, Clone)]
pub struct App {
  pipeline: Pipeline,
  entry: ContainerId,
  phases: Phases,
}

impl App {
  pub fn new(graph: Graph, entry: ContainerId, phases: Phases) -> Result<App, WiringError> {
    for id in phases
      .catchers
      .iter()
      .copied()
      .chain(phases.pre)
      .chain(phases.post)
      .chain([entry])
    {
      if !graph.contains(id) {
        return Err(WiringError::UnknownContainer(id));
      }
    }
    for catcher in &phases.catchers {
      let container = graph.container(*catcher);
      if !matches!(container.node, Node::ExceptionHandler(_)) {
        return Err(WiringError::NotAHandler {
          container: container.label(),
          kind: container.node.kind(),
        });
      }
    }
    check_placement(&graph, phases.pre, true, false)?;
    check_placement(&graph, phases.post, false, true)?;
    check_placement(&graph, Some(entry), false, false)?;
    for catcher in &phases.catchers {
      check_placement(&graph, Some(*catcher), false, false)?;
    }
    Ok(App {
      pipeline: Pipeline::new(graph),
      entry,
      phases,
    })
  }

  pub fn graph(&self) -> &Graph {
    self.pipeline.graph()
  }

  /// Handles one request: pre chain, main entry, then the post chain.
  ///
  /// A branch error goes to the app catchers and then the default
  /// fallback, so an error always settles into a response. `None` means
  /// the graph finished without any container producing one.
  #[instrument(
    level = "debug",
    skip(self, request),
    fields(method = %request.method(), path = %request.path())
  )]
  pub async fn handle(&self, request: Request) -> Option<Response> {
    let mut ctx = RequestContext::new(request);
    for entry in [self.phases.pre, Some(self.entry)].into_iter().flatten() {
      if let Err(err) = self.pipeline.run(&mut ctx, entry).await {
        self.settle(&mut ctx, err).await;
        break;
      }
    }
    if let Some(post) = self.phases.post {
      if let Err(err) = self.pipeline.run(&mut ctx, post).await {
        self.settle(&mut ctx, err).await;
      }
    }
    debug!(
      status = ?ctx.response.as_ref().map(Response::status),
      elapsed_ms = ctx.elapsed().as_millis() as u64,
      "request settled"
    );
    ctx.response.take()
  }

  /// Offers a surviving branch error to the app catchers in order, then
  /// falls back to the default error response. Same resolution rule as
  /// local recovery: a catcher resolves by completing with the error
  /// consumed.
  async fn settle(&self, ctx: &mut RequestContext, err: PipelineError) {
    debug!(error = %err, "branch error reached the app");
    for catcher in self.phases.catchers.iter().copied() {
      ctx.error = Some(err.clone());
      match self.pipeline.run(ctx, catcher).await {
        Ok(Outcome::Ran) if ctx.error.is_none() => return,
        Ok(_) => {}
        Err(attempt) => {
          debug!(via = %catcher, error = %attempt, "app catcher failed");
        }
      }
    }
    ctx.error = None;
    self.fallback(ctx, err).await;
  }

  /// Builds the default error response: the error's mapped status and
  /// its canonical reason phrase as the body.
  async fn fallback(&self, ctx: &mut RequestContext, err: PipelineError) {
    let status = err.fallback_status();
    debug!(status, error = %err, "default fallback response");
    let mut response = ctx.request.respond();
    response.set_status(status);
    if let Err(write_err) = response.write(reason(status)).await {
      debug!(error = %write_err, "fallback body write failed");
    }
    ctx.response = Some(response);
  }
}

/// Walks the execution edges reachable from `from` and rejects global
/// nodes outside their phase.
fn check_placement(
  graph: &Graph,
  from: Option<ContainerId>,
  allow_pre: bool,
  allow_post: bool,
) -> Result<(), WiringError> {
  let Some(from) = from else {
    return Ok(());
  };
  let mut seen = vec![false; graph.len()];
  let mut stack = vec![from];
  while let Some(id) = stack.pop() {
    if seen[id.index()] {
      continue;
    }
    seen[id.index()] = true;
    let container = graph.container(id);
    match &container.node {
      Node::GlobalPre(_) if !allow_pre => {
        return Err(WiringError::MisplacedGlobal {
          container: container.label(),
          kind: container.node.kind(),
          phase: "pre",
        });
      }
      Node::GlobalPost(_) if !allow_post => {
        return Err(WiringError::MisplacedGlobal {
          container: container.label(),
          kind: container.node.kind(),
          phase: "post",
        });
      }
      _ => {}
    }
    stack.extend(container.next.follow());
    stack.extend_from_slice(container.next.fan());
    stack.extend_from_slice(&container.fuses);
    stack.extend_from_slice(&container.handlers);
  }
  Ok(())
}

/// Canonical reason phrase for the fallback body.
pub(crate) fn reason(status: u16) -> &'static str {
  match status {
    400 => "Bad Request",
    403 => "Forbidden",
    404 => "Not Found",
    405 => "Method Not Allowed",
    500 => "Internal Server Error",
    502 => "Bad Gateway",
    503 => "Service Unavailable",
    _ => "Error",
  }
}
