//! Path-based diverter: a route trie behind the [`Diverter`] trait.

use async_trait::async_trait;
use tracing::trace;

use crate::error::{PipelineError, WiringError};
use crate::node::Diverter;
use crate::router::trie::{pick, RouterNode};
use crate::types::{ContainerId, Request};

/// Routes on the request's remaining path segments.
///
/// Matching consumes segments; a nested `PathRouter` downstream sees
/// only the suffix. Selection side effects (cursor advance, captured
/// params) land on the request before the chosen child runs.
#[derive(Debug, Default)]
pub struct PathRouter {
  root: RouterNode,
}

impl PathRouter {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers a pattern leading to `child`. The child must also be
  /// wired as a graph child of this router's container.
  pub fn mount(&mut self, pattern: &str, child: ContainerId) -> Result<(), WiringError> {
    self.root.add_route(pattern, child)
  }
}

#[async_trait]
impl Diverter for PathRouter {
  async fn shunt(
    &self,
    req: &mut Request,
    _children: &[ContainerId],
  ) -> Result<ContainerId, PipelineError> {
    let candidates = self.root.matches(req.segments(), req.routed_depth());
    let Some(best) = pick(candidates) else {
      return Err(PipelineError::RouteNotFound {
        path: req.remaining_path(),
      });
    };
    trace!(pattern = %best.pattern, depth = best.depth, "route selected");
    req.advance_to(best.depth);
    req.merge_params(best.params);
    Ok(best.target)
  }
}
