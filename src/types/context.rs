//! Per-branch execution context handed down the dispatch recursion.

use std::time::Instant;

use super::{Request, Response, Trace};
use crate::error::PipelineError;

/// Everything one traversal branch owns: the request, the response-so-far,
/// the pending error during recovery, and the branch start time.
#[derive(Debug)]
pub struct RequestContext {
  pub request: Request,
  pub response: Option<Response>,
  /// Set while recovery is offering an error to fuses and handlers;
  /// cleared by whichever consumes it.
  pub error: Option<PipelineError>,
  started_at: Instant,
}

impl RequestContext {
  pub fn new(request: Request) -> Self {
    Self {
      request,
      response: None,
      error: None,
      started_at: Instant::now(),
    }
  }

  /// Context for a replica branch: the forked request, no response, no
  /// pending error, the same start instant.
  pub fn fork(&self, request: Request) -> RequestContext {
    RequestContext {
      request,
      response: None,
      error: None,
      started_at: self.started_at,
    }
  }

  pub fn trace(&self) -> &Trace {
    self.request.trace()
  }

  pub fn elapsed(&self) -> std::time::Duration {
    self.started_at.elapsed()
  }
}
