//! Stock replicator.

use async_trait::async_trait;

use crate::error::PipelineError;
use crate::node::Replicator;
use crate::types::Request;

/// Copies the request across all lanes: the first lane keeps a plain
/// clone (shared trace and sink), every other lane gets a detached fork.
#[derive(Debug, Default)]
pub struct Tee;

impl Tee {
  pub fn new() -> Self {
    Self
  }
}

#[async_trait]
impl Replicator for Tee {
  async fn copy(&self, req: &Request, lanes: usize) -> Result<Vec<Request>, PipelineError> {
    let mut copies = Vec::with_capacity(lanes);
    copies.push(req.clone());
    while copies.len() < lanes {
      copies.push(req.fork());
    }
    Ok(copies)
  }
}
