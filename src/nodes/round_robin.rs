//! Diverter that cycles through its children.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::PipelineError;
use crate::node::Diverter;
use crate::types::{ContainerId, Request};

/// Picks children in rotation across requests.
#[derive(Debug, Default)]
pub struct RoundRobin {
  cursor: AtomicUsize,
}

impl RoundRobin {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl Diverter for RoundRobin {
  async fn shunt(
    &self,
    _req: &mut Request,
    children: &[ContainerId],
  ) -> Result<ContainerId, PipelineError> {
    // The engine rejects an empty child list before calling shunt.
    let i = self.cursor.fetch_add(1, Ordering::Relaxed) % children.len();
    Ok(children[i])
  }
}
