//! Diverter keyed on the request method.

use async_trait::async_trait;

use crate::error::PipelineError;
use crate::node::Diverter;
use crate::types::{ContainerId, Request};

/// Routes by HTTP method, case-insensitively.
///
/// A method with no entry goes to the fallback child when one is set
/// and otherwise fails with a 405.
#[derive(Debug, Default)]
pub struct MethodSelect {
  table: Vec<(String, ContainerId)>,
  fallback: Option<ContainerId>,
}

impl MethodSelect {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds a method entry. The child must also be wired as a graph child
  /// of this node's container.
  pub fn route(mut self, method: &str, child: ContainerId) -> Self {
    self.table.push((method.to_ascii_uppercase(), child));
    self
  }

  pub fn or_else(mut self, child: ContainerId) -> Self {
    self.fallback = Some(child);
    self
  }
}

#[async_trait]
impl Diverter for MethodSelect {
  async fn shunt(
    &self,
    req: &mut Request,
    _children: &[ContainerId],
  ) -> Result<ContainerId, PipelineError> {
    let method = req.method().to_ascii_uppercase();
    if let Some((_, child)) = self.table.iter().find(|(entry, _)| *entry == method) {
      return Ok(*child);
    }
    if let Some(child) = self.fallback {
      return Ok(child);
    }
    Err(PipelineError::status(405, format!("method {method} not allowed")))
  }
}
