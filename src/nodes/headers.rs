//! Header-setting nodes for the request and response sides.

use async_trait::async_trait;

use crate::error::PipelineError;
use crate::node::{RequestHandler, ResponseHandler};
use crate::types::{Request, Response};

/// Sets one request header, overwriting any existing value.
#[derive(Debug, Clone)]
pub struct SetRequestHeader {
  name: String,
  value: String,
}

impl SetRequestHeader {
  pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      value: value.into(),
    }
  }
}

#[async_trait]
impl RequestHandler for SetRequestHeader {
  async fn handle(&self, req: &mut Request) -> Result<(), PipelineError> {
    req.set_header(self.name.clone(), self.value.clone());
    Ok(())
  }
}

/// Sets one response header, overwriting any existing value.
#[derive(Debug, Clone)]
pub struct SetResponseHeader {
  name: String,
  value: String,
}

impl SetResponseHeader {
  pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      value: value.into(),
    }
  }
}

#[async_trait]
impl ResponseHandler for SetResponseHeader {
  async fn handle(&self, res: &mut Response) -> Result<(), PipelineError> {
    res.set_header(self.name.clone(), self.value.clone());
    Ok(())
  }
}
