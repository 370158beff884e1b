//! Stock responder serving a fixed body.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::PipelineError;
use crate::node::Responder;
use crate::types::{Request, Response};

/// Responds with a fixed status, content type, and body.
#[derive(Debug, Clone)]
pub struct StaticResponder {
  status: u16,
  content_type: String,
  body: Bytes,
}

impl StaticResponder {
  pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
    Self {
      status,
      content_type: "text/plain".to_string(),
      body: body.into(),
    }
  }

  pub fn content_type(mut self, value: impl Into<String>) -> Self {
    self.content_type = value.into();
    self
  }
}

#[async_trait]
impl Responder for StaticResponder {
  async fn respond(&self, req: &mut Request) -> Result<Response, PipelineError> {
    let mut res = req.respond();
    res.set_status(self.status);
    res.set_header("content-type", self.content_type.clone());
    res.write(self.body.clone()).await?;
    Ok(res)
  }
}
