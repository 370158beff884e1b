//! Stock recovery nodes: a path-rewriting fuse and JSON error catchers.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::PipelineError;
use crate::node::{ExceptionHandler, Fuse};
use crate::types::{Request, Response};

/// Fuse that retries the branch with the path rewritten to a fixed
/// target.
#[derive(Debug, Clone)]
pub struct PathRewrite {
  to: String,
}

impl PathRewrite {
  pub fn new(to: impl Into<String>) -> Self {
    Self { to: to.into() }
  }
}

#[async_trait]
impl Fuse for PathRewrite {
  async fn fuse(&self, _err: &PipelineError, req: &Request) -> Result<Option<Request>, PipelineError> {
    let mut patched = req.clone();
    patched.set_path(self.to.clone());
    Ok(Some(patched))
  }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
  status: u16,
  message: String,
}

/// Exception handler that settles any error into a JSON response using
/// the error's fallback status.
#[derive(Debug, Clone, Default)]
pub struct ErrorResponder;

impl ErrorResponder {
  pub fn new() -> Self {
    Self
  }
}

#[async_trait]
impl ExceptionHandler for ErrorResponder {
  async fn catch(
    &self,
    err: &PipelineError,
    req: &Request,
    _res: Option<&Response>,
  ) -> Result<Option<Response>, PipelineError> {
    let status = err.fallback_status();
    let body = ErrorBody {
      status,
      message: err.to_string(),
    };
    let encoded = serde_json::to_vec(&body)
      .map_err(|e| PipelineError::node("nodes/error-responder", e.to_string()))?;
    let mut res = req.respond();
    res.set_status(status);
    res.set_header("content-type", "application/json");
    res.write(encoded).await?;
    Ok(Some(res))
  }
}

/// Exception handler that accepts only errors mapping to one status and
/// declines the rest.
#[derive(Debug, Clone)]
pub struct CatchStatus {
  status: u16,
  inner: ErrorResponder,
}

impl CatchStatus {
  pub fn new(status: u16) -> Self {
    Self {
      status,
      inner: ErrorResponder,
    }
  }
}

#[async_trait]
impl ExceptionHandler for CatchStatus {
  async fn catch(
    &self,
    err: &PipelineError,
    req: &Request,
    res: Option<&Response>,
  ) -> Result<Option<Response>, PipelineError> {
    if err.fallback_status() != self.status {
      return Ok(None);
    }
    self.inner.catch(err, req, res).await
  }
}
