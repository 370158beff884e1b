//! The response-so-far for one request lineage.

use std::collections::HashMap;

use bytes::Bytes;

use super::{BodySink, Trace};
use crate::error::PipelineError;

/// Response under construction; at most one exists per request lineage.
///
/// Created lazily by [`Request::respond`](super::Request::respond), which
/// hands over the lineage's sink and trace.
#[derive(Debug, Clone)]
pub struct Response {
  status: u16,
  headers: HashMap<String, String>,
  sink: BodySink,
  trace: Trace,
}

impl Response {
  pub(crate) fn new(sink: BodySink, trace: Trace) -> Self {
    Self {
      status: 200,
      headers: HashMap::new(),
      sink,
      trace,
    }
  }

  pub fn status(&self) -> u16 {
    self.status
  }

  pub fn set_status(&mut self, status: u16) {
    self.status = status;
  }

  pub fn header(&self, name: &str) -> Option<&str> {
    self.headers.get(name).map(String::as_str)
  }

  pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
    self.headers.insert(name.into(), value.into());
  }

  pub fn headers(&self) -> &HashMap<String, String> {
    &self.headers
  }

  pub fn trace(&self) -> &Trace {
    &self.trace
  }

  /// Writes one body chunk to the lineage's sink.
  pub async fn write(&self, chunk: impl Into<Bytes>) -> Result<(), PipelineError> {
    self.sink.write(chunk).await
  }
}
