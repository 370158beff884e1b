//! Transport boundary: plain inbound and outbound values around the app.

use std::time::Instant;

use bytes::Bytes;
use tracing::info;

use crate::app::App;
use crate::types::{BodySink, Request};

/// Transport-shaped inbound request, before it enters the graph.
#[derive(Debug, Clone)]
pub struct InboundRequest {
  pub method: String,
  pub target: String,
  pub headers: Vec<(String, String)>,
}

impl InboundRequest {
  pub fn new(method: impl Into<String>, target: impl Into<String>) -> Self {
    Self {
      method: method.into(),
      target: target.into(),
      headers: Vec::new(),
    }
  }

  pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.headers.push((name.into(), value.into()));
    self
  }
}

/// Transport-shaped outbound response with the fully buffered body.
///
/// Headers are sorted by name so the wire shape is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundResponse {
  pub status: u16,
  pub headers: Vec<(String, String)>,
  pub body: Bytes,
}

/// Runs one exchange through the app.
///
/// A graph that finishes without producing a response maps to a bare
/// 404 at this boundary.
pub async fn exchange(app: &App, inbound: InboundRequest) -> OutboundResponse {
  let started = Instant::now();
  let (sink, body) = BodySink::buffer();
  let mut request = Request::new(inbound.method.as_str(), &inbound.target).with_sink(sink);
  for (name, value) in &inbound.headers {
    request.set_header(name.clone(), value.clone());
  }
  let outbound = match app.handle(request).await {
    Some(response) => {
      let mut headers: Vec<(String, String)> = response
        .headers()
        .iter()
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();
      headers.sort();
      OutboundResponse {
        status: response.status(),
        headers,
        body: body.take(),
      }
    }
    None => OutboundResponse {
      status: 404,
      headers: Vec::new(),
      body: Bytes::from_static(b"Not Found"),
    },
  };
  info!(
    method = %inbound.method,
    target = %inbound.target,
    status = outbound.status,
    elapsed_ms = started.elapsed().as_millis() as u64,
    "exchange"
  );
  outbound
}
