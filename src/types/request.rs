//! The request flowing through the graph: HTTP-shaped value state plus
//! routing scratch, the shared trace, and the body sink.

use std::collections::HashMap;

use super::{BodySink, Response, Trace};

/// One traversal branch's view of the inbound request.
///
/// Value state (method, path, query, headers, params, segment cursor) is
/// owned per branch. The trace and body sink are shared handles within a
/// lineage; [`Request::fork`] detaches both.
#[derive(Debug, Clone)]
pub struct Request {
  method: String,
  path: String,
  query: HashMap<String, String>,
  headers: HashMap<String, String>,
  params: HashMap<String, String>,
  segments: Vec<String>,
  routed: usize,
  trace: Trace,
  sink: BodySink,
}

impl Request {
  /// Builds a request from a method and origin-form target
  /// (`/path?query`), with a fresh detached sink. The boundary swaps in
  /// the transport sink via [`Request::with_sink`].
  pub fn new(method: impl Into<String>, target: &str) -> Self {
    let (path, query) = split_target(target);
    Self {
      method: method.into(),
      segments: path_segments(&path),
      path,
      query,
      headers: HashMap::new(),
      params: HashMap::new(),
      routed: 0,
      trace: Trace::new(),
      sink: BodySink::detached(),
    }
  }

  pub fn with_sink(mut self, sink: BodySink) -> Self {
    self.sink = sink;
    self
  }

  pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.headers.insert(name.into(), value.into());
    self
  }

  pub fn method(&self) -> &str {
    &self.method
  }

  pub fn path(&self) -> &str {
    &self.path
  }

  /// Replaces the path, re-deriving segments and restarting routing.
  pub fn set_path(&mut self, path: impl Into<String>) {
    self.path = path.into();
    self.segments = path_segments(&self.path);
    self.routed = 0;
  }

  pub fn query(&self, name: &str) -> Option<&str> {
    self.query.get(name).map(String::as_str)
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

  pub fn param(&self, name: &str) -> Option<&str> {
    self.params.get(name).map(String::as_str)
  }

  pub fn set_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
    self.params.insert(name.into(), value.into());
  }

  pub fn params(&self) -> &HashMap<String, String> {
    &self.params
  }

  /// Merges captured params into the request, overwriting on collision.
  pub fn merge_params(&mut self, params: HashMap<String, String>) {
    self.params.extend(params);
  }

  /// All path segments, empty ones dropped.
  pub fn segments(&self) -> &[String] {
    &self.segments
  }

  /// Number of segments already consumed by routing.
  pub fn routed_depth(&self) -> usize {
    self.routed
  }

  /// Segments not yet consumed by routing.
  pub fn remaining_segments(&self) -> &[String] {
    &self.segments[self.routed.min(self.segments.len())..]
  }

  /// `/`-joined remaining path, for diagnostics.
  pub fn remaining_path(&self) -> String {
    format!("/{}", self.remaining_segments().join("/"))
  }

  /// Advances the cursor to an absolute consumed depth.
  pub fn advance_to(&mut self, depth: usize) {
    self.routed = depth.min(self.segments.len());
  }

  pub fn trace(&self) -> &Trace {
    &self.trace
  }

  pub fn sink(&self) -> &BodySink {
    &self.sink
  }

  /// Mints the response for this lineage: status 200, no headers, the
  /// same sink and trace.
  pub fn respond(&self) -> Response {
    Response::new(self.sink.clone(), self.trace.clone())
  }

  /// Independent copy for a detached branch: all value state copied, the
  /// trace snapshotted into a fresh handle, and a detached sink. The
  /// transport connection never travels to forks.
  pub fn fork(&self) -> Request {
    Request {
      method: self.method.clone(),
      path: self.path.clone(),
      query: self.query.clone(),
      headers: self.headers.clone(),
      params: self.params.clone(),
      segments: self.segments.clone(),
      routed: self.routed,
      trace: self.trace.fork(),
      sink: BodySink::detached(),
    }
  }
}

/// Splits an origin-form target into path and parsed query map.
pub(crate) fn split_target(target: &str) -> (String, HashMap<String, String>) {
  match target.split_once('?') {
    Some((path, qs)) => (path.to_string(), parse_query(qs)),
    None => (target.to_string(), HashMap::new()),
  }
}

/// Parses a query string; malformed input yields an empty map.
pub(crate) fn parse_query(qs: &str) -> HashMap<String, String> {
  serde_urlencoded::from_str::<Vec<(String, String)>>(qs)
    .map(|pairs| pairs.into_iter().collect())
    .unwrap_or_default()
}

/// Splits a path into its non-empty segments.
pub(crate) fn path_segments(path: &str) -> Vec<String> {
  path
    .split('/')
    .filter(|s| !s.is_empty())
    .map(str::to_string)
    .collect()
}
