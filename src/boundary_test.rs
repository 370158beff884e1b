//! Tests for the transport boundary.

use async_trait::async_trait;

use crate::app::{App, Phases};
use crate::boundary::{exchange, InboundRequest};
use crate::error::PipelineError;
use crate::graph::Graph;
use crate::node::{Node, RequestHandler, Responder};
use crate::types::{Request, Response};

struct EchoHeader {
  name: &'static str,
}

#[async_trait]
impl Responder for EchoHeader {
  async fn respond(&self, req: &mut Request) -> Result<Response, PipelineError> {
    let mut res = req.respond();
    res.set_header("content-type", "text/plain");
    res.set_header("x-served-by", "gateway");
    let value = req.header(self.name).unwrap_or("none").to_string();
    res.write(value).await?;
    Ok(res)
  }
}

struct EchoQuery {
  name: &'static str,
}

#[async_trait]
impl Responder for EchoQuery {
  async fn respond(&self, req: &mut Request) -> Result<Response, PipelineError> {
    let res = req.respond();
    let value = req.query(self.name).unwrap_or("none").to_string();
    res.write(value).await?;
    Ok(res)
  }
}

struct Quiet;

#[async_trait]
impl RequestHandler for Quiet {
  async fn handle(&self, _req: &mut Request) -> Result<(), PipelineError> {
    Ok(())
  }
}

fn app_with(node: Node) -> App {
  let mut g = Graph::builder();
  let entry = g.add("edge", "node", node);
  App::new(g.finish().unwrap(), entry, Phases::default()).unwrap()
}

#[tokio::test]
async fn exchange_carries_headers_both_ways() {
  let app = app_with(Node::responder(EchoHeader { name: "x-tenant" }));

  let out = exchange(
    &app,
    InboundRequest::new("GET", "/").header("x-tenant", "acme"),
  )
  .await;

  assert_eq!(out.status, 200);
  assert_eq!(out.body, "acme");
  // Sorted by header name.
  assert_eq!(
    out.headers,
    vec![
      ("content-type".to_string(), "text/plain".to_string()),
      ("x-served-by".to_string(), "gateway".to_string()),
    ]
  );
}

#[tokio::test]
async fn responseless_graph_maps_to_a_bare_not_found() {
  let app = app_with(Node::handler(Quiet));

  let out = exchange(&app, InboundRequest::new("GET", "/anything")).await;

  assert_eq!(out.status, 404);
  assert!(out.headers.is_empty());
  assert_eq!(out.body, "Not Found");
}

#[tokio::test]
async fn query_parameters_reach_the_graph() {
  let app = app_with(Node::responder(EchoQuery { name: "q" }));

  let out = exchange(&app, InboundRequest::new("GET", "/search?q=rust&page=2")).await;
  assert_eq!(out.body, "rust");
}

#[tokio::test]
async fn malformed_query_is_dropped_not_fatal() {
  let app = app_with(Node::responder(EchoQuery { name: "q" }));

  let out = exchange(&app, InboundRequest::new("GET", "/search?q=%zz")).await;
  assert_eq!(out.status, 200);
  assert_eq!(out.body, "none");
}
