//! Tests for `StaticResponder`.

use crate::node::Responder;
use crate::nodes::respond::StaticResponder;
use crate::types::{BodySink, Request};

#[tokio::test]
async fn serves_the_fixed_body() {
  let (sink, body) = BodySink::buffer();
  let mut req = Request::new("GET", "/hello").with_sink(sink);

  let node = StaticResponder::new(200, "hello there");
  let res = node.respond(&mut req).await.unwrap();

  assert_eq!(res.status(), 200);
  assert_eq!(res.header("content-type"), Some("text/plain"));
  assert_eq!(body.take(), "hello there");
}

#[tokio::test]
async fn content_type_can_be_overridden() {
  let mut req = Request::new("GET", "/");
  let node = StaticResponder::new(200, "{}").content_type("application/json");

  let res = node.respond(&mut req).await.unwrap();
  assert_eq!(res.header("content-type"), Some("application/json"));
}
