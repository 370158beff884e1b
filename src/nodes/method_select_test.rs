//! Tests for `MethodSelect`.

use crate::error::PipelineError;
use crate::node::Diverter;
use crate::nodes::method_select::MethodSelect;
use crate::types::{ContainerId, Request};

fn id(n: usize) -> ContainerId {
  ContainerId(n)
}

#[tokio::test]
async fn routes_by_method() {
  let select = MethodSelect::new().route("GET", id(1)).route("POST", id(2));

  let mut get = Request::new("GET", "/");
  assert_eq!(select.shunt(&mut get, &[]).await.unwrap(), id(1));
  let mut post = Request::new("POST", "/");
  assert_eq!(select.shunt(&mut post, &[]).await.unwrap(), id(2));
}

#[tokio::test]
async fn matching_is_case_insensitive() {
  let select = MethodSelect::new().route("get", id(1));

  let mut req = Request::new("GET", "/");
  assert_eq!(select.shunt(&mut req, &[]).await.unwrap(), id(1));
}

#[tokio::test]
async fn unknown_method_without_fallback_is_not_allowed() {
  let select = MethodSelect::new().route("GET", id(1));

  let mut req = Request::new("DELETE", "/");
  let err = select.shunt(&mut req, &[]).await.unwrap_err();
  match err {
    PipelineError::Status { status, .. } => assert_eq!(status, 405),
    other => panic!("unexpected error: {other:?}"),
  }
}

#[tokio::test]
async fn fallback_child_takes_unknown_methods() {
  let select = MethodSelect::new().route("GET", id(1)).or_else(id(9));

  let mut req = Request::new("PATCH", "/");
  assert_eq!(select.shunt(&mut req, &[]).await.unwrap(), id(9));
}
