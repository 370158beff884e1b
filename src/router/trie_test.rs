//! Tests for route trie insertion, matching, and selection.

use std::collections::HashMap;

use proptest::prelude::*;

use crate::error::WiringError;
use crate::router::key::KeyRank;
use crate::router::trie::{pick, RouterNode};
use crate::types::ContainerId;

fn segments(path: &str) -> Vec<String> {
  path
    .split('/')
    .filter(|s| !s.is_empty())
    .map(str::to_string)
    .collect()
}

fn id(n: usize) -> ContainerId {
  ContainerId(n)
}

#[test]
fn literal_beats_param_at_equal_depth() {
  let mut root = RouterNode::root();
  root.add_route("/users/{id}", id(1)).unwrap();
  root.add_route("/users/me", id(2)).unwrap();

  let candidates = root.matches(&segments("/users/me"), 0);
  assert_eq!(candidates.len(), 2);
  let best = pick(candidates).unwrap();
  assert_eq!(best.target, id(2));
  assert_eq!(best.depth, 2);
}

#[test]
fn deeper_consumption_beats_specificity() {
  let mut root = RouterNode::root();
  root.add_route("/a", id(1)).unwrap();
  root.add_route("/{x}/b", id(2)).unwrap();

  let best = pick(root.matches(&segments("/a/b"), 0)).unwrap();
  assert_eq!(best.target, id(2));
  assert_eq!(best.depth, 2);
}

#[test]
fn glob_reports_prefix_depth_only() {
  let mut root = RouterNode::root();
  root.add_route("/static/**", id(1)).unwrap();

  let candidates = root.matches(&segments("/static/css/site.css"), 0);
  assert_eq!(candidates.len(), 1);
  assert_eq!(candidates[0].depth, 1);
  assert_eq!(
    candidates[0].stack,
    vec![KeyRank::Path, KeyRank::Wildcard]
  );
}

#[test]
fn glob_accepts_zero_remaining_segments() {
  let mut root = RouterNode::root();
  root.add_route("/static/**", id(1)).unwrap();

  let candidates = root.matches(&segments("/static"), 0);
  assert_eq!(candidates.len(), 1);
  assert_eq!(candidates[0].target, id(1));
}

#[test]
fn sibling_glob_loses_to_any_consuming_match() {
  let mut root = RouterNode::root();
  root.add_route("/**", id(1)).unwrap();
  root.add_route("/{x}", id(2)).unwrap();

  let best = pick(root.matches(&segments("/anything"), 0)).unwrap();
  assert_eq!(best.target, id(2));
}

#[test]
fn duplicate_route_is_rejected_idempotently() {
  let mut root = RouterNode::root();
  root.add_route("/users/{id}", id(1)).unwrap();

  for _ in 0..2 {
    match root.add_route("/users/{id}", id(2)).unwrap_err() {
      WiringError::DuplicateRoute { pattern } => assert_eq!(pattern, "/users/{id}"),
      other => panic!("unexpected error: {other:?}"),
    }
  }

  // The first registration still wins after the rejections.
  let best = pick(root.matches(&segments("/users/7"), 0)).unwrap();
  assert_eq!(best.target, id(1));
}

#[test]
fn differently_named_params_are_distinct_keys() {
  let mut root = RouterNode::root();
  root.add_route("/users/{id}", id(1)).unwrap();
  root.add_route("/users/{name}", id(2)).unwrap();

  // Both match any segment; the full tie goes to the first registered.
  let candidates = root.matches(&segments("/users/7"), 0);
  assert_eq!(candidates.len(), 2);
  let best = pick(candidates).unwrap();
  assert_eq!(best.target, id(1));
  assert_eq!(best.params.get("id").map(String::as_str), Some("7"));
}

#[test]
fn prefix_match_leaves_suffix_unconsumed() {
  let mut root = RouterNode::root();
  root.add_route("/api", id(1)).unwrap();

  let candidates = root.matches(&segments("/api/v2/users"), 0);
  assert_eq!(candidates.len(), 1);
  assert_eq!(candidates[0].depth, 1);
}

#[test]
fn matching_starts_at_the_cursor() {
  let mut root = RouterNode::root();
  root.add_route("/users/{id}", id(1)).unwrap();

  let segs = segments("/api/users/9");
  let candidates = root.matches(&segs, 1);
  assert_eq!(candidates.len(), 1);
  assert_eq!(candidates[0].depth, 3);
  assert_eq!(candidates[0].params.get("id").map(String::as_str), Some("9"));
}

#[test]
fn params_do_not_leak_across_branches() {
  let mut root = RouterNode::root();
  root.add_route("/{a}/x", id(1)).unwrap();
  root.add_route("/{b}/y", id(2)).unwrap();

  let candidates = root.matches(&segments("/v/y"), 0);
  assert_eq!(candidates.len(), 1);
  let only = &candidates[0];
  assert_eq!(only.params.get("b").map(String::as_str), Some("v"));
  assert!(!only.params.contains_key("a"));
}

#[test]
fn constrained_param_filters_candidates() {
  let mut root = RouterNode::root();
  root.add_route("/items/{id:[0-9]+}", id(1)).unwrap();
  root.add_route("/items/{slug}", id(2)).unwrap();

  let best = pick(root.matches(&segments("/items/42"), 0)).unwrap();
  assert_eq!(best.target, id(1));

  let best = pick(root.matches(&segments("/items/shoes"), 0)).unwrap();
  assert_eq!(best.target, id(2));
}

#[test]
fn shorter_stack_wins_a_rank_tie() {
  let a = pick(vec![
    candidate(id(1), 1, vec![KeyRank::Param, KeyRank::Wildcard]),
    candidate(id(2), 1, vec![KeyRank::Param]),
  ])
  .unwrap();
  assert_eq!(a.target, id(2));
}

#[test]
fn first_collected_wins_a_full_tie() {
  let best = pick(vec![
    candidate(id(1), 2, vec![KeyRank::Path, KeyRank::Param]),
    candidate(id(2), 2, vec![KeyRank::Path, KeyRank::Param]),
  ])
  .unwrap();
  assert_eq!(best.target, id(1));
}

#[test]
fn empty_candidate_set_picks_nothing() {
  assert!(pick(Vec::new()).is_none());
}

fn candidate(
  target: ContainerId,
  depth: usize,
  stack: Vec<KeyRank>,
) -> crate::router::trie::RouteCandidate {
  crate::router::trie::RouteCandidate {
    target,
    pattern: String::new(),
    depth,
    stack,
    params: HashMap::new(),
  }
}

proptest! {
  #[test]
  fn unconstrained_param_captures_any_segment(seg in "[a-zA-Z0-9_.-]{1,24}") {
    let mut root = RouterNode::root();
    root.add_route("/things/{name}", id(1)).unwrap();

    let segs = vec!["things".to_string(), seg.clone()];
    let best = pick(root.matches(&segs, 0)).unwrap();
    prop_assert_eq!(best.target, id(1));
    prop_assert_eq!(best.params.get("name").cloned(), Some(seg));
  }

  #[test]
  fn literal_always_beats_param_for_same_segment(seg in "[a-z]{1,12}") {
    let mut root = RouterNode::root();
    root.add_route("/x/{v}", id(1)).unwrap();
    let literal = format!("/x/{seg}");
    root.add_route(&literal, id(2)).unwrap();

    let segs = vec!["x".to_string(), seg];
    let best = pick(root.matches(&segs, 0)).unwrap();
    prop_assert_eq!(best.target, id(2));
  }
}
