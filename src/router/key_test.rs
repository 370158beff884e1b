//! Tests for `RouterKey` and pattern parsing.

use super::key::{parse_pattern, split_pattern, KeyRank, RouterKey};
use crate::error::WiringError;

#[test]
fn parse_classifies_each_shape() {
  assert_eq!(
    RouterKey::parse("/a", "a").unwrap(),
    RouterKey::Path("a".to_string())
  );
  assert!(matches!(
    RouterKey::parse("/{id}", "{id}").unwrap(),
    RouterKey::Param { ref name, pattern: None } if name == "id"
  ));
  assert!(matches!(
    RouterKey::parse("/*", "*").unwrap(),
    RouterKey::Wildcard { greedy: false }
  ));
  assert!(matches!(
    RouterKey::parse("/**", "**").unwrap(),
    RouterKey::Wildcard { greedy: true }
  ));
}

#[test]
fn param_constraint_is_anchored() {
  let key = RouterKey::parse("/{id:[0-9]+}", "{id:[0-9]+}").unwrap();
  assert!(key.matches("42"));
  assert!(!key.matches("42a"));
  assert!(!key.matches("a42"));
  assert!(!key.matches(""));
}

#[test]
fn unconstrained_param_matches_any_segment() {
  let key = RouterKey::parse("/{slug}", "{slug}").unwrap();
  assert!(key.matches("anything-at-all"));
}

#[test]
fn bad_regex_is_a_wiring_error() {
  let err = RouterKey::parse("/{id:[}", "{id:[}").unwrap_err();
  assert!(matches!(err, WiringError::BadSegment { .. }));
}

#[test]
fn empty_param_name_is_rejected() {
  let err = RouterKey::parse("/{}", "{}").unwrap_err();
  assert!(matches!(err, WiringError::BadSegment { .. }));
}

#[test]
fn split_ignores_leading_and_trailing_slashes() {
  assert_eq!(split_pattern("/a/b/"), ["a", "b"]);
  assert_eq!(split_pattern("a/b"), ["a", "b"]);
  assert!(split_pattern("/").is_empty());
}

#[test]
fn split_keeps_braced_spans_atomic() {
  assert_eq!(
    split_pattern("/files/{rest:a/b}/tail"),
    ["files", "{rest:a/b}", "tail"]
  );
}

#[test]
fn glob_must_be_terminal() {
  assert!(parse_pattern("/files/**").is_ok());
  let err = parse_pattern("/files/**/x").unwrap_err();
  assert!(matches!(err, WiringError::TrailingAfterGlob { .. }));
}

#[test]
fn rank_orders_path_before_param_before_wildcard() {
  assert!(KeyRank::Path < KeyRank::Param);
  assert!(KeyRank::Param < KeyRank::Wildcard);
}

#[test]
fn keys_compare_by_shape() {
  let a = RouterKey::parse("/p", "{id:[0-9]+}").unwrap();
  let b = RouterKey::parse("/q", "{id:[0-9]+}").unwrap();
  let c = RouterKey::parse("/r", "{id:[a-z]+}").unwrap();
  assert_eq!(a, b);
  assert_ne!(a, c);
}
