//! Route trie: insertion with duplicate rejection, exhaustive candidate
//! collection, and depth-then-specificity selection.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::WiringError;
use crate::router::key::{parse_pattern, KeyRank, RouterKey};
use crate::types::ContainerId;

/// One trie node, addressed by the key that leads to it (the root has
/// none).
#[derive(Debug, Default)]
pub struct RouterNode {
  key: Option<RouterKey>,
  children: Vec<RouterNode>,
  target: Option<(ContainerId, String)>,
}

/// One consistent way through the trie for a request suffix.
#[derive(Debug, Clone)]
pub struct RouteCandidate {
  /// Child container the route leads to.
  pub target: ContainerId,
  /// Registered pattern, for diagnostics.
  pub pattern: String,
  /// Absolute consumed depth within the request segments. A greedy
  /// wildcard consumes no depth; its candidates report the prefix only.
  pub depth: usize,
  /// Ranks of the keys traversed, in order.
  pub stack: Vec<KeyRank>,
  /// Parameters captured along the way.
  pub params: HashMap<String, String>,
}

impl RouterNode {
  pub fn root() -> Self {
    Self::default()
  }

  /// Registers a pattern. A second registration terminating at the same
  /// trie node is rejected; the rejection is idempotent and leaves the
  /// first registration in place.
  pub fn add_route(&mut self, pattern: &str, target: ContainerId) -> Result<(), WiringError> {
    let mut keys = parse_pattern(pattern)?;
    keys.reverse();
    self.insert(&mut keys, pattern, target)
  }

  fn insert(
    &mut self,
    reversed: &mut Vec<RouterKey>,
    pattern: &str,
    target: ContainerId,
  ) -> Result<(), WiringError> {
    let Some(key) = reversed.pop() else {
      if self.target.is_some() {
        return Err(WiringError::DuplicateRoute {
          pattern: pattern.to_string(),
        });
      }
      self.target = Some((target, pattern.to_string()));
      return Ok(());
    };
    let position = self
      .children
      .iter()
      .position(|child| child.key.as_ref() == Some(&key));
    let child = match position {
      Some(i) => &mut self.children[i],
      None => {
        self.children.push(RouterNode {
          key: Some(key),
          children: Vec::new(),
          target: None,
        });
        let last = self.children.len() - 1;
        &mut self.children[last]
      }
    };
    child.insert(reversed, pattern, target)
  }

  /// Collects every candidate consistent with `segments[from..]`.
  ///
  /// Exploration never short-circuits; a pattern may consume fewer
  /// segments than the request carries (the suffix stays for nested
  /// routers), and `**` accepts zero or more remaining segments.
  pub fn matches(&self, segments: &[String], from: usize) -> Vec<RouteCandidate> {
    let mut out = Vec::new();
    let mut stack = Vec::new();
    self.explore(segments, from, &mut stack, &HashMap::new(), &mut out);
    out
  }

  fn explore(
    &self,
    segments: &[String],
    depth: usize,
    stack: &mut Vec<KeyRank>,
    params: &HashMap<String, String>,
    out: &mut Vec<RouteCandidate>,
  ) {
    if let Some((target, pattern)) = &self.target {
      out.push(RouteCandidate {
        target: *target,
        pattern: pattern.clone(),
        depth,
        stack: stack.clone(),
        params: params.clone(),
      });
    }
    for child in &self.children {
      let Some(key) = &child.key else { continue };
      if key.is_greedy() {
        // `**` swallows whatever remains without advancing the cursor.
        stack.push(KeyRank::Wildcard);
        child.explore(segments, depth, stack, params, out);
        stack.pop();
        continue;
      }
      let Some(segment) = segments.get(depth) else {
        continue;
      };
      if !key.matches(segment) {
        continue;
      }
      stack.push(key.rank());
      if let RouterKey::Param { name, .. } = key {
        let mut branch = params.clone();
        branch.insert(name.clone(), segment.clone());
        child.explore(segments, depth + 1, stack, &branch, out);
      } else {
        child.explore(segments, depth + 1, stack, params, out);
      }
      stack.pop();
    }
  }
}

/// Picks the winning candidate: greatest consumed depth, then
/// position-wise stack specificity, a shorter stack on a tie, and the
/// first-collected candidate on full ties.
pub fn pick(candidates: Vec<RouteCandidate>) -> Option<RouteCandidate> {
  let mut best: Option<RouteCandidate> = None;
  for candidate in candidates {
    match &best {
      None => best = Some(candidate),
      Some(incumbent) => {
        if beats(&candidate, incumbent) {
          best = Some(candidate);
        }
      }
    }
  }
  best
}

fn beats(challenger: &RouteCandidate, incumbent: &RouteCandidate) -> bool {
  if challenger.depth != incumbent.depth {
    return challenger.depth > incumbent.depth;
  }
  more_specific(&challenger.stack, &incumbent.stack) == Ordering::Less
}

/// `Less` means more specific: the first differing rank decides, and an
/// exhausted stack beats a continuing one.
fn more_specific(a: &[KeyRank], b: &[KeyRank]) -> Ordering {
  for (x, y) in a.iter().zip(b.iter()) {
    match x.cmp(y) {
      Ordering::Equal => continue,
      other => return other,
    }
  }
  a.len().cmp(&b.len())
}
