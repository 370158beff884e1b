//! Pattern-segment classification and matching.

use regex::Regex;

use crate::error::WiringError;

/// Specificity rank of a key; variants are ordered most-specific first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyRank {
  Path,
  Param,
  Wildcard,
}

/// One classified segment of a route pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum RouterKey {
  /// Literal segment, matched by string equality.
  Path(String),
  /// `{name}` or `{name:regex}` capture.
  Param {
    name: String,
    pattern: Option<SegmentPattern>,
  },
  /// `*` (exactly one segment) or `**` (the rest of the path).
  Wildcard { greedy: bool },
}

/// Compiled `{name:regex}` constraint, anchored to the whole segment.
#[derive(Debug, Clone)]
pub struct SegmentPattern {
  raw: String,
  regex: Regex,
}

impl SegmentPattern {
  fn compile(pattern: &str, segment: &str, raw: &str) -> Result<Self, WiringError> {
    let regex = Regex::new(&format!("^(?:{raw})$")).map_err(|e| WiringError::BadSegment {
      pattern: pattern.to_string(),
      segment: segment.to_string(),
      detail: e.to_string(),
    })?;
    Ok(Self {
      raw: raw.to_string(),
      regex,
    })
  }

  pub fn is_match(&self, segment: &str) -> bool {
    self.regex.is_match(segment)
  }

  pub fn raw(&self) -> &str {
    &self.raw
  }
}

impl PartialEq for SegmentPattern {
  fn eq(&self, other: &Self) -> bool {
    self.raw == other.raw
  }
}

impl Eq for SegmentPattern {}

impl RouterKey {
  /// Classifies one pattern segment.
  pub fn parse(pattern: &str, segment: &str) -> Result<RouterKey, WiringError> {
    if segment == "**" {
      return Ok(RouterKey::Wildcard { greedy: true });
    }
    if segment == "*" {
      return Ok(RouterKey::Wildcard { greedy: false });
    }
    if let Some(inner) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
      let (name, constraint) = match inner.split_once(':') {
        Some((name, raw)) => (name, Some(raw)),
        None => (inner, None),
      };
      if name.is_empty() {
        return Err(WiringError::BadSegment {
          pattern: pattern.to_string(),
          segment: segment.to_string(),
          detail: "empty parameter name".to_string(),
        });
      }
      let compiled = match constraint {
        Some(raw) => Some(SegmentPattern::compile(pattern, segment, raw)?),
        None => None,
      };
      return Ok(RouterKey::Param {
        name: name.to_string(),
        pattern: compiled,
      });
    }
    Ok(RouterKey::Path(segment.to_string()))
  }

  /// True when this key accepts the request segment.
  pub fn matches(&self, segment: &str) -> bool {
    match self {
      RouterKey::Path(literal) => literal == segment,
      RouterKey::Param {
        pattern: Some(p), ..
      } => p.is_match(segment),
      RouterKey::Param { pattern: None, .. } => true,
      RouterKey::Wildcard { .. } => true,
    }
  }

  pub fn rank(&self) -> KeyRank {
    match self {
      RouterKey::Path(_) => KeyRank::Path,
      RouterKey::Param { .. } => KeyRank::Param,
      RouterKey::Wildcard { .. } => KeyRank::Wildcard,
    }
  }

  pub fn is_greedy(&self) -> bool {
    matches!(self, RouterKey::Wildcard { greedy: true })
  }
}

/// Splits a route pattern on `/`, keeping `{…}` spans atomic so a regex
/// constraint may contain slashes. Leading and trailing slashes are
/// insignificant.
pub(crate) fn split_pattern(pattern: &str) -> Vec<String> {
  let mut out = Vec::new();
  let mut current = String::new();
  let mut depth = 0usize;
  for ch in pattern.chars() {
    match ch {
      '{' => {
        depth += 1;
        current.push(ch);
      }
      '}' => {
        depth = depth.saturating_sub(1);
        current.push(ch);
      }
      '/' if depth == 0 => {
        if !current.is_empty() {
          out.push(std::mem::take(&mut current));
        }
      }
      _ => current.push(ch),
    }
  }
  if !current.is_empty() {
    out.push(current);
  }
  out
}

/// Classifies a full pattern; `**` may only be the last segment.
pub(crate) fn parse_pattern(pattern: &str) -> Result<Vec<RouterKey>, WiringError> {
  let keys = split_pattern(pattern)
    .iter()
    .map(|segment| RouterKey::parse(pattern, segment))
    .collect::<Result<Vec<_>, _>>()?;
  if let Some(pos) = keys.iter().position(RouterKey::is_greedy) {
    if pos + 1 != keys.len() {
      return Err(WiringError::TrailingAfterGlob {
        pattern: pattern.to_string(),
      });
    }
  }
  Ok(keys)
}
