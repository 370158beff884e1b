//! Routing engine: pattern keys, the route trie, and the path diverter.

pub mod diverter;
pub mod key;
#[cfg(test)]
mod key_test;
pub mod trie;
#[cfg(test)]
mod trie_test;

pub use diverter::PathRouter;
pub use key::{KeyRank, RouterKey, SegmentPattern};
pub use trie::{pick, RouteCandidate, RouterNode};
