//! Shared list of visited container labels.

use std::sync::{Arc, Mutex, MutexGuard};

/// Visited-container list shared by a request lineage and its response.
///
/// Cloning shares the handle; [`Trace::fork`] copies the entries into a
/// fresh handle so replica branches diverge from the common prefix.
#[derive(Debug, Clone, Default)]
pub struct Trace {
  entries: Arc<Mutex<Vec<String>>>,
}

impl Trace {
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends one visited-container label.
  pub fn push(&self, label: impl Into<String>) {
    self.lock().push(label.into());
  }

  /// Copy of the entries so far.
  pub fn snapshot(&self) -> Vec<String> {
    self.lock().clone()
  }

  /// Independent trace seeded with a copy of the current entries.
  pub fn fork(&self) -> Trace {
    Trace {
      entries: Arc::new(Mutex::new(self.snapshot())),
    }
  }

  pub fn len(&self) -> usize {
    self.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  fn lock(&self) -> MutexGuard<'_, Vec<String>> {
    self.entries.lock().unwrap_or_else(|e| e.into_inner())
  }
}
