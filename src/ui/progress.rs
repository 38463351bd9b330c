//! Progress indicators for long-running operations
//!
//! Uses `linya` for allocation-free, concurrency-optimized progress bars.
//! The mutex wrapper lets rayon workers draw from multiple threads.

use linya::{Bar, Progress};
use std::sync::Mutex;

/// Multi-bar progress safe to share across parallel build workers
pub struct ParallelProgress {
  progress: Mutex<Progress>,
}

impl ParallelProgress {
  /// Create a new progress container
  pub fn new() -> Self {
    Self {
      progress: Mutex::new(Progress::new()),
    }
  }

  /// Add a new bar with a label and total
  pub fn add_bar(&self, total: usize, label: impl Into<String>) -> Bar {
    let mut progress = self.progress.lock().unwrap_or_else(|e| e.into_inner());
    progress.bar(total, label.into())
  }

  /// Increment a bar by 1
  pub fn inc(&self, bar: &Bar) {
    let mut progress = self.progress.lock().unwrap_or_else(|e| e.into_inner());
    progress.inc_and_draw(bar, 1);
  }

  /// Set a bar to a specific value
  #[allow(dead_code)]
  pub fn set(&self, bar: &Bar, pos: usize) {
    let mut progress = self.progress.lock().unwrap_or_else(|e| e.into_inner());
    progress.set_and_draw(bar, pos);
  }
}

impl Default for ParallelProgress {
  fn default() -> Self {
    Self::new()
  }
}
