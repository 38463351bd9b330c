//! Run-scoped artifact store between the build and publish stages

use crate::core::error::{ShipError, ShipResult, StoreError};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory artifact store shared by the parallel platform runners.
///
/// Artifacts live only for the duration of one pipeline run. Writers never
/// target the same name within a run, so a plain mutexed map is enough;
/// `put` is an idempotent whole-value overwrite.
#[derive(Default)]
pub struct ArtifactStore {
  artifacts: Mutex<HashMap<String, Vec<u8>>>,
}

impl ArtifactStore {
  /// Create an empty store
  pub fn new() -> Self {
    Self::default()
  }

  /// Store `bytes` under `name`, overwriting any prior entry
  pub fn put(&self, name: impl Into<String>, bytes: Vec<u8>) {
    let mut artifacts = self.artifacts.lock().unwrap_or_else(|e| e.into_inner());
    artifacts.insert(name.into(), bytes);
  }

  /// Retrieve the artifact stored under `name`
  pub fn get(&self, name: &str) -> ShipResult<Vec<u8>> {
    let artifacts = self.artifacts.lock().unwrap_or_else(|e| e.into_inner());
    artifacts
      .get(name)
      .cloned()
      .ok_or_else(|| ShipError::Store(StoreError::NotFound { name: name.to_string() }))
  }

  /// Names of all stored artifacts, sorted
  pub fn names(&self) -> Vec<String> {
    let artifacts = self.artifacts.lock().unwrap_or_else(|e| e.into_inner());
    let mut names: Vec<String> = artifacts.keys().cloned().collect();
    names.sort();
    names
  }

  /// Number of stored artifacts
  pub fn len(&self) -> usize {
    self.artifacts.lock().unwrap_or_else(|e| e.into_inner()).len()
  }

  /// Whether the store is empty
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}
