//! Dependency cache: content-addressed, keyed by the lock file, scoped per OS
//!
//! The cache is the only cross-run state in the pipeline. Entries are whole
//! directory snapshots; a save replaces the entire entry (last-writer-wins).
//! Cache failures never fail a build, they only lose the fast path.

use crate::core::error::{CacheError, ShipError, ShipResult};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Distinguishes staging directories of concurrent in-process savers
static STAGING_SEQ: AtomicU64 = AtomicU64::new(0);

/// Cache key derived from the OS label and the lock-file contents.
///
/// Identical lock bytes and OS always produce the same key; any lock change
/// invalidates every entry sharing that OS.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
  /// Derive a key from an OS label and raw lock-file bytes
  pub fn new(os_label: &str, lock_contents: &[u8]) -> Self {
    let mut hasher = Sha256::new();
    hasher.update(os_label.as_bytes());
    hasher.update([0u8]);
    hasher.update(lock_contents);
    let digest = hasher.finalize();
    Self(format!("{}-{:x}", os_label, digest))
  }

  /// Derive a key by reading the lock file from disk
  pub fn for_lock_file(os_label: &str, lock_file: &Path) -> ShipResult<Self> {
    let contents = fs::read(lock_file)?;
    Ok(Self::new(os_label, &contents))
  }

  /// Full key string (also the entry directory name)
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Shortened form for log lines
  pub fn short(&self) -> &str {
    &self.0[..24.min(self.0.len())]
  }
}

impl fmt::Display for CacheKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.short())
  }
}

/// Directory-backed dependency cache.
///
/// Each entry lives under `root/<key>/` and holds a snapshot of every
/// configured cache path, relative to the workspace root.
pub struct DependencyCache {
  root: PathBuf,
  workspace: PathBuf,
  paths: Vec<PathBuf>,
}

impl DependencyCache {
  /// Create a cache over the given store root and workspace
  pub fn new(root: impl Into<PathBuf>, workspace: impl Into<PathBuf>, paths: Vec<PathBuf>) -> Self {
    Self {
      root: root.into(),
      workspace: workspace.into(),
      paths,
    }
  }

  fn entry_dir(&self, key: &CacheKey) -> PathBuf {
    self.root.join(key.as_str())
  }

  /// Restore the entry for `key` into the workspace.
  ///
  /// Returns whether a hit occurred. A miss is not an error; the caller
  /// proceeds on the slow path and saves afterwards.
  pub fn restore(&self, key: &CacheKey) -> ShipResult<bool> {
    let entry = self.entry_dir(key);
    if !entry.is_dir() {
      return Ok(false);
    }

    for path in &self.paths {
      let src = entry.join(path);
      if !src.exists() {
        continue;
      }
      let dst = self.workspace.join(path);
      copy_dir_recursive(&src, &dst).map_err(|e| {
        ShipError::Cache(CacheError::Restore {
          key: key.as_str().to_string(),
          reason: e.to_string(),
        })
      })?;
    }

    Ok(true)
  }

  /// Save the configured paths under `key`, replacing any prior entry.
  ///
  /// The snapshot is staged next to the entry and swapped in with a rename,
  /// so concurrent writers to the same key are last-writer-wins and never
  /// leave a torn entry behind.
  pub fn save(&self, key: &CacheKey) -> ShipResult<()> {
    let result = self.save_inner(key);
    result.map_err(|e| {
      ShipError::Cache(CacheError::Save {
        key: key.as_str().to_string(),
        reason: e.to_string(),
      })
    })
  }

  fn save_inner(&self, key: &CacheKey) -> std::io::Result<()> {
    fs::create_dir_all(&self.root)?;

    // Staging must be unique per invocation: savers of the same key run
    // concurrently when platforms share an os_label, and a shared staging
    // path would let their copy loops interleave into one torn entry.
    let seq = STAGING_SEQ.fetch_add(1, Ordering::Relaxed);
    let staging = self
      .root
      .join(format!(".staging-{}-{}-{}", key.short(), std::process::id(), seq));
    fs::create_dir_all(&staging)?;

    let result = self.snapshot_into(&staging).and_then(|()| self.swap_in(key, &staging));
    if result.is_err() {
      fs::remove_dir_all(&staging).ok();
    }
    result
  }

  fn snapshot_into(&self, staging: &Path) -> std::io::Result<()> {
    for path in &self.paths {
      let src = self.workspace.join(path);
      if !src.exists() {
        continue;
      }
      copy_dir_recursive(&src, &staging.join(path))?;
    }
    Ok(())
  }

  fn swap_in(&self, key: &CacheKey, staging: &Path) -> std::io::Result<()> {
    let entry = self.entry_dir(key);

    // The rename either installs the whole snapshot or fails; the entry is
    // never a mix of writers. A concurrent saver may install its entry
    // between our remove and rename, so replace it once more before giving
    // up and letting the caller log the lost save.
    if entry.exists() {
      fs::remove_dir_all(&entry).ok();
    }
    if fs::rename(staging, &entry).is_ok() {
      return Ok(());
    }

    fs::remove_dir_all(&entry).ok();
    fs::rename(staging, &entry)
  }
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
  if src.is_file() {
    if let Some(parent) = dst.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::copy(src, dst)?;
    return Ok(());
  }

  fs::create_dir_all(dst)?;
  for entry in fs::read_dir(src)? {
    let entry = entry?;
    let from = entry.path();
    let to = dst.join(entry.file_name());
    if entry.file_type()?.is_dir() {
      copy_dir_recursive(&from, &to)?;
    } else {
      fs::copy(&from, &to)?;
    }
  }
  Ok(())
}
