//! Platform build runner: install, restore cache, build, test, register artifact
//!
//! One runner executes per configured platform. The first failing step ends
//! that runner without touching its siblings. Cache trouble is logged and
//! otherwise ignored; it only costs the fast path.

use crate::cache::{CacheKey, DependencyCache};
use crate::core::error::{BuildStage, ShipError};
use crate::core::platform::Platform;
use crate::store::ArtifactStore;
use crate::toolchain::Toolchain;
use serde::Serialize;
use std::path::PathBuf;

/// Terminal state of one platform build
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BuildStatus {
  /// Build and tests passed; the binary was registered as an artifact
  Success { binary_path: PathBuf },

  /// A step exited non-zero; remaining steps were skipped
  Failure { stage: BuildStage, reason: String },
}

/// Immutable result of one platform build, produced once per run
#[derive(Debug, Clone, Serialize)]
pub struct BuildResult {
  pub platform: Platform,
  #[serde(flatten)]
  pub status: BuildStatus,
}

impl BuildResult {
  /// Whether this platform build fully succeeded
  pub fn is_success(&self) -> bool {
    matches!(self.status, BuildStatus::Success { .. })
  }

  /// Stage of failure, if any
  pub fn failed_stage(&self) -> Option<BuildStage> {
    match &self.status {
      BuildStatus::Failure { stage, .. } => Some(*stage),
      BuildStatus::Success { .. } => None,
    }
  }
}

/// Runs the build steps for a single platform
pub struct PlatformRunner<'a> {
  toolchain: &'a dyn Toolchain,
  cache: &'a DependencyCache,
  store: &'a ArtifactStore,
  lock_file: PathBuf,
}

impl<'a> PlatformRunner<'a> {
  /// Create a runner over the shared toolchain, cache, and artifact store
  pub fn new(
    toolchain: &'a dyn Toolchain,
    cache: &'a DependencyCache,
    store: &'a ArtifactStore,
    lock_file: impl Into<PathBuf>,
  ) -> Self {
    Self {
      toolchain,
      cache,
      store,
      lock_file: lock_file.into(),
    }
  }

  /// Execute all build steps for `platform`, yielding its terminal state.
  ///
  /// Step order: install toolchain, restore cache, release build, test
  /// suite. On success the cache is saved and exactly one artifact named
  /// `binary-<suffix>` is registered.
  pub fn run(&self, platform: &Platform) -> BuildResult {
    if let Err(err) = self.toolchain.install(platform) {
      return failure(platform, BuildStage::Install, err);
    }

    // Cache acceleration is best-effort from here on
    let key = match CacheKey::for_lock_file(&platform.os_label, &self.lock_file) {
      Ok(key) => Some(key),
      Err(err) => {
        eprintln!("⚠️  [{}] no cache key, continuing uncached: {}", platform.suffix, err);
        None
      }
    };

    if let Some(key) = &key {
      match self.cache.restore(key) {
        Ok(true) => println!("📦 [{}] cache hit ({})", platform.suffix, key),
        Ok(false) => println!("📦 [{}] cache miss ({})", platform.suffix, key),
        Err(err) => eprintln!("⚠️  [{}] {}", platform.suffix, err),
      }
    }

    let binary_path = match self.toolchain.build(platform) {
      Ok(path) => path,
      Err(err) => return failure(platform, BuildStage::Build, err),
    };

    if let Err(err) = self.toolchain.test(platform) {
      return failure(platform, BuildStage::Test, err);
    }

    if let Some(key) = &key
      && let Err(err) = self.cache.save(key)
    {
      eprintln!("⚠️  [{}] {}", platform.suffix, err);
    }

    let bytes = match std::fs::read(&binary_path) {
      Ok(bytes) => bytes,
      Err(err) => {
        return failure(
          platform,
          BuildStage::Build,
          ShipError::message(format!("failed to read binary {}: {}", binary_path.display(), err)),
        );
      }
    };

    self.store.put(platform.artifact_name(), bytes);

    BuildResult {
      platform: platform.clone(),
      status: BuildStatus::Success { binary_path },
    }
  }
}

fn failure(platform: &Platform, fallback_stage: BuildStage, err: ShipError) -> BuildResult {
  let stage = match &err {
    ShipError::Toolchain(e) => e.stage,
    _ => fallback_stage,
  };

  BuildResult {
    platform: platform.clone(),
    status: BuildStatus::Failure {
      stage,
      reason: err.to_string(),
    },
  }
}
