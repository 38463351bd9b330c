//! Platform build runner: step ordering, artifact registration, cache saves

use crate::helpers::{FakeToolchain, TestWorkspace};
use anyhow::Result;
use shipline::cache::DependencyCache;
use shipline::core::error::BuildStage;
use shipline::core::platform::default_platforms;
use shipline::runner::PlatformRunner;
use shipline::store::ArtifactStore;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_successful_run_registers_one_artifact() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let cache_root = TempDir::new()?;
  let toolchain = FakeToolchain::new(&ws.path, "rodbot");
  let cache = DependencyCache::new(cache_root.path(), &ws.path, vec![PathBuf::from("target")]);
  let store = ArtifactStore::new();
  let runner = PlatformRunner::new(&toolchain, &cache, &store, ws.path.join("Cargo.lock"));

  let linux = default_platforms().remove(0);
  let result = runner.run(&linux);

  assert!(result.is_success());
  assert_eq!(store.len(), 1);
  assert_eq!(store.get("binary-linux-amd64")?, b"binary for linux-amd64".to_vec());

  // Success saves the cache entry for this lock file and OS
  let entries: Vec<_> = std::fs::read_dir(cache_root.path())?
    .filter_map(|e| e.ok())
    .map(|e| e.file_name().to_string_lossy().to_string())
    .collect();
  assert!(entries.iter().any(|name| name.starts_with("linux-")));

  Ok(())
}

#[test]
fn test_install_failure_skips_remaining_steps() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let cache_root = TempDir::new()?;
  let toolchain = FakeToolchain::new(&ws.path, "rodbot").fail("linux-amd64", BuildStage::Install);
  let cache = DependencyCache::new(cache_root.path(), &ws.path, vec![]);
  let store = ArtifactStore::new();
  let runner = PlatformRunner::new(&toolchain, &cache, &store, ws.path.join("Cargo.lock"));

  let linux = default_platforms().remove(0);
  let result = runner.run(&linux);

  assert_eq!(result.failed_stage(), Some(BuildStage::Install));
  assert!(store.is_empty());

  let calls = toolchain.calls.lock().unwrap().clone();
  assert_eq!(calls, vec!["linux-amd64:install"], "no step runs after the failure");

  Ok(())
}

#[test]
fn test_test_failure_leaves_no_artifact() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let cache_root = TempDir::new()?;
  let toolchain = FakeToolchain::new(&ws.path, "rodbot").fail("linux-amd64", BuildStage::Test);
  let cache = DependencyCache::new(cache_root.path(), &ws.path, vec![]);
  let store = ArtifactStore::new();
  let runner = PlatformRunner::new(&toolchain, &cache, &store, ws.path.join("Cargo.lock"));

  let linux = default_platforms().remove(0);
  let result = runner.run(&linux);

  assert!(!result.is_success());
  assert_eq!(result.failed_stage(), Some(BuildStage::Test));
  assert!(store.is_empty(), "artifacts register only on full success");

  Ok(())
}

#[test]
fn test_missing_lock_file_degrades_without_failing() -> Result<()> {
  let ws = TestWorkspace::new()?;
  std::fs::remove_file(ws.path.join("Cargo.lock"))?;

  let cache_root = TempDir::new()?;
  let toolchain = FakeToolchain::new(&ws.path, "rodbot");
  let cache = DependencyCache::new(cache_root.path(), &ws.path, vec![]);
  let store = ArtifactStore::new();
  let runner = PlatformRunner::new(&toolchain, &cache, &store, ws.path.join("Cargo.lock"));

  let linux = default_platforms().remove(0);
  let result = runner.run(&linux);

  assert!(result.is_success(), "cache trouble must never fail a build");
  Ok(())
}
