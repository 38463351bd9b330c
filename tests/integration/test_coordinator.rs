//! Coordinator fan-out/join semantics and the all-success gate

use crate::helpers::{FakeToolchain, TestWorkspace};
use anyhow::Result;
use shipline::cache::DependencyCache;
use shipline::coordinator;
use shipline::core::error::BuildStage;
use shipline::core::platform::default_platforms;
use shipline::runner::PlatformRunner;
use shipline::store::ArtifactStore;
use tempfile::TempDir;

#[test]
fn test_success_iff_every_platform_succeeds() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let cache_root = TempDir::new()?;
  let toolchain = FakeToolchain::new(&ws.path, "rodbot");
  let cache = DependencyCache::new(cache_root.path(), &ws.path, vec![]);
  let store = ArtifactStore::new();
  let runner = PlatformRunner::new(&toolchain, &cache, &store, ws.path.join("Cargo.lock"));

  let platforms = default_platforms();
  let result = coordinator::run_all(&runner, &platforms, false);

  assert!(result.is_success());
  assert!(result.failed().is_empty());
  assert_eq!(result.results.len(), platforms.len());
  assert_eq!(store.len(), platforms.len(), "exactly one artifact per platform");

  Ok(())
}

#[test]
fn test_single_failure_fails_the_gate() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let cache_root = TempDir::new()?;
  let toolchain = FakeToolchain::new(&ws.path, "rodbot").fail("macos-amd64", BuildStage::Test);
  let cache = DependencyCache::new(cache_root.path(), &ws.path, vec![]);
  let store = ArtifactStore::new();
  let runner = PlatformRunner::new(&toolchain, &cache, &store, ws.path.join("Cargo.lock"));

  let platforms = default_platforms();
  let result = coordinator::run_all(&runner, &platforms, false);

  assert!(!result.is_success());
  assert_eq!(result.failed(), vec![("macos-amd64".to_string(), BuildStage::Test)]);

  // Join semantics: every sibling still reached a terminal state
  assert_eq!(result.results.len(), platforms.len());
  assert!(result.results[0].is_success());
  assert!(result.results[2].is_success());

  // Sibling artifacts exist in the store, unused
  assert!(store.get("binary-linux-amd64").is_ok());
  assert!(store.get("binary-windows-amd64").is_ok());
  assert!(store.get("binary-macos-amd64").is_err());

  Ok(())
}

#[test]
fn test_results_come_back_in_platform_order() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let cache_root = TempDir::new()?;
  let toolchain = FakeToolchain::new(&ws.path, "rodbot");
  let cache = DependencyCache::new(cache_root.path(), &ws.path, vec![]);
  let store = ArtifactStore::new();
  let runner = PlatformRunner::new(&toolchain, &cache, &store, ws.path.join("Cargo.lock"));

  let platforms = default_platforms();
  let result = coordinator::run_all(&runner, &platforms, false);

  let suffixes: Vec<&str> = result.results.iter().map(|r| r.platform.suffix.as_str()).collect();
  assert_eq!(suffixes, vec!["linux-amd64", "macos-amd64", "windows-amd64"]);

  Ok(())
}
