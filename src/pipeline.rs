//! End-to-end pipeline: fan-out builds, success gate, publish
//!
//! One directed pipeline, nothing general-purpose: tag in, release with one
//! asset per platform out. The dry-run plan shows exactly what a run would
//! do, in table or JSON form for CI consumption.

use crate::cache::DependencyCache;
use crate::coordinator::{self, CoordinatorResult};
use crate::core::config::ShipConfig;
use crate::core::error::{ShipError, ShipResult};
use crate::publish::{self, PublishReport, ReleaseHost};
use crate::runner::PlatformRunner;
use crate::store::ArtifactStore;
use crate::toolchain::Toolchain;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What a pipeline run would do for one tag
#[derive(Debug, Clone, Serialize)]
pub struct PipelinePlan {
  pub tag: String,
  pub program: String,
  pub repository: String,
  pub platforms: Vec<PlannedPlatform>,
}

/// Per-platform naming a run would use
#[derive(Debug, Clone, Serialize)]
pub struct PlannedPlatform {
  pub os_label: String,
  pub suffix: String,
  pub binary_file: String,
  pub artifact_name: String,
  pub asset_name: String,
}

impl PipelinePlan {
  /// Derive the plan from config and the triggering tag
  pub fn new(config: &ShipConfig, tag: &str) -> Self {
    let program = &config.build.program;
    Self {
      tag: tag.to_string(),
      program: program.clone(),
      repository: config.release.repository.clone(),
      platforms: config
        .platforms
        .iter()
        .map(|p| PlannedPlatform {
          os_label: p.os_label.clone(),
          suffix: p.suffix.clone(),
          binary_file: p.binary_file_name(program),
          artifact_name: p.artifact_name(),
          asset_name: p.asset_name(program),
        })
        .collect(),
    }
  }

  /// Output as human-readable table
  pub fn format_table(&self) -> String {
    let mut output = format!("🚀 Pipeline Plan for {}\n\n", self.tag);
    output.push_str(&format!("Program:    {}\n", self.program));
    output.push_str(&format!("Repository: {}\n\n", self.repository));

    output.push_str("Platform          Binary          Artifact                 Asset\n");
    output.push_str("─────────────────────────────────────────────────────────────────────────\n");

    for platform in &self.platforms {
      output.push_str(&format!(
        "{:<17} {:<15} {:<24} {}\n",
        platform.suffix, platform.binary_file, platform.artifact_name, platform.asset_name
      ));
    }

    output.push_str(&format!(
      "\nRelease: tag {} (draft=false, prerelease=false), {} asset(s)\n",
      self.tag,
      self.platforms.len()
    ));

    output
  }

  /// Output as JSON for CI
  pub fn to_json(&self) -> ShipResult<String> {
    Ok(serde_json::to_string_pretty(self)?)
  }
}

/// Final report of a successful pipeline run
#[derive(Debug, Serialize)]
pub struct PipelineReport {
  pub tag: String,
  pub started_at: DateTime<Utc>,
  pub finished_at: DateTime<Utc>,
  pub builds: CoordinatorResult,
  pub publish: PublishReport,
}

/// The assembled pipeline with its external collaborators injected.
///
/// Configuration and credentials are passed in at construction; nothing in
/// the pipeline reads ambient process state.
pub struct Pipeline<'a> {
  config: &'a ShipConfig,
  workspace: PathBuf,
  toolchain: &'a dyn Toolchain,
  host: &'a dyn ReleaseHost,
  show_progress: bool,
}

impl<'a> Pipeline<'a> {
  /// Create a pipeline over the given workspace and collaborators
  pub fn new(config: &'a ShipConfig, workspace: impl Into<PathBuf>, toolchain: &'a dyn Toolchain, host: &'a dyn ReleaseHost) -> Self {
    Self {
      config,
      workspace: workspace.into(),
      toolchain,
      host,
      show_progress: false,
    }
  }

  /// Enable per-platform progress bars during the build phase
  pub fn with_progress(mut self, show: bool) -> Self {
    self.show_progress = show;
    self
  }

  /// Execute the full pipeline for `tag`.
  ///
  /// Fan-out builds join before the gate is evaluated; publishing runs only
  /// when every platform succeeded. On coordination failure the artifacts
  /// of successful siblings stay in the run-scoped store, unused.
  pub fn run(&self, tag: &str) -> ShipResult<PipelineReport> {
    let started_at = Utc::now();

    let store = ArtifactStore::new();
    let cache = DependencyCache::new(
      absolute(&self.workspace, &self.config.build.cache_dir),
      &self.workspace,
      self.config.build.cache_paths.clone(),
    );
    let lock_file = absolute(&self.workspace, &self.config.build.lock_file);
    let runner = PlatformRunner::new(self.toolchain, &cache, &store, lock_file);

    println!(
      "🔨 Building {} for {} platform(s)",
      self.config.build.program,
      self.config.platforms.len()
    );

    let builds = coordinator::run_all(&runner, &self.config.platforms, self.show_progress);

    for result in &builds.results {
      match result.failed_stage() {
        None => println!("✅ [{}] build and tests passed", result.platform.suffix),
        Some(stage) => println!("❌ [{}] failed at {} stage", result.platform.suffix, stage),
      }
    }

    if !builds.is_success() {
      return Err(ShipError::Coordination(builds.coordination_error()));
    }

    let publish = publish::publish(
      self.host,
      &store,
      &self.config.build.program,
      tag,
      &self.config.platforms,
      self.config.release.upload_attempts,
    )?;

    let finished_at = Utc::now();
    println!(
      "🎉 Published release {} with {} asset(s) in {}s",
      tag,
      publish.assets.len(),
      (finished_at - started_at).num_seconds()
    );

    Ok(PipelineReport {
      tag: tag.to_string(),
      started_at,
      finished_at,
      builds,
      publish,
    })
  }
}

fn absolute(workspace: &Path, path: &Path) -> PathBuf {
  if path.is_absolute() {
    path.to_path_buf()
  } else {
    workspace.join(path)
  }
}
