//! Build coordinator: parallel fan-out over platforms, all-success gate
//!
//! The coordinator's join point is the only synchronization barrier in the
//! pipeline. It always waits for every runner, even after a failure, so no
//! partial artifacts are left dangling, then evaluates the gate.

use crate::core::error::{BuildStage, CoordinationError};
use crate::core::platform::Platform;
use crate::runner::{BuildResult, PlatformRunner};
use crate::ui::progress::ParallelProgress;
use rayon::prelude::*;
use serde::Serialize;

/// Results of one coordinated fan-out, ordered by platform
#[derive(Debug, Serialize)]
pub struct CoordinatorResult {
  pub results: Vec<BuildResult>,
}

impl CoordinatorResult {
  /// Success iff every platform build succeeded
  pub fn is_success(&self) -> bool {
    self.results.iter().all(|r| r.is_success())
  }

  /// (suffix, failed stage) for every failed platform
  pub fn failed(&self) -> Vec<(String, BuildStage)> {
    self
      .results
      .iter()
      .filter_map(|r| r.failed_stage().map(|stage| (r.platform.suffix.clone(), stage)))
      .collect()
  }

  /// Build the coordination error for a failed run
  pub fn coordination_error(&self) -> CoordinationError {
    CoordinationError { failed: self.failed() }
  }
}

/// Fan out one platform build per configured platform and join.
///
/// Builds are independent parallel units of work with no shared mutable
/// state beyond the cache namespace and the artifact store. Results come
/// back in configuration order regardless of completion order.
pub fn run_all(runner: &PlatformRunner<'_>, platforms: &[Platform], show_progress: bool) -> CoordinatorResult {
  let progress = show_progress.then(|| {
    let progress = ParallelProgress::new();
    let bar = progress.add_bar(platforms.len(), "platform builds".to_string());
    (progress, bar)
  });

  let results: Vec<BuildResult> = platforms
    .par_iter()
    .map(|platform| {
      let result = runner.run(platform);
      if let Some((progress, bar)) = &progress {
        progress.inc(bar);
      }
      result
    })
    .collect();

  CoordinatorResult { results }
}
