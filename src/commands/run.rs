//! `shipline run` - execute the build-and-release pipeline for a tag
//!
//! Dry-run by default: shows the plan and exits. `--apply` builds every
//! configured platform in parallel and publishes the release.

use crate::core::config::ShipConfig;
use crate::core::error::{ShipError, ShipResult};
use crate::pipeline::{Pipeline, PipelinePlan};
use crate::publish::{Credentials, GhHost};
use crate::toolchain::CargoToolchain;
use std::env;

/// Environment variable the CI trigger surfaces the pushed tag through
pub const TAG_ENV: &str = "SHIPLINE_TAG";

/// Run the pipeline command
pub fn run_run(tag: Option<String>, apply: bool, json: bool) -> ShipResult<()> {
  let workspace = env::current_dir()?;
  let config = ShipConfig::load(&workspace)?;
  let tag = resolve_tag(tag)?;

  if !apply {
    let plan = PipelinePlan::new(&config, &tag);
    if json {
      println!("{}", plan.to_json()?);
    } else {
      println!("{}", plan.format_table());
      println!("💡 This was a dry-run. Use --apply to build and publish.");
    }
    return Ok(());
  }

  // Credentials are resolved up front so a missing token fails before any
  // build work starts
  let credentials = Credentials::from_env(&config.release.token_env)?;
  let toolchain = CargoToolchain::new(&workspace, &config.build.program);
  let host = GhHost::new(&config.release.repository, credentials);

  let pipeline = Pipeline::new(&config, &workspace, &toolchain, &host).with_progress(!json);
  let report = pipeline.run(&tag)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
  }

  Ok(())
}

/// Resolve the triggering tag: `--tag` wins, then the CI environment
pub fn resolve_tag(tag: Option<String>) -> ShipResult<String> {
  if let Some(tag) = tag {
    return Ok(tag);
  }

  match env::var(TAG_ENV) {
    Ok(tag) if !tag.is_empty() => Ok(tag),
    _ => Err(ShipError::with_help(
      "No release tag given",
      format!("Pass --tag v1.2.3 or export {} from the CI trigger.", TAG_ENV),
    )),
  }
}
