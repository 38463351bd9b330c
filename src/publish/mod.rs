//! Release publishing: one release record, one asset per platform
//!
//! Runs only after the coordinator gate. Creating the release record is
//! fatal on failure; asset uploads are retried with bounded attempts and a
//! post-retry failure surfaces the release as incomplete rather than
//! pretending it never existed.

pub mod gh;

pub use gh::GhHost;

use crate::core::error::{ReleaseError, ShipError, ShipResult};
use crate::core::platform::Platform;
use crate::store::ArtifactStore;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Content type for every uploaded asset
pub const ASSET_CONTENT_TYPE: &str = "application/octet-stream";

/// Hosting-platform token, injected explicitly at construction time
#[derive(Clone)]
pub struct Credentials {
  pub token: String,
}

impl Credentials {
  /// Read the token from the configured environment variable.
  ///
  /// This is the single ambient read; everything below the command layer
  /// receives the token by value.
  pub fn from_env(var: &str) -> ShipResult<Self> {
    let token = std::env::var(var).map_err(|_| {
      ShipError::with_help(
        format!("Release token not found in ${}", var),
        format!("Export a hosting-platform token: export {}=<token>", var),
      )
    })?;
    Ok(Self { token })
  }
}

/// One published release, created exactly once per pipeline run.
///
/// Never mutated after creation; `upload_endpoint` is the opaque handle the
/// hosting platform returned and is threaded explicitly into every upload.
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseRecord {
  pub tag: String,
  pub title: String,
  pub draft: bool,
  pub prerelease: bool,
  pub upload_endpoint: String,
  pub created_at: DateTime<Utc>,
}

/// One uploaded asset attached to the release
#[derive(Debug, Clone, Serialize)]
pub struct PublishedAsset {
  pub platform: String,
  pub asset_name: String,
  pub size: usize,
  pub attempts: u32,
}

/// Outcome of a fully successful publish
#[derive(Debug, Serialize)]
pub struct PublishReport {
  pub release: ReleaseRecord,
  pub assets: Vec<PublishedAsset>,
}

/// The hosting platform's release surface.
///
/// Treated as an opaque object store reachable over HTTP; implementations
/// own authentication and wire details.
pub trait ReleaseHost {
  /// Create the release record for `tag`, returning its upload endpoint
  fn create_release(&self, tag: &str, title: &str) -> ShipResult<ReleaseRecord>;

  /// Upload one asset to the record's endpoint with
  /// `Content-Type: application/octet-stream`
  fn upload_asset(&self, record: &ReleaseRecord, asset_name: &str, bytes: &[u8]) -> ShipResult<()>;
}

/// Create the release for `tag` and attach one asset per platform.
///
/// Uploads run sequentially; asset names are unique per platform so order
/// carries no meaning. Any asset still missing after `upload_attempts`
/// leaves the release live but incomplete, which is reported distinctly.
pub fn publish(
  host: &dyn ReleaseHost,
  store: &ArtifactStore,
  program: &str,
  tag: &str,
  platforms: &[Platform],
  upload_attempts: u32,
) -> ShipResult<PublishReport> {
  let title = format!("Release {}", tag);

  let release = host.create_release(tag, &title).map_err(|e| {
    ShipError::Release(ReleaseError::Creation {
      tag: tag.to_string(),
      reason: e.to_string(),
    })
  })?;

  println!("🏷️  Created release {} ({})", release.tag, release.title);

  let mut assets = Vec::new();
  let mut missing = Vec::new();

  for platform in platforms {
    let bytes = store.get(&platform.artifact_name())?;
    let asset_name = platform.asset_name(program);

    match upload_with_retry(host, &release, &platform.suffix, &asset_name, &bytes, upload_attempts) {
      Ok(attempts) => {
        println!("⬆️  [{}] uploaded {} ({} bytes)", platform.suffix, asset_name, bytes.len());
        assets.push(PublishedAsset {
          platform: platform.suffix.clone(),
          asset_name,
          size: bytes.len(),
          attempts,
        });
      }
      Err(err) => {
        crate::core::error::print_error(&err);
        missing.push(asset_name);
      }
    }
  }

  if !missing.is_empty() {
    return Err(ShipError::Release(ReleaseError::Incomplete {
      tag: tag.to_string(),
      missing,
    }));
  }

  Ok(PublishReport { release, assets })
}

fn upload_with_retry(
  host: &dyn ReleaseHost,
  release: &ReleaseRecord,
  platform: &str,
  asset_name: &str,
  bytes: &[u8],
  upload_attempts: u32,
) -> ShipResult<u32> {
  let mut last_reason = String::new();

  for attempt in 1..=upload_attempts {
    match host.upload_asset(release, asset_name, bytes) {
      Ok(()) => return Ok(attempt),
      Err(err) => {
        last_reason = err.to_string();
        if attempt < upload_attempts {
          eprintln!(
            "⚠️  upload of {} failed (attempt {}/{}), retrying: {}",
            asset_name, attempt, upload_attempts, last_reason
          );
        }
      }
    }
  }

  Err(ShipError::Release(ReleaseError::AssetUpload {
    platform: platform.to_string(),
    asset: asset_name.to_string(),
    attempts: upload_attempts,
    reason: last_reason,
  }))
}
