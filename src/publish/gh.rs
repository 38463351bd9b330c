//! GitHub release hosting via the gh CLI
//!
//! Drives the REST API through `gh api` so shipline carries no HTTP stack.
//! The token is injected into each child process explicitly; nothing here
//! reads ambient credentials.

use super::{ASSET_CONTENT_TYPE, Credentials, ReleaseHost, ReleaseRecord};
use crate::core::error::{ShipError, ShipResult};
use chrono::Utc;
use std::path::PathBuf;
use std::process::Command;

/// Release host backed by `gh api` against one repository
pub struct GhHost {
  repository: String,
  credentials: Credentials,
}

impl GhHost {
  /// Create a host for "owner/name" with explicit credentials
  pub fn new(repository: impl Into<String>, credentials: Credentials) -> Self {
    Self {
      repository: repository.into(),
      credentials,
    }
  }

  /// Create a gh subprocess with an isolated environment
  ///
  /// - Clears environment variables
  /// - Whitelists only PATH and HOME
  /// - Injects the token as GH_TOKEN
  fn gh_cmd(&self) -> Command {
    let mut cmd = Command::new("gh");

    cmd.env_clear();
    for var in ["PATH", "HOME"] {
      if let Ok(value) = std::env::var(var) {
        cmd.env(var, value);
      }
    }
    cmd.env("GH_TOKEN", &self.credentials.token);

    cmd
  }

  fn run(&self, mut cmd: Command, what: &str) -> ShipResult<Vec<u8>> {
    let output = cmd
      .output()
      .map_err(|e| ShipError::message(format!("Failed to execute gh for {}: {}", what, e)))?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ShipError::message(format!("gh {} failed: {}", what, stderr.trim())));
    }

    Ok(output.stdout)
  }
}

impl ReleaseHost for GhHost {
  fn create_release(&self, tag: &str, title: &str) -> ShipResult<ReleaseRecord> {
    let mut cmd = self.gh_cmd();
    cmd
      .args(["api", "--method", "POST"])
      .arg(format!("repos/{}/releases", self.repository))
      .args(["-f", &format!("tag_name={}", tag)])
      .args(["-f", &format!("name={}", title)])
      .args(["-F", "draft=false"])
      .args(["-F", "prerelease=false"]);

    let stdout = self.run(cmd, "release creation")?;
    let response: serde_json::Value = serde_json::from_slice(&stdout)?;

    let upload_url = response
      .get("upload_url")
      .and_then(|v| v.as_str())
      .ok_or_else(|| ShipError::message("Release creation response had no upload_url"))?;

    Ok(ReleaseRecord {
      tag: tag.to_string(),
      title: title.to_string(),
      draft: false,
      prerelease: false,
      upload_endpoint: strip_uri_template(upload_url).to_string(),
      created_at: Utc::now(),
    })
  }

  fn upload_asset(&self, record: &ReleaseRecord, asset_name: &str, bytes: &[u8]) -> ShipResult<()> {
    // gh api streams request bodies from a file, so stage the payload
    let staged = staging_path(asset_name);
    std::fs::write(&staged, bytes)?;

    let mut cmd = self.gh_cmd();
    cmd
      .args(["api", "--method", "POST"])
      .args(["-H", &format!("Content-Type: {}", ASSET_CONTENT_TYPE)])
      .arg(format!("{}?name={}", record.upload_endpoint, asset_name))
      .arg("--input")
      .arg(&staged);

    let result = self.run(cmd, "asset upload");
    std::fs::remove_file(&staged).ok();
    result?;

    Ok(())
  }
}

/// Drop the RFC 6570 `{?name,label}` suffix GitHub appends to upload URLs
fn strip_uri_template(url: &str) -> &str {
  match url.find('{') {
    Some(idx) => &url[..idx],
    None => url,
  }
}

fn staging_path(asset_name: &str) -> PathBuf {
  std::env::temp_dir().join(format!("shipline-{}-{}", std::process::id(), asset_name))
}
