//! Configuration for shipline, stored in ship.toml

use crate::core::error::{ConfigError, ShipError, ShipResult};
use crate::core::platform::{Platform, default_platforms, validate_platforms};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file at the workspace root
pub const CONFIG_FILE: &str = "ship.toml";

/// Top-level shipline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipConfig {
  pub build: BuildConfig,
  pub release: ReleaseConfig,
  #[serde(default = "default_platforms")]
  pub platforms: Vec<Platform>,
}

/// How the program is built and where build state lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
  /// Name of the program being shipped (e.g. "rodbot")
  pub program: String,

  /// Dependency lock file whose contents key the cache
  #[serde(default = "default_lock_file")]
  pub lock_file: PathBuf,

  /// Root directory of the dependency cache (long-lived, cross-run)
  #[serde(default = "default_cache_dir")]
  pub cache_dir: PathBuf,

  /// Directories the cache restores and saves
  #[serde(default = "default_cache_paths")]
  pub cache_paths: Vec<PathBuf>,
}

/// Where releases are published
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseConfig {
  /// Hosting repository as "owner/name"
  pub repository: String,

  /// Environment variable holding the hosting-platform token.
  ///
  /// The token is read once at startup and injected explicitly; publish
  /// logic never reads ambient process state.
  #[serde(default = "default_token_env")]
  pub token_env: String,

  /// Bounded attempts per asset upload
  #[serde(default = "default_upload_attempts")]
  pub upload_attempts: u32,
}

fn default_lock_file() -> PathBuf {
  PathBuf::from("Cargo.lock")
}

fn default_cache_dir() -> PathBuf {
  PathBuf::from(".shipline/cache")
}

fn default_cache_paths() -> Vec<PathBuf> {
  vec![PathBuf::from("target")]
}

fn default_token_env() -> String {
  "GITHUB_TOKEN".to_string()
}

fn default_upload_attempts() -> u32 {
  3
}

impl ShipConfig {
  /// Load config from ship.toml
  pub fn load(path: &Path) -> ShipResult<Self> {
    let config_path = path.join(CONFIG_FILE);
    if !config_path.exists() {
      return Err(ShipError::Config(ConfigError::NotFound { path: config_path }));
    }
    let content = fs::read_to_string(&config_path)?;
    let config: ShipConfig = toml_edit::de::from_str(&content)?;
    config.validate()?;
    Ok(config)
  }

  /// Save config to ship.toml
  pub fn save(&self, path: &Path) -> ShipResult<()> {
    let config_path = path.join(CONFIG_FILE);
    let content = toml_edit::ser::to_string_pretty(self)?;
    fs::write(&config_path, content)?;
    Ok(())
  }

  /// Check if config exists at the given path
  pub fn exists(path: &Path) -> bool {
    path.join(CONFIG_FILE).exists()
  }

  /// Create a config with defaults for the given program and repository
  pub fn new(program: impl Into<String>, repository: impl Into<String>) -> Self {
    Self {
      build: BuildConfig {
        program: program.into(),
        lock_file: default_lock_file(),
        cache_dir: default_cache_dir(),
        cache_paths: default_cache_paths(),
      },
      release: ReleaseConfig {
        repository: repository.into(),
        token_env: default_token_env(),
        upload_attempts: default_upload_attempts(),
      },
      platforms: default_platforms(),
    }
  }

  /// Validate the configuration
  pub fn validate(&self) -> ShipResult<()> {
    if self.build.program.is_empty() {
      return Err(ShipError::Config(ConfigError::MissingField {
        field: "build.program".to_string(),
      }));
    }
    if self.release.repository.is_empty() {
      return Err(ShipError::Config(ConfigError::MissingField {
        field: "release.repository".to_string(),
      }));
    }
    if self.release.upload_attempts == 0 {
      return Err(ShipError::Config(ConfigError::MissingField {
        field: "release.upload_attempts (must be at least 1)".to_string(),
      }));
    }
    validate_platforms(&self.platforms)
  }
}
