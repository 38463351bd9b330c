//! Error types for shipline with contextual messages and exit codes
//!
//! This module provides a unified error type that categorizes pipeline
//! failures and provides contextual help messages to operators. Every
//! terminal failure names the platform and stage it occurred at.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for shipline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing files)
  User = 1,
  /// System error (subprocess, network, I/O)
  System = 2,
  /// Pipeline failure (build/test failed, publish incomplete)
  Pipeline = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Stage of a platform build, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStage {
  /// Toolchain install/resolution
  Install,
  /// Release-configuration compile
  Build,
  /// Test suite against the release build
  Test,
}

impl fmt::Display for BuildStage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BuildStage::Install => write!(f, "install"),
      BuildStage::Build => write!(f, "build"),
      BuildStage::Test => write!(f, "test"),
    }
  }
}

/// Main error type for shipline
#[derive(Debug)]
pub enum ShipError {
  /// Configuration errors
  Config(ConfigError),

  /// Toolchain step failure, scoped to one platform
  Toolchain(ToolchainError),

  /// Dependency cache failure (callers treat as non-fatal)
  Cache(CacheError),

  /// One or more platform builds failed; publish never ran
  Coordination(CoordinationError),

  /// Artifact store errors
  Store(StoreError),

  /// Release creation or asset upload errors
  Release(ReleaseError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ShipError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ShipError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ShipError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ShipError::Message { message, context, help } => ShipError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ShipError::Config(_) => ExitCode::User,
      ShipError::Toolchain(_) => ExitCode::Pipeline,
      ShipError::Cache(_) => ExitCode::System,
      ShipError::Coordination(_) => ExitCode::Pipeline,
      ShipError::Store(_) => ExitCode::System,
      ShipError::Release(_) => ExitCode::Pipeline,
      ShipError::Io(_) => ExitCode::System,
      ShipError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ShipError::Config(e) => e.help_message(),
      ShipError::Toolchain(e) => e.help_message(),
      ShipError::Coordination(e) => e.help_message(),
      ShipError::Release(e) => e.help_message(),
      ShipError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for ShipError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ShipError::Config(e) => write!(f, "{}", e),
      ShipError::Toolchain(e) => write!(f, "{}", e),
      ShipError::Cache(e) => write!(f, "{}", e),
      ShipError::Coordination(e) => write!(f, "{}", e),
      ShipError::Store(e) => write!(f, "{}", e),
      ShipError::Release(e) => write!(f, "{}", e),
      ShipError::Io(e) => write!(f, "I/O error: {}", e),
      ShipError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ShipError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ShipError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ShipError {
  fn from(err: io::Error) -> Self {
    ShipError::Io(err)
  }
}

impl From<String> for ShipError {
  fn from(msg: String) -> Self {
    ShipError::message(msg)
  }
}

impl From<&str> for ShipError {
  fn from(msg: &str) -> Self {
    ShipError::message(msg)
  }
}

impl From<toml_edit::TomlError> for ShipError {
  fn from(err: toml_edit::TomlError) -> Self {
    ShipError::message(format!("TOML parse error: {}", err))
  }
}

impl From<toml_edit::de::Error> for ShipError {
  fn from(err: toml_edit::de::Error) -> Self {
    ShipError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<toml_edit::ser::Error> for ShipError {
  fn from(err: toml_edit::ser::Error) -> Self {
    ShipError::message(format!("TOML serialization error: {}", err))
  }
}

impl From<serde_json::Error> for ShipError {
  fn from(err: serde_json::Error) -> Self {
    ShipError::message(format!("JSON error: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for ShipError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    ShipError::message(format!("UTF-8 conversion error: {}", err))
  }
}

impl From<std::env::VarError> for ShipError {
  fn from(err: std::env::VarError) -> Self {
    ShipError::message(format!("Environment variable error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// ship.toml not found
  NotFound { path: PathBuf },

  /// Platform table failed validation
  InvalidPlatforms { reason: String },

  /// Missing required field
  MissingField { field: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => Some("Run `shipline init` to create a starter configuration file.".to_string()),
      ConfigError::InvalidPlatforms { .. } => {
        Some("Each [[platforms]] entry needs a unique `suffix`; at least one platform is required.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { path } => {
        write!(f, "No shipline configuration found.\nExpected file: {}", path.display())
      }
      ConfigError::InvalidPlatforms { reason } => {
        write!(f, "Invalid platform configuration: {}", reason)
      }
      ConfigError::MissingField { field } => {
        write!(f, "Missing required field in config: {}", field)
      }
    }
  }
}

/// Toolchain step failure for a single platform
#[derive(Debug)]
pub struct ToolchainError {
  /// Platform suffix the failure is scoped to
  pub platform: String,
  /// Stage that exited non-zero
  pub stage: BuildStage,
  /// Command that was executed
  pub command: String,
  /// Captured stderr (may be empty if the process never spawned)
  pub stderr: String,
}

impl ToolchainError {
  fn help_message(&self) -> Option<String> {
    match self.stage {
      BuildStage::Install => Some("Check that rustup is installed and on PATH.".to_string()),
      BuildStage::Test => Some("The release build succeeded; only the test suite failed. Re-run locally with `cargo test --release`.".to_string()),
      _ => None,
    }
  }
}

impl fmt::Display for ToolchainError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "[{}] {} step failed: {}\n{}",
      self.platform, self.stage, self.command, self.stderr
    )
  }
}

/// Dependency cache failure (restore or save)
#[derive(Debug)]
pub enum CacheError {
  /// Restoring an entry failed
  Restore { key: String, reason: String },

  /// Saving an entry failed
  Save { key: String, reason: String },
}

impl fmt::Display for CacheError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CacheError::Restore { key, reason } => {
        write!(f, "Cache restore failed for key {}: {}", key, reason)
      }
      CacheError::Save { key, reason } => {
        write!(f, "Cache save failed for key {}: {}", key, reason)
      }
    }
  }
}

/// One or more platform builds failed
#[derive(Debug)]
pub struct CoordinationError {
  /// (platform suffix, failed stage) for every failed runner
  pub failed: Vec<(String, BuildStage)>,
}

impl CoordinationError {
  fn help_message(&self) -> Option<String> {
    Some("No release was created. Fix the failing platforms and push the tag again.".to_string())
  }
}

impl fmt::Display for CoordinationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let list: Vec<String> = self.failed.iter().map(|(p, s)| format!("{} ({})", p, s)).collect();
    write!(f, "{} platform build(s) failed: {}", self.failed.len(), list.join(", "))
  }
}

/// Artifact store errors
#[derive(Debug)]
pub enum StoreError {
  /// No artifact registered under this name
  NotFound { name: String },
}

impl fmt::Display for StoreError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      StoreError::NotFound { name } => write!(f, "Artifact not found in store: {}", name),
    }
  }
}

/// Release creation and asset upload errors
#[derive(Debug)]
pub enum ReleaseError {
  /// Creating the release record failed; no asset uploads were attempted
  Creation { tag: String, reason: String },

  /// An asset upload failed after bounded retries
  AssetUpload {
    platform: String,
    asset: String,
    attempts: u32,
    reason: String,
  },

  /// The release exists but carries fewer assets than configured platforms
  Incomplete { tag: String, missing: Vec<String> },
}

impl ReleaseError {
  fn help_message(&self) -> Option<String> {
    match self {
      ReleaseError::Creation { .. } => {
        Some("Check the release token and that the tag does not already have a release.".to_string())
      }
      ReleaseError::Incomplete { tag, .. } => Some(format!(
        "Release {} is live but incomplete. Upload the missing assets manually or delete the release and re-run.",
        tag
      )),
      _ => None,
    }
  }
}

impl fmt::Display for ReleaseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseError::Creation { tag, reason } => {
        write!(f, "Failed to create release for {}: {}", tag, reason)
      }
      ReleaseError::AssetUpload {
        platform,
        asset,
        attempts,
        reason,
      } => {
        write!(
          f,
          "[{}] asset upload failed after {} attempt(s): {}\n{}",
          platform, attempts, asset, reason
        )
      }
      ReleaseError::Incomplete { tag, missing } => {
        write!(
          f,
          "Release {} was created but is missing {} asset(s): {}",
          tag,
          missing.len(),
          missing.join(", ")
        )
      }
    }
  }
}

/// Result type alias for shipline
pub type ShipResult<T> = Result<T, ShipError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ShipResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ShipResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ShipError>,
{
  fn context(self, ctx: impl Into<String>) -> ShipResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ShipResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with colors and help text
pub fn print_error(error: &ShipError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}

/// Convert anyhow::Error to ShipError (for edges that use anyhow)
impl From<anyhow::Error> for ShipError {
  fn from(err: anyhow::Error) -> Self {
    ShipError::message(err.to_string())
  }
}
