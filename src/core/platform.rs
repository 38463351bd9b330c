//! Build target platforms and the names derived from them

use crate::core::error::{ConfigError, ShipError, ShipResult};
use serde::{Deserialize, Serialize};

/// A target platform the pipeline builds for.
///
/// The platform set is fixed at configuration time. `suffix` is the
/// human-readable tag used in artifact and asset names and must be unique
/// within the set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
  /// Logical OS name, also the cache namespace (e.g. "linux")
  pub os_label: String,

  /// Platform tag used in naming (e.g. "linux-amd64")
  pub suffix: String,

  /// Extension of the compiled executable, empty on unix
  #[serde(default)]
  pub executable_extension: String,
}

impl Platform {
  /// Internal artifact name used between the build and publish stages
  pub fn artifact_name(&self) -> String {
    format!("binary-{}", self.suffix)
  }

  /// Public asset name attached to the release.
  ///
  /// The executable extension applies only to the on-disk binary file,
  /// never to the asset name.
  pub fn asset_name(&self, program: &str) -> String {
    format!("{}-{}", program, self.suffix)
  }

  /// File name of the compiled executable for this platform
  pub fn binary_file_name(&self, program: &str) -> String {
    format!("{}{}", program, self.executable_extension)
  }
}

/// The default three-platform table
pub fn default_platforms() -> Vec<Platform> {
  vec![
    Platform {
      os_label: "linux".to_string(),
      suffix: "linux-amd64".to_string(),
      executable_extension: String::new(),
    },
    Platform {
      os_label: "macos".to_string(),
      suffix: "macos-amd64".to_string(),
      executable_extension: String::new(),
    },
    Platform {
      os_label: "windows".to_string(),
      suffix: "windows-amd64".to_string(),
      executable_extension: ".exe".to_string(),
    },
  ]
}

/// Validate a platform set: non-empty, suffixes unique
pub fn validate_platforms(platforms: &[Platform]) -> ShipResult<()> {
  if platforms.is_empty() {
    return Err(ShipError::Config(ConfigError::InvalidPlatforms {
      reason: "at least one platform is required".to_string(),
    }));
  }

  let mut seen = std::collections::HashSet::new();
  for platform in platforms {
    if platform.suffix.is_empty() {
      return Err(ShipError::Config(ConfigError::InvalidPlatforms {
        reason: format!("platform '{}' has an empty suffix", platform.os_label),
      }));
    }
    if !seen.insert(platform.suffix.as_str()) {
      return Err(ShipError::Config(ConfigError::InvalidPlatforms {
        reason: format!("duplicate suffix '{}'", platform.suffix),
      }));
    }
  }

  Ok(())
}
