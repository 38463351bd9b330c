//! Toolchain seam: install, release build, and test execution
//!
//! The pipeline treats the toolchain as an external command that exits with
//! a status code. The trait keeps the runner testable; the production
//! implementation shells out to rustup/cargo with an isolated environment.

use crate::core::error::{BuildStage, ShipError, ShipResult, ToolchainError};
use crate::core::platform::Platform;
use std::path::{Path, PathBuf};
use std::process::Command;

/// The external toolchain a platform build runs through.
///
/// Every step is a potentially long-running blocking operation; a non-zero
/// exit fails that step and the runner aborts the remaining ones.
pub trait Toolchain: Sync {
  /// Install/resolve the toolchain for the host matching `platform`
  fn install(&self, platform: &Platform) -> ShipResult<()>;

  /// Compile in release configuration, returning the path to the binary
  fn build(&self, platform: &Platform) -> ShipResult<PathBuf>;

  /// Execute the full test suite against the release build
  fn test(&self, platform: &Platform) -> ShipResult<()>;
}

/// Production toolchain driving rustup and cargo
pub struct CargoToolchain {
  workspace: PathBuf,
  program: String,
}

impl CargoToolchain {
  /// Create a toolchain rooted at the workspace that builds `program`
  pub fn new(workspace: impl Into<PathBuf>, program: impl Into<String>) -> Self {
    Self {
      workspace: workspace.into(),
      program: program.into(),
    }
  }

  /// Create a subprocess with an isolated environment
  ///
  /// - Sets working directory to the workspace
  /// - Clears environment variables
  /// - Whitelists only PATH, HOME, CARGO_HOME, RUSTUP_HOME
  fn tool_cmd(&self, program: &str) -> Command {
    let mut cmd = Command::new(program);
    cmd.current_dir(&self.workspace);

    cmd.env_clear();
    for var in ["PATH", "HOME", "CARGO_HOME", "RUSTUP_HOME"] {
      if let Ok(value) = std::env::var(var) {
        cmd.env(var, value);
      }
    }

    cmd
  }

  fn run_step(&self, mut cmd: Command, platform: &Platform, stage: BuildStage) -> ShipResult<()> {
    let command = render_command(&cmd);

    let output = cmd.output().map_err(|e| {
      ShipError::Toolchain(ToolchainError {
        platform: platform.suffix.clone(),
        stage,
        command: command.clone(),
        stderr: e.to_string(),
      })
    })?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ShipError::Toolchain(ToolchainError {
        platform: platform.suffix.clone(),
        stage,
        command,
        stderr: stderr.to_string(),
      }));
    }

    Ok(())
  }
}

impl Toolchain for CargoToolchain {
  fn install(&self, platform: &Platform) -> ShipResult<()> {
    let mut cmd = self.tool_cmd("rustup");
    cmd.args(["toolchain", "install", "stable", "--profile", "minimal"]);
    self.run_step(cmd, platform, BuildStage::Install)
  }

  fn build(&self, platform: &Platform) -> ShipResult<PathBuf> {
    let mut cmd = self.tool_cmd("cargo");
    cmd.args(["build", "--release"]);
    self.run_step(cmd, platform, BuildStage::Build)?;

    let binary = self
      .workspace
      .join("target")
      .join("release")
      .join(platform.binary_file_name(&self.program));

    if !binary.is_file() {
      return Err(ShipError::Toolchain(ToolchainError {
        platform: platform.suffix.clone(),
        stage: BuildStage::Build,
        command: "cargo build --release".to_string(),
        stderr: format!("build succeeded but binary is missing: {}", binary.display()),
      }));
    }

    Ok(binary)
  }

  fn test(&self, platform: &Platform) -> ShipResult<()> {
    let mut cmd = self.tool_cmd("cargo");
    cmd.args(["test", "--release"]);
    self.run_step(cmd, platform, BuildStage::Test)
  }
}

fn render_command(cmd: &Command) -> String {
  let program = Path::new(cmd.get_program())
    .file_name()
    .map(|n| n.to_string_lossy().to_string())
    .unwrap_or_else(|| cmd.get_program().to_string_lossy().to_string());

  let args: Vec<String> = cmd.get_args().map(|a| a.to_string_lossy().to_string()).collect();
  if args.is_empty() {
    program
  } else {
    format!("{} {}", program, args.join(" "))
  }
}
