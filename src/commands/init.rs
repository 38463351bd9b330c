//! `shipline init` - write a starter ship.toml

use crate::core::config::{CONFIG_FILE, ShipConfig};
use crate::core::error::{ShipError, ShipResult};
use std::env;

/// Run the init command
pub fn run_init(program: String, repository: String) -> ShipResult<()> {
  let workspace = env::current_dir()?;

  if ShipConfig::exists(&workspace) {
    return Err(ShipError::with_help(
      format!("{} already exists", CONFIG_FILE),
      "Edit the existing file, or remove it and re-run `shipline init`.",
    ));
  }

  let config = ShipConfig::new(program, repository);
  config.validate()?;
  config.save(&workspace)?;

  println!("✅ Created {}", CONFIG_FILE);
  println!();
  println!("Next steps:");
  println!("  1. Review the platform table in {}", CONFIG_FILE);
  println!("  2. Preview a run: shipline plan --tag v0.1.0");
  println!("  3. Ship: shipline run --tag v0.1.0 --apply");

  Ok(())
}
