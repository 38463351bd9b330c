//! `shipline plan` - show what a run would do, without doing it

use crate::commands::run::resolve_tag;
use crate::core::config::ShipConfig;
use crate::core::error::ShipResult;
use crate::pipeline::PipelinePlan;
use std::env;

/// Run the plan command
pub fn run_plan(tag: Option<String>, json: bool) -> ShipResult<()> {
  let workspace = env::current_dir()?;
  let config = ShipConfig::load(&workspace)?;
  let tag = resolve_tag(tag)?;

  let plan = PipelinePlan::new(&config, &tag);

  if json {
    println!("{}", plan.to_json()?);
  } else {
    println!("{}", plan.format_table());
  }

  Ok(())
}
