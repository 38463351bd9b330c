//! CLI commands for shipline
//!
//! - **init**: write a starter ship.toml for a repository
//! - **plan**: show what a pipeline run would do (table or JSON)
//! - **run**: execute the pipeline; dry-run unless `--apply`

pub mod init;
pub mod plan;
pub mod run;

pub use init::run_init;
pub use plan::run_plan;
pub use run::run_run;
