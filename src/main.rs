use clap::{Parser, Subcommand};
use shipline::commands;
use shipline::core::error::{ShipError, print_error};

/// Build, test, and publish release binaries for every platform
#[derive(Parser)]
#[command(name = "shipline")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Initialize shipline configuration for a repository
  Init {
    /// Name of the program being shipped
    #[arg(long)]
    program: String,
    /// Hosting repository as owner/name
    #[arg(long)]
    repository: String,
  },

  /// Show what a pipeline run would do for a tag
  Plan {
    /// Release tag (falls back to $SHIPLINE_TAG)
    #[arg(long)]
    tag: Option<String>,
    /// Output plan in JSON format (useful for CI/automation)
    #[arg(long)]
    json: bool,
  },

  /// Run the build-and-release pipeline for a tag
  Run {
    /// Release tag (falls back to $SHIPLINE_TAG)
    #[arg(long)]
    tag: Option<String>,
    /// Actually build and publish (default: dry-run showing the plan)
    #[arg(long)]
    apply: bool,
    /// Output the final report in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();

  let result = match cli.command {
    Commands::Init { program, repository } => commands::run_init(program, repository),
    Commands::Plan { tag, json } => commands::run_plan(tag, json),
    Commands::Run { tag, apply, json } => commands::run_run(tag, apply, json),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: ShipError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
