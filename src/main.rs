//! Pkgstep - per-package npm build step
//!
//! Main entry point for the pkgstep CLI application.

use std::process::ExitCode;

use console::style;
use tracing_subscriber::EnvFilter;

use pkgstep::cli::{self, Cli};
use pkgstep::config::{Config, LoggingConfig};
use pkgstep::error::Result;
use pkgstep::output;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// Set up logging based on CLI arguments and configuration
fn setup_logging(cli: &Cli, logging: &LoggingConfig) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        logging.level.as_str()
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(logging.color)
        .without_time()
        .init();
}

/// Main application logic
async fn run(cli: Cli) -> Result<()> {
    let config_path = Config::resolve_path(cli.config.as_deref())?;
    // A broken file only fails the commands that read settings
    let config = Config::load_from(&config_path);
    let logging = config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();

    setup_logging(&cli, &logging);
    output::set_quiet(cli.quiet);
    if !logging.color {
        console::set_colors_enabled(false);
    }

    cli::dispatch(&cli.command, config, &config_path).await
}
