//! Command-line interface for pkgstep

mod commands;

pub use commands::*;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::models::BuildOptions;

/// Pkgstep - per-package npm build step
///
/// Runs install, update, audit, version bump, build, test and publish
/// for packages of a multi-package repository.
#[derive(Parser, Debug)]
#[command(name = "pkgstep")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "PKGSTEP_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build packages in the given order
    Build(BuildArgs),

    /// Show a package manifest and the steps it would get
    Manifest(ManifestArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Arguments for the build command
#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    /// Package directories, relative to the root
    #[arg(default_value = ".")]
    pub packages: Vec<PathBuf>,

    /// Repository root directory
    #[arg(short, long, default_value = ".")]
    pub root: PathBuf,

    /// Package manager program (default from config: npm)
    #[arg(long)]
    pub npm: Option<String>,

    /// Print commands instead of running them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Step switches
    #[command(flatten)]
    pub steps: StepArgs,
}

/// On/off switches for every build step
#[derive(Args, Debug, Clone, Default)]
pub struct StepArgs {
    /// Run `npm install`
    #[arg(long, overrides_with = "no_install")]
    pub install: bool,
    /// Skip `npm install`
    #[arg(long, overrides_with = "install")]
    pub no_install: bool,

    /// Run `npm update`
    #[arg(long, overrides_with = "no_update")]
    pub update: bool,
    /// Skip `npm update`
    #[arg(long, overrides_with = "update")]
    pub no_update: bool,

    /// Run `npm audit fix`
    #[arg(long, overrides_with = "no_audit")]
    pub audit: bool,
    /// Skip `npm audit fix`
    #[arg(long, overrides_with = "audit")]
    pub no_audit: bool,

    /// Run the build script
    #[arg(long, overrides_with = "no_build")]
    pub build: bool,
    /// Skip the build script
    #[arg(long, overrides_with = "build")]
    pub no_build: bool,

    /// Run the test script
    #[arg(long, overrides_with = "no_test")]
    pub test: bool,
    /// Skip the test script
    #[arg(long, overrides_with = "test")]
    pub no_test: bool,

    /// Bump the version and publish
    #[arg(long, overrides_with = "no_publish")]
    pub publish: bool,
    /// Skip version bump and publish
    #[arg(long, overrides_with = "publish")]
    pub no_publish: bool,
}

fn switch(on: bool, off: bool, default: bool) -> bool {
    match (on, off) {
        (true, _) => true,
        (_, true) => false,
        _ => default,
    }
}

impl StepArgs {
    /// Apply the switches on top of configured defaults
    pub fn apply(&self, defaults: BuildOptions) -> BuildOptions {
        BuildOptions {
            install: switch(self.install, self.no_install, defaults.install),
            update: switch(self.update, self.no_update, defaults.update),
            audit: switch(self.audit, self.no_audit, defaults.audit),
            build: switch(self.build, self.no_build, defaults.build),
            test: switch(self.test, self.no_test, defaults.test),
            publish: switch(self.publish, self.no_publish, defaults.publish),
        }
    }
}

/// Arguments for the manifest command
#[derive(Parser, Debug)]
pub struct ManifestArgs {
    /// Package directory
    #[arg(default_value = ".")]
    pub package: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = InfoFormat::Pretty)]
    pub format: InfoFormat,
}

/// Info output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InfoFormat {
    /// Human-readable pretty output
    Pretty,
    /// JSON output
    Json,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Configuration subcommand
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Edit configuration file
    Edit,
    /// Reset configuration to defaults
    Reset,
    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },
    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_build_defaults() {
        let cli = Cli::try_parse_from(["pkgstep", "build"]).unwrap();
        let Commands::Build(args) = cli.command else {
            panic!("expected build command");
        };
        assert_eq!(args.packages, vec![PathBuf::from(".")]);
        assert_eq!(args.steps.apply(BuildOptions::default()), BuildOptions::default());
    }

    #[test]
    fn test_step_switches_override_config() {
        let cli = Cli::try_parse_from([
            "pkgstep", "build", "packages/a", "packages/b", "--no-install", "--publish",
            "--audit", "--no-audit",
        ])
        .unwrap();
        let Commands::Build(args) = cli.command else {
            panic!("expected build command");
        };

        let options = args.steps.apply(BuildOptions::default());
        assert_eq!(args.packages.len(), 2);
        assert!(!options.install);
        assert!(options.publish);
        assert!(!options.audit);
        assert!(options.build && options.test);
    }
}
