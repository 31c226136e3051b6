//! Command execution handlers

use std::path::Path;

use console::style;
use tracing::info;

use crate::builder::PackageBuilder;
use crate::config::Config;
use crate::error::{Result, StepError};
use crate::models::{PackageInfo, PackageManifest};
use crate::shell::{DryRunShell, ProcessShell, Shell};
use crate::version::NpmNextVersion;

/// Run a parsed command.
///
/// `config` is the result of loading the configuration file. Only the
/// commands that read settings require it to have loaded, so `config`
/// subcommands can still repair a broken file.
pub async fn dispatch(
    command: &super::Commands,
    config: Result<Config>,
    config_path: &Path,
) -> Result<()> {
    match command {
        super::Commands::Build(args) => execute_build(args, &config?).await,
        super::Commands::Manifest(args) => execute_manifest(args, &config?).await,
        super::Commands::Config(args) => execute_config(args, config_path).await,
    }
}

/// Execute the build command
pub async fn execute_build(args: &super::BuildArgs, config: &Config) -> Result<()> {
    if args.dry_run {
        build_with(DryRunShell::new(), args, config).await
    } else {
        build_with(ProcessShell::new(), args, config).await
    }
}

async fn build_with<S: Shell + Clone>(
    shell: S,
    args: &super::BuildArgs,
    config: &Config,
) -> Result<()> {
    let options = args.steps.apply(config.steps);
    let program = args.npm.as_deref().unwrap_or(&config.npm.program);
    let packages: Vec<PackageInfo> = args.packages.iter().cloned().map(PackageInfo::new).collect();

    info!(
        "building {} package(s) under {} with {}",
        packages.len(),
        args.root.display(),
        program
    );

    let versions = NpmNextVersion::new(shell.clone(), program);
    let builder = PackageBuilder::new(&args.root, options, program, shell, versions);

    builder.build_all(&packages).await?;

    info!("built {} package(s)", packages.len());
    Ok(())
}

/// Execute the manifest command
pub async fn execute_manifest(args: &super::ManifestArgs, config: &Config) -> Result<()> {
    let manifest = PackageManifest::load(&args.package)?;
    let steps = config.steps;

    match args.format {
        super::InfoFormat::Pretty => {
            println!("Package Manifest");
            println!("═══════════════════════════════════════");
            println!("Name:        {}", manifest.display_name());
            println!(
                "Version:     {}",
                manifest.version.as_deref().unwrap_or("<none>")
            );
            println!("Private:     {}", manifest.private);
            println!("Access:      {}", manifest.publish_access());

            println!("\nScripts:");
            if manifest.scripts.is_empty() {
                println!("  (none)");
            }
            for (name, script) in &manifest.scripts {
                println!("  {:<10} {}", name, style(script).dim());
            }

            println!("\nSteps with current configuration:");
            print_step("install", steps.install);
            print_step("update", steps.update);
            print_step("audit fix", steps.audit);
            print_step("version", steps.publish);
            print_step("build", steps.build && manifest.has_script("build"));
            print_step("test", steps.test && manifest.has_script("test"));
            print_step("publish", steps.publish && !manifest.private);
        }
        super::InfoFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&manifest)?);
        }
    }

    Ok(())
}

fn print_step(name: &str, enabled: bool) {
    if enabled {
        println!("  {} {}", style("✓").green(), name);
    } else {
        println!("  {} {}", style("·").dim(), style(name).dim());
    }
}

/// Execute the config command
pub async fn execute_config(args: &super::ConfigArgs, config_path: &Path) -> Result<()> {
    match &args.command {
        super::ConfigCommands::Show => {
            let config = Config::load_from(config_path)?;
            println!("{}", config.to_toml()?);
        }
        super::ConfigCommands::Edit => {
            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "nano".to_string());
            let status = tokio::process::Command::new(&editor)
                .arg(config_path)
                .status()
                .await?;
            if !status.success() {
                return Err(StepError::Other(format!(
                    "{} exited with status: {}",
                    editor, status
                )));
            }
        }
        super::ConfigCommands::Reset => {
            Config::reset(config_path)?;
            println!("Configuration reset to defaults");
        }
        super::ConfigCommands::Set { key, value } => {
            let mut config = Config::load_from(config_path)?;
            config.set(key, value)?;
            config.save_to(config_path)?;
            println!("Set {} = {}", key, value);
        }
        super::ConfigCommands::Get { key } => {
            let config = Config::load_from(config_path)?;
            if let Some(value) = config.get(key) {
                println!("{}", value);
            } else {
                println!("Key '{}' not found", key);
            }
        }
        super::ConfigCommands::Init { force } => {
            Config::init(config_path, *force)?;
            println!("Configuration initialized at {}", config_path.display());
        }
    }

    Ok(())
}
