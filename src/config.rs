//! Configuration management for pkgstep

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StepError};
use crate::models::BuildOptions;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Which build steps run by default
    #[serde(default)]
    pub steps: BuildOptions,

    /// Package manager settings
    #[serde(default)]
    pub npm: NpmConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Package manager configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpmConfig {
    /// Program invoked for every step
    pub program: String,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Enable colored output
    pub color: bool,
}

impl Default for NpmConfig {
    fn default() -> Self {
        Self {
            program: "npm".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            color: true,
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    value
        .parse()
        .map_err(|_| StepError::config(format!("Invalid boolean for {}", key)))
}

impl Config {
    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| StepError::config("Could not find config directory"))?;
        Ok(config_dir.join("pkgstep").join("config.toml"))
    }

    /// Resolve an explicit path or fall back to the default location
    pub fn resolve_path(path: Option<&Path>) -> Result<PathBuf> {
        match path {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::config_path(),
        }
    }

    /// Load configuration from a file, using defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Render configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| StepError::config(e.to_string()))
    }

    /// Save configuration to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml()?)?;

        Ok(())
    }

    /// Reset configuration to defaults
    pub fn reset(path: &Path) -> Result<()> {
        Self::default().save_to(path)
    }

    /// Initialize configuration file
    pub fn init(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            return Err(StepError::config(
                "Configuration file already exists. Use --force to overwrite.",
            ));
        }

        Self::default().save_to(path)
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "steps.install" => Some(self.steps.install.to_string()),
            "steps.update" => Some(self.steps.update.to_string()),
            "steps.audit" => Some(self.steps.audit.to_string()),
            "steps.build" => Some(self.steps.build.to_string()),
            "steps.test" => Some(self.steps.test.to_string()),
            "steps.publish" => Some(self.steps.publish.to_string()),

            "npm.program" => Some(self.npm.program.clone()),

            "logging.level" => Some(self.logging.level.clone()),
            "logging.color" => Some(self.logging.color.to_string()),

            _ => None,
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "steps.install" => self.steps.install = parse_bool(key, value)?,
            "steps.update" => self.steps.update = parse_bool(key, value)?,
            "steps.audit" => self.steps.audit = parse_bool(key, value)?,
            "steps.build" => self.steps.build = parse_bool(key, value)?,
            "steps.test" => self.steps.test = parse_bool(key, value)?,
            "steps.publish" => self.steps.publish = parse_bool(key, value)?,

            "npm.program" => {
                if value.trim().is_empty() {
                    return Err(StepError::config("npm.program cannot be empty"));
                }
                self.npm.program = value.to_string();
            }

            "logging.level" => {
                self.logging.level = value.to_string();
            }
            "logging.color" => self.logging.color = parse_bool(key, value)?,

            _ => {
                return Err(StepError::config(format!("Unknown configuration key: {}", key)));
            }
        }

        Ok(())
    }
}
