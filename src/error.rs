//! Error types for pkgstep

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for pkgstep operations
#[derive(Error, Debug)]
pub enum StepError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read manifest {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to start `{command}`: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed in {} ({})", cwd.display(), exit_description(*code))]
    CommandFailed {
        command: String,
        cwd: PathBuf,
        code: Option<i32>,
    },

    #[error("Version resolution failed: {0}")]
    VersionResolution(String),

    #[error("Invalid version: {0}")]
    Semver(#[from] semver::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for pkgstep operations
pub type Result<T> = std::result::Result<T, StepError>;

fn exit_description(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

impl StepError {
    /// Create a new version resolution error
    pub fn version(msg: impl Into<String>) -> Self {
        Self::VersionResolution(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
