//! Package descriptor and build switches

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A package inside the repository
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageInfo {
    /// Package directory, relative to the repository root
    pub directory: PathBuf,
}

impl PackageInfo {
    /// Create a new package descriptor
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Absolute (or root-relative) directory of the package
    pub fn resolve(&self, root_directory: &Path) -> PathBuf {
        root_directory.join(&self.directory)
    }
}

/// Which sub-steps of the build run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Run `npm install`
    pub install: bool,
    /// Run `npm update`
    pub update: bool,
    /// Run `npm audit fix`
    pub audit: bool,
    /// Run the `build` script when present
    pub build: bool,
    /// Run the `test` script when present
    pub test: bool,
    /// Bump the version and publish
    pub publish: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            install: true,
            update: false,
            audit: false,
            build: true,
            test: true,
            publish: false,
        }
    }
}

impl BuildOptions {
    /// Options with every step disabled
    pub fn none() -> Self {
        Self {
            install: false,
            update: false,
            audit: false,
            build: false,
            test: false,
            publish: false,
        }
    }

    /// Options with every step enabled
    pub fn all() -> Self {
        Self {
            install: true,
            update: true,
            audit: true,
            build: true,
            test: true,
            publish: true,
        }
    }
}

/// Result of a successful package build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Every enabled step completed
    Success,
}
