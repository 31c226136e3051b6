//! Pkgstep - per-package npm build step
//!
//! Pkgstep runs the build step of a single package in a multi-package npm
//! repository: install, update, audit fix, version bump, build script, test
//! script and publish, each switched on or off by configuration.
//!
//! # Quick Start
//!
//! ```bash
//! # Install, build and test the package in the current directory
//! pkgstep build
//!
//! # Bump versions and publish two packages, in order
//! pkgstep build --root . packages/core packages/cli --publish
//!
//! # Preview what would run
//! pkgstep build packages/core --publish --dry-run
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod shell;
pub mod version;

// Re-export commonly used types
pub use builder::PackageBuilder;
pub use error::{Result, StepError};
pub use models::{BuildOptions, BuildOutcome, PackageInfo, PackageManifest};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Build one package with the real `npm` on the given repository root
///
/// # Example
///
/// ```no_run
/// use pkgstep::{BuildOptions, PackageInfo};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     pkgstep::build_package(
///         std::path::Path::new("."),
///         &PackageInfo::new("packages/core"),
///         BuildOptions::default(),
///     )
///     .await?;
///     Ok(())
/// }
/// ```
pub async fn build_package(
    root_directory: &std::path::Path,
    info: &PackageInfo,
    options: BuildOptions,
) -> Result<BuildOutcome> {
    use shell::ProcessShell;
    use version::NpmNextVersion;

    let versions = NpmNextVersion::new(ProcessShell::new(), "npm");
    PackageBuilder::new(root_directory, options, "npm", ProcessShell::new(), versions)
        .build(info)
        .await
}
