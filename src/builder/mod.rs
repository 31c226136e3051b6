//! Per-package build step
//!
//! Runs install, update, audit, version bump, build, test and publish for a
//! single package, each gated by [`BuildOptions`]. Steps run strictly in that
//! order and the first failure aborts the package.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::models::{BuildOptions, BuildOutcome, PackageInfo, PackageManifest};
use crate::output;
use crate::shell::{Shell, ShellCommand};
use crate::version::NextVersion;

/// Builds packages of one repository
pub struct PackageBuilder<S, V> {
    /// Repository root that package directories are relative to
    root_directory: PathBuf,
    /// Enabled steps
    options: BuildOptions,
    /// Package manager program
    program: String,
    /// Command runner
    shell: S,
    /// Version resolver used before publishing
    versions: V,
}

impl<S: Shell, V: NextVersion> PackageBuilder<S, V> {
    /// Create a new package builder
    pub fn new(
        root_directory: impl AsRef<Path>,
        options: BuildOptions,
        program: impl Into<String>,
        shell: S,
        versions: V,
    ) -> Self {
        Self {
            root_directory: root_directory.as_ref().to_path_buf(),
            options,
            program: program.into(),
            shell,
            versions,
        }
    }

    /// Build a single package
    pub async fn build(&self, info: &PackageInfo) -> Result<BuildOutcome> {
        output::package_header("building", info);
        let package_dir = info.resolve(&self.root_directory);

        if self.options.install {
            self.run(info, &package_dir, &["install"]).await?;
        }

        if self.options.update {
            self.run(info, &package_dir, &["update"]).await?;
        }

        if self.options.audit {
            self.run(info, &package_dir, &["audit", "fix"]).await?;
        }

        // Read after install/update/audit, which may rewrite it
        let manifest = PackageManifest::load(&package_dir)?;

        if self.options.publish {
            let next = self.versions.next_version(&manifest, &package_dir).await?;
            debug!(
                "new version of {} is {:?}",
                info.directory.display(),
                next.as_ref().map(ToString::to_string)
            );

            if let Some(version) = next {
                output::package_operation("setting new version", info);
                let version = version.to_string();
                self.exec(
                    &package_dir,
                    &[
                        "version",
                        version.as_str(),
                        "--allow-same-version",
                        "--no-git-tag-version",
                    ],
                )
                .await?;
            }
        }

        if self.options.build && manifest.has_script("build") {
            self.run(info, &package_dir, &["run", "build"]).await?;
        }

        if self.options.test && manifest.has_script("test") {
            self.run(info, &package_dir, &["test"]).await?;
        }

        if self.options.publish && !manifest.private {
            let access = manifest.publish_access();
            output::package_operation(
                &format!("{} publish ({})", self.program, access),
                info,
            );
            debug!(
                "publishing package {} {}",
                info.directory.display(),
                if access.is_public() { "publicly" } else { "" }
            );

            let flag = format!("--access={}", access);
            self.exec(&package_dir, &["publish", flag.as_str()]).await?;
        }

        Ok(BuildOutcome::Success)
    }

    /// Build packages one after another, stopping at the first failure
    pub async fn build_all(&self, packages: &[PackageInfo]) -> Result<BuildOutcome> {
        for info in packages {
            self.build(info).await?;
        }
        Ok(BuildOutcome::Success)
    }

    async fn run(&self, info: &PackageInfo, package_dir: &Path, args: &[&str]) -> Result<()> {
        let command = ShellCommand::new(&self.program, args.iter().copied(), package_dir);
        output::package_operation(&command.to_string(), info);
        self.shell.run(&command).await
    }

    async fn exec(&self, package_dir: &Path, args: &[&str]) -> Result<()> {
        let command = ShellCommand::new(&self.program, args.iter().copied(), package_dir);
        self.shell.run(&command).await
    }
}
