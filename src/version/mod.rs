//! Next-version resolution against the npm registry
//!
//! A package keeps the `major.minor` line written in its manifest; the patch
//! number is chosen so that it is never already taken on the registry.

use std::path::Path;

use semver::Version;
use tracing::debug;

use crate::error::{Result, StepError};
use crate::models::PackageManifest;
use crate::shell::{Shell, ShellCommand};

/// Decides which version a package is published under
#[allow(async_fn_in_trait)]
pub trait NextVersion {
    /// Resolve the version to set before publishing, `None` to keep the manifest as is
    async fn next_version(
        &self,
        manifest: &PackageManifest,
        package_dir: &Path,
    ) -> Result<Option<Version>>;
}

/// Resolves versions by querying `npm view <name> versions`
#[derive(Debug, Clone)]
pub struct NpmNextVersion<S> {
    shell: S,
    program: String,
}

impl<S: Shell> NpmNextVersion<S> {
    /// Create a resolver using the given shell and package manager program
    pub fn new(shell: S, program: impl Into<String>) -> Self {
        Self {
            shell,
            program: program.into(),
        }
    }

    async fn published_versions(&self, name: &str, package_dir: &Path) -> Result<Option<Vec<Version>>> {
        let command = ShellCommand::new(
            &self.program,
            ["view", name, "versions", "--json"],
            package_dir,
        );
        let output = self.shell.capture(&command).await?;

        if is_not_found(&output.stdout) || is_not_found(&output.stderr) {
            debug!("{} has never been published", name);
            return Ok(None);
        }

        if !output.success() {
            return Err(StepError::CommandFailed {
                command: command.to_string(),
                cwd: command.cwd,
                code: output.code,
            });
        }

        parse_versions(&output.stdout).map(Some)
    }
}

impl<S: Shell> NextVersion for NpmNextVersion<S> {
    async fn next_version(
        &self,
        manifest: &PackageManifest,
        package_dir: &Path,
    ) -> Result<Option<Version>> {
        let (Some(name), Some(version)) = (manifest.name.as_deref(), manifest.version.as_deref())
        else {
            debug!("manifest in {} has no name or version", package_dir.display());
            return Ok(None);
        };

        let current = Version::parse(version)?;
        let published = self
            .published_versions(name, package_dir)
            .await?
            .unwrap_or_default();

        Ok(Some(next_in_line(&current, &published)))
    }
}

/// Pick the version following `current` given what is already published.
pub fn next_in_line(current: &Version, published: &[Version]) -> Version {
    let latest = published
        .iter()
        .filter(|v| v.pre.is_empty())
        .filter(|v| v.major == current.major && v.minor == current.minor)
        .max();

    match latest {
        Some(latest) => {
            let bumped = Version::new(latest.major, latest.minor, latest.patch + 1);
            if *current > bumped {
                current.clone()
            } else {
                bumped
            }
        }
        None => current.clone(),
    }
}

fn is_not_found(text: &str) -> bool {
    text.contains("E404")
}

/// `npm view --json` prints an array for many versions and a bare string for one
fn parse_versions(stdout: &str) -> Result<Vec<Version>> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let value: serde_json::Value = serde_json::from_str(trimmed)?;
    let raw: Vec<&str> = match &value {
        serde_json::Value::Array(items) => items.iter().filter_map(|v| v.as_str()).collect(),
        serde_json::Value::String(s) => vec![s.as_str()],
        other => {
            return Err(StepError::version(format!(
                "unexpected registry response: {}",
                other
            )))
        }
    };

    Ok(raw.into_iter().filter_map(|v| Version::parse(v).ok()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::testing::RecordingShell;
    use crate::shell::CapturedOutput;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn manifest(name: &str, version: &str) -> PackageManifest {
        PackageManifest {
            name: Some(name.into()),
            version: Some(version.into()),
            ..Default::default()
        }
    }

    fn ok(stdout: &str) -> CapturedOutput {
        CapturedOutput {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    #[test]
    fn test_next_in_line_bumps_patch() {
        let published = [v("1.0.0"), v("1.0.1"), v("1.1.0"), v("1.0.7")];
        assert_eq!(next_in_line(&v("1.0.0"), &published), v("1.0.8"));
    }

    #[test]
    fn test_next_in_line_new_minor() {
        let published = [v("1.0.0"), v("1.0.1")];
        assert_eq!(next_in_line(&v("1.2.0"), &published), v("1.2.0"));
    }

    #[test]
    fn test_next_in_line_manifest_ahead() {
        let published = [v("2.3.1")];
        assert_eq!(next_in_line(&v("2.3.9"), &published), v("2.3.9"));
    }

    #[test]
    fn test_next_in_line_ignores_prereleases() {
        let published = [v("1.0.0"), v("1.0.5-beta.1")];
        assert_eq!(next_in_line(&v("1.0.0"), &published), v("1.0.1"));
    }

    #[test]
    fn test_parse_versions_shapes() {
        assert_eq!(parse_versions(r#"["1.0.0", "1.0.1"]"#).unwrap().len(), 2);
        assert_eq!(parse_versions(r#""0.1.0""#).unwrap(), vec![v("0.1.0")]);
        assert!(parse_versions("").unwrap().is_empty());
        assert!(parse_versions("{}").is_err());
    }

    #[tokio::test]
    async fn test_resolves_from_registry() {
        let shell = RecordingShell::new()
            .with_capture("npm view lib versions --json", ok(r#"["1.0.0","1.0.1"]"#));
        let resolver = NpmNextVersion::new(shell.clone(), "npm");

        let next = resolver
            .next_version(&manifest("lib", "1.0.0"), Path::new("/repo/lib"))
            .await
            .unwrap();

        assert_eq!(next, Some(v("1.0.2")));
        assert_eq!(shell.lines(), vec!["npm view lib versions --json"]);
    }

    #[tokio::test]
    async fn test_unpublished_package_keeps_version() {
        let shell = RecordingShell::new().with_capture(
            "npm view fresh versions --json",
            CapturedOutput {
                code: Some(1),
                stdout: r#"{"error":{"code":"E404","summary":"Not Found"}}"#.into(),
                stderr: "npm ERR! code E404".into(),
            },
        );
        let resolver = NpmNextVersion::new(shell, "npm");

        let next = resolver
            .next_version(&manifest("fresh", "0.3.0"), Path::new("."))
            .await
            .unwrap();
        assert_eq!(next, Some(v("0.3.0")));
    }

    #[tokio::test]
    async fn test_registry_error_propagates() {
        let shell = RecordingShell::new().with_capture(
            "npm view lib versions --json",
            CapturedOutput {
                code: Some(1),
                stdout: String::new(),
                stderr: "npm ERR! code ETIMEDOUT".into(),
            },
        );
        let resolver = NpmNextVersion::new(shell, "npm");

        let err = resolver
            .next_version(&manifest("lib", "1.0.0"), Path::new("."))
            .await
            .unwrap_err();
        assert!(matches!(err, StepError::CommandFailed { code: Some(1), .. }));
    }

    #[tokio::test]
    async fn test_missing_name_skips_query() {
        let shell = RecordingShell::new();
        let resolver = NpmNextVersion::new(shell.clone(), "npm");
        let unnamed = PackageManifest {
            version: Some("1.0.0".into()),
            ..Default::default()
        };

        let next = resolver.next_version(&unnamed, Path::new(".")).await.unwrap();
        assert!(next.is_none());
        assert!(shell.lines().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_manifest_version() {
        let resolver = NpmNextVersion::new(RecordingShell::new(), "npm");
        let err = resolver
            .next_version(&manifest("lib", "latest"), Path::new("."))
            .await
            .unwrap_err();
        assert!(matches!(err, StepError::Semver(_)));
    }
}
