//! `package.json` representation

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, StepError};

/// File name of the npm manifest
pub const MANIFEST_FILE_NAME: &str = "package.json";

/// Registry access level used when publishing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishAccess {
    /// Anyone can install the package
    Public,
    /// Only the owning scope can install the package
    Restricted,
}

impl PublishAccess {
    /// Value passed to `npm publish --access=`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Restricted => "restricted",
        }
    }

    /// Whether the package is published publicly
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Public)
    }
}

impl fmt::Display for PublishAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `publishConfig` section of the manifest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Requested access level, free-form as written by the author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
}

/// The subset of `package.json` that drives the build step.
///
/// Unknown fields are ignored so that arbitrary real-world manifests load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageManifest {
    /// Package name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Package version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Private packages are never published
    #[serde(default, deserialize_with = "truthy")]
    pub private: bool,

    /// npm lifecycle scripts
    #[serde(default, deserialize_with = "null_as_default")]
    pub scripts: BTreeMap<String, String>,

    /// Publish configuration
    #[serde(
        default,
        rename = "publishConfig",
        skip_serializing_if = "Option::is_none"
    )]
    pub publish_config: Option<PublishConfig>,
}

/// Reads any JSON value the way npm itself tests it for truth
fn truthy<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;

    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl PackageManifest {
    /// Path of the manifest inside a package directory
    pub fn path_in(package_dir: &Path) -> PathBuf {
        package_dir.join(MANIFEST_FILE_NAME)
    }

    /// Load the manifest from a package directory
    pub fn load(package_dir: &Path) -> Result<Self> {
        let path = Self::path_in(package_dir);
        let content = std::fs::read_to_string(&path).map_err(|source| {
            StepError::ManifestRead {
                path: path.clone(),
                source,
            }
        })?;

        Self::parse(&content).map_err(|source| StepError::ManifestParse { path, source })
    }

    /// Parse manifest JSON text
    pub fn parse(content: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Check whether a lifecycle script is defined and non-empty
    pub fn has_script(&self, name: &str) -> bool {
        self.scripts.get(name).is_some_and(|s| !s.is_empty())
    }

    /// Access level for `npm publish`.
    ///
    /// Only an explicit `"restricted"` restricts; anything else is public.
    pub fn publish_access(&self) -> PublishAccess {
        match self
            .publish_config
            .as_ref()
            .and_then(|c| c.access.as_deref())
        {
            Some("restricted") => PublishAccess::Restricted,
            _ => PublishAccess::Public,
        }
    }

    /// Name for display, falling back to a placeholder
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}
