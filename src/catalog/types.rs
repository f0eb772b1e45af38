//! Catalog data model and its JSON wire format.

use crate::catalog::platform::Platform;
use crate::core::{SwitchyError, SwitchyResult};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};

/// Where to fetch one artifact and how to verify it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadDescriptor {
    pub url: String,
    /// Lowercase SHA-256 hex digest; `None` means "trust transport only".
    pub sha256: Option<String>,
}

impl DownloadDescriptor {
    pub fn new(url: impl Into<String>, sha256: Option<&str>) -> Self {
        let sha256 = sha256
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_ascii_lowercase);
        Self {
            url: url.into(),
            sha256,
        }
    }
}

/// One published version of an SDK type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub version: String,
    /// Flat `link`/`sha256` pair, used when no platform entry matches.
    pub fallback: Option<DownloadDescriptor>,
    /// Per-platform descriptors keyed by platform name (`linux`, `macos`, `windows`).
    pub platforms: BTreeMap<String, DownloadDescriptor>,
}

impl Version {
    /// Pick the descriptor for a platform, falling back to the flat link.
    pub fn descriptor_for(&self, platform: Platform) -> Option<&DownloadDescriptor> {
        self.platforms
            .get(platform.as_str())
            .or(self.fallback.as_ref())
    }

    /// Any descriptor, preferring the flat link. Used for display only.
    pub fn primary_link(&self) -> Option<&str> {
        self.fallback
            .as_ref()
            .or_else(|| self.platforms.values().next())
            .map(|d| d.url.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkType {
    pub name: String,
    pub default_version: Option<String>,
    pub versions: Vec<Version>,
}

impl SdkType {
    pub fn find_version(&self, version: &str) -> Option<&Version> {
        self.versions.iter().find(|v| v.version == version)
    }
}

/// The full remote listing, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub sdks: Vec<SdkType>,
}

impl Catalog {
    /// Parse and validate a catalog document
    pub fn parse_json(content: &str) -> SwitchyResult<Self> {
        let raw: RawCatalog = serde_json::from_str(content)
            .map_err(|e| SwitchyError::Parse(format!("Invalid SDK catalog: {}", e)))?;
        raw.validate()
    }

    /// Look up an SDK type by name, ignoring case
    pub fn find_type(&self, name: &str) -> Option<&SdkType> {
        let wanted = normalize_type_name(name);
        self.sdks
            .iter()
            .find(|sdk| normalize_type_name(&sdk.name) == wanted)
    }

    pub fn type_names(&self) -> Vec<String> {
        self.sdks.iter().map(|sdk| sdk.name.clone()).collect()
    }
}

/// SDK type names are matched in lowercase.
pub fn normalize_type_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[derive(Debug, Deserialize)]
struct RawCatalog {
    sdks: Vec<RawSdk>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSdk {
    name: String,
    #[serde(default)]
    default_version: Option<String>,
    #[serde(default)]
    versions: Vec<RawVersion>,
}

#[derive(Debug, Deserialize)]
struct RawVersion {
    version: String,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    sha256: Option<String>,
    #[serde(default)]
    platforms: BTreeMap<String, RawPlatform>,
}

#[derive(Debug, Deserialize)]
struct RawPlatform {
    link: String,
    #[serde(default)]
    sha256: Option<String>,
}

impl RawCatalog {
    fn validate(self) -> SwitchyResult<Catalog> {
        let mut seen_types = HashSet::new();
        let mut sdks = Vec::with_capacity(self.sdks.len());

        for raw in self.sdks {
            let name = raw.name.trim().to_string();
            if name.is_empty() {
                return Err(SwitchyError::Parse("SDK entry with empty name".to_string()));
            }
            if !seen_types.insert(normalize_type_name(&name)) {
                return Err(SwitchyError::Parse(format!(
                    "Duplicate SDK type '{}' in catalog",
                    name
                )));
            }

            let mut seen_versions = HashSet::new();
            let mut versions = Vec::with_capacity(raw.versions.len());
            for v in raw.versions {
                if v.version.trim().is_empty() {
                    return Err(SwitchyError::Parse(format!(
                        "SDK '{}' has a version with an empty version string",
                        name
                    )));
                }
                if !seen_versions.insert(v.version.clone()) {
                    return Err(SwitchyError::Parse(format!(
                        "Duplicate version '{}' for SDK '{}'",
                        v.version, name
                    )));
                }

                let fallback = v
                    .link
                    .filter(|link| !link.trim().is_empty())
                    .map(|link| DownloadDescriptor::new(link.trim(), v.sha256.as_deref()));
                let platforms: BTreeMap<_, _> = v
                    .platforms
                    .into_iter()
                    .filter(|(_, p)| !p.link.trim().is_empty())
                    .map(|(key, p)| {
                        (
                            key.to_lowercase(),
                            DownloadDescriptor::new(p.link.trim(), p.sha256.as_deref()),
                        )
                    })
                    .collect();

                if fallback.is_none() && platforms.is_empty() {
                    return Err(SwitchyError::Parse(format!(
                        "Version '{}' of SDK '{}' has no download link",
                        v.version, name
                    )));
                }

                versions.push(Version {
                    version: v.version,
                    fallback,
                    platforms,
                });
            }

            sdks.push(SdkType {
                name,
                default_version: raw.default_version.filter(|d| !d.is_empty()),
                versions,
            });
        }

        Ok(Catalog { sdks })
    }
}
