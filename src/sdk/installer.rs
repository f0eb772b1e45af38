use crate::activate::{is_version_entry, VersionActivator};
use crate::archive::ArchiveExtractor;
use crate::cache::{run_blocking, ArtifactCache, ProgressSink};
use crate::catalog::types::normalize_type_name;
use crate::catalog::{CatalogClient, Platform};
use crate::core::path::validate_segment;
use crate::core::{SdkLayout, SwitchyError, SwitchyResult};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Result of [`SdkInstaller::use_version`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivatedSdk {
    pub sdk_type: String,
    pub version: String,
    pub active_dir: PathBuf,
    /// False when the version was already extracted locally.
    pub installed_now: bool,
}

/// Runs the resolve, download, extract and activate stages in order.
pub struct SdkInstaller {
    catalog: Arc<CatalogClient>,
    cache: Arc<ArtifactCache>,
    extractor: Arc<ArchiveExtractor>,
    activator: Arc<VersionActivator>,
    platform: Option<Platform>,
}

impl SdkInstaller {
    pub fn new(
        catalog: Arc<CatalogClient>,
        cache: Arc<ArtifactCache>,
        extractor: Arc<ArchiveExtractor>,
        activator: Arc<VersionActivator>,
    ) -> Self {
        Self {
            catalog,
            cache,
            extractor,
            activator,
            platform: None,
        }
    }

    /// Pick descriptors for `platform` instead of the running OS.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn catalog(&self) -> &CatalogClient {
        &self.catalog
    }

    pub fn layout(&self) -> &SdkLayout {
        self.activator.layout()
    }

    fn platform(&self) -> SwitchyResult<Platform> {
        match self.platform {
            Some(platform) => Ok(platform),
            None => Platform::detect(),
        }
    }

    /// Download (or reuse from cache) and extract one version.
    ///
    /// Returns the extracted version directory. An existing directory is
    /// replaced by a fresh extraction.
    pub async fn install(
        &self,
        sdk_type: &str,
        version: &str,
        progress: Option<&dyn ProgressSink>,
        cancel: &CancellationToken,
    ) -> SwitchyResult<PathBuf> {
        let sdk_type = normalize_type_name(sdk_type);
        validate_segment("SDK type", &sdk_type)?;
        validate_segment("version", version)?;
        let platform = self.platform()?;

        let resolved = self.catalog.resolve(&sdk_type, version, cancel).await?;
        let descriptor = resolved.descriptor_for(platform).ok_or_else(|| {
            SwitchyError::NotFound(format!(
                "No {} download for {} {}",
                platform, sdk_type, version
            ))
        })?;

        let artifact = self
            .cache
            .acquire(&sdk_type, version, descriptor, progress, cancel)
            .await?;

        let destination = self.layout().version_dir(&sdk_type, version);
        let extractor = Arc::clone(&self.extractor);
        let (from, to, token) = (artifact, destination.clone(), cancel.clone());
        run_blocking(move || extractor.extract_cancellable(&from, &to, &token)).await?;

        info!(sdk_type = %sdk_type, version, path = %destination.display(), "Installed SDK");
        Ok(destination)
    }

    /// Make `version` the active SDK, installing it first if it is not present.
    ///
    /// A version that is already extracted is activated without any network
    /// access.
    pub async fn use_version(
        &self,
        sdk_type: &str,
        version: &str,
        progress: Option<&dyn ProgressSink>,
        cancel: &CancellationToken,
    ) -> SwitchyResult<ActivatedSdk> {
        let sdk_type = normalize_type_name(sdk_type);
        validate_segment("SDK type", &sdk_type)?;
        validate_segment("version", version)?;

        let installed_now = !self.layout().version_dir(&sdk_type, version).is_dir();
        if installed_now {
            self.install(&sdk_type, version, progress, cancel).await?;
        }

        let activator = Arc::clone(&self.activator);
        let (ty, ver, token) = (sdk_type.clone(), version.to_string(), cancel.clone());
        run_blocking(move || activator.activate_cancellable(&ty, &ver, &token)).await?;

        Ok(ActivatedSdk {
            active_dir: self.layout().active_dir(&sdk_type),
            sdk_type,
            version: version.to_string(),
            installed_now,
        })
    }

    /// Locally extracted versions of an SDK type, sorted
    pub fn installed_versions(&self, sdk_type: &str) -> SwitchyResult<Vec<String>> {
        let type_dir = self.layout().type_dir(&normalize_type_name(sdk_type));
        let entries = match fs::read_dir(&type_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SwitchyError::fs(&type_dir, e)),
        };

        let mut versions = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SwitchyError::fs(&type_dir, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_version_entry(&name) && entry.path().is_dir() {
                versions.push(name);
            }
        }
        versions.sort();
        Ok(versions)
    }

    pub fn active_version(&self, sdk_type: &str) -> SwitchyResult<Option<String>> {
        self.activator
            .active_version(&normalize_type_name(sdk_type))
    }
}
