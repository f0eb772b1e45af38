//! Service container for dependency injection

use super::traits::ConfigProvider;
use crate::activate::VersionActivator;
use crate::archive::ArchiveExtractor;
use crate::cache::ArtifactCache;
use crate::catalog::client::http_client;
use crate::catalog::CatalogClient;
use crate::config::Config;
use crate::core::{SdkLayout, SwitchyResult};
use crate::sdk::SdkInstaller;
use std::sync::Arc;

/// Service container for dependency injection
///
/// Holds every pipeline stage, built from one configuration. All stages share
/// a single HTTP client and the same SDK root.
///
/// # Example (Production)
///
/// ```no_run
/// use switchy::di::ServiceContainer;
///
/// # fn example() -> switchy::core::SwitchyResult<()> {
/// let container = ServiceContainer::new()?;
/// println!("Catalog: {}", container.config().catalog_url());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ServiceContainer {
    pub config: Arc<dyn ConfigProvider>,
    pub layout: SdkLayout,
    pub catalog: Arc<CatalogClient>,
    pub cache: Arc<ArtifactCache>,
    pub extractor: Arc<ArchiveExtractor>,
    pub activator: Arc<VersionActivator>,
}

impl ServiceContainer {
    /// Create a new service container with production implementations
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Config file cannot be loaded or created
    /// - The SDK root cannot be determined
    /// - The HTTP client cannot be built
    pub fn new() -> SwitchyResult<Self> {
        let config = Config::load()?;
        Self::with_config(Arc::new(config))
    }

    /// Create a service container from any configuration provider
    ///
    /// This is primarily useful for testing, where a mock configuration points
    /// the pipeline at a temporary root and a local catalog server.
    pub fn with_config(config: Arc<dyn ConfigProvider>) -> SwitchyResult<Self> {
        let layout = SdkLayout::new(config.sdk_root()?);
        let timeout = config.request_timeout();
        let client = http_client(timeout)?;

        let catalog = CatalogClient::with_client(config.catalog_url(), client.clone(), timeout);
        let cache = ArtifactCache::with_client(layout.cache_dir(), client);

        Ok(Self {
            catalog: Arc::new(catalog),
            cache: Arc::new(cache),
            extractor: Arc::new(ArchiveExtractor::new()),
            activator: Arc::new(VersionActivator::new(layout.clone())),
            layout,
            config,
        })
    }

    /// Get the configuration provider
    pub fn config(&self) -> &dyn ConfigProvider {
        self.config.as_ref()
    }

    /// Build an installer over the shared stages
    pub fn installer(&self) -> SdkInstaller {
        SdkInstaller::new(
            Arc::clone(&self.catalog),
            Arc::clone(&self.cache),
            Arc::clone(&self.extractor),
            Arc::clone(&self.activator),
        )
    }
}
