use crate::catalog::types::{Catalog, SdkType, Version};
use crate::core::{SwitchyError, SwitchyResult};
use reqwest::Client;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Client for the remote SDK catalog.
///
/// Every lookup fetches the catalog again; nothing is cached between calls.
#[derive(Clone)]
pub struct CatalogClient {
    client: Client,
    catalog_url: String,
    timeout: Duration,
}

impl CatalogClient {
    /// Create a client for `catalog_url`. A catalog fetch must complete within
    /// `timeout`.
    pub fn new(catalog_url: impl Into<String>, timeout: Duration) -> SwitchyResult<Self> {
        Ok(Self::with_client(catalog_url, http_client(timeout)?, timeout))
    }

    pub fn with_client(catalog_url: impl Into<String>, client: Client, timeout: Duration) -> Self {
        Self {
            client,
            catalog_url: catalog_url.into(),
            timeout,
        }
    }

    pub fn catalog_url(&self) -> &str {
        &self.catalog_url
    }

    /// Download and parse the catalog
    pub async fn fetch(&self, cancel: &CancellationToken) -> SwitchyResult<Catalog> {
        info!(url = %self.catalog_url, "Fetching SDK catalog");

        let content = tokio::select! {
            _ = cancel.cancelled() => return Err(SwitchyError::Cancelled),
            result = self.fetch_text() => result?,
        };

        let catalog = Catalog::parse_json(&content)?;
        debug!(sdk_types = catalog.sdks.len(), "Parsed SDK catalog");
        Ok(catalog)
    }

    async fn fetch_text(&self) -> SwitchyResult<String> {
        let response = self
            .client
            .get(&self.catalog_url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| SwitchyError::Network(format!("Failed to fetch catalog: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SwitchyError::Network(format!(
                "Catalog request to {} returned HTTP {}",
                self.catalog_url, status
            )));
        }

        response
            .text()
            .await
            .map_err(|e| SwitchyError::Network(format!("Failed to read catalog body: {}", e)))
    }

    /// Names of all SDK types, in catalog order
    pub async fn list_types(&self, cancel: &CancellationToken) -> SwitchyResult<Vec<String>> {
        Ok(self.fetch(cancel).await?.type_names())
    }

    /// All versions of one SDK type, in catalog order
    pub async fn list_versions(
        &self,
        sdk_type: &str,
        cancel: &CancellationToken,
    ) -> SwitchyResult<Vec<Version>> {
        let catalog = self.fetch(cancel).await?;
        Ok(require_type(&catalog, sdk_type)?.versions.clone())
    }

    /// Find one exact version of an SDK type
    pub async fn resolve(
        &self,
        sdk_type: &str,
        version: &str,
        cancel: &CancellationToken,
    ) -> SwitchyResult<Version> {
        let catalog = self.fetch(cancel).await?;
        resolve_in(&catalog, sdk_type, version).cloned()
    }

    /// The catalog's suggested version for an SDK type, if it names one
    pub async fn default_version(
        &self,
        sdk_type: &str,
        cancel: &CancellationToken,
    ) -> SwitchyResult<Option<String>> {
        let catalog = self.fetch(cancel).await?;
        Ok(require_type(&catalog, sdk_type)?.default_version.clone())
    }
}

/// Build the shared HTTP client used for the catalog and for downloads.
///
/// `timeout` bounds connecting and each wait for more response data, not the
/// whole transfer, so a large download keeps going as long as bytes arrive.
pub fn http_client(timeout: Duration) -> SwitchyResult<Client> {
    Client::builder()
        .connect_timeout(timeout)
        .read_timeout(timeout)
        .user_agent(concat!("switchy/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| SwitchyError::Network(format!("Failed to build HTTP client: {}", e)))
}

pub fn require_type<'a>(catalog: &'a Catalog, sdk_type: &str) -> SwitchyResult<&'a SdkType> {
    catalog
        .find_type(sdk_type)
        .ok_or_else(|| SwitchyError::NotFound(format!("SDK type '{}'", sdk_type)))
}

pub fn resolve_in<'a>(
    catalog: &'a Catalog,
    sdk_type: &str,
    version: &str,
) -> SwitchyResult<&'a Version> {
    let sdk = require_type(catalog, sdk_type)?;
    sdk.find_version(version).ok_or_else(|| {
        SwitchyError::NotFound(format!("Version '{}' of SDK type '{}'", version, sdk.name))
    })
}
