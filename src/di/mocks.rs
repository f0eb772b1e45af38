//! Mock implementations of service traits for testing

use super::traits::ConfigProvider;
use crate::core::SwitchyResult;
use std::path::PathBuf;
use std::time::Duration;

/// Mock configuration provider for testing
///
/// # Example
///
/// ```
/// use switchy::di::mocks::MockConfigProvider;
/// use switchy::di::ConfigProvider;
/// use std::path::PathBuf;
///
/// let mut config = MockConfigProvider::default();
/// config.sdk_root = PathBuf::from("/tmp/switchy-test");
///
/// assert_eq!(config.sdk_root().unwrap(), PathBuf::from("/tmp/switchy-test"));
/// ```
#[derive(Clone)]
pub struct MockConfigProvider {
    pub sdk_root: PathBuf,
    pub catalog_url: String,
    pub request_timeout: Duration,
}

impl MockConfigProvider {
    /// Mock rooted at `sdk_root` that fetches the catalog from `catalog_url`
    pub fn new(sdk_root: impl Into<PathBuf>, catalog_url: impl Into<String>) -> Self {
        Self {
            sdk_root: sdk_root.into(),
            catalog_url: catalog_url.into(),
            ..Default::default()
        }
    }
}

impl Default for MockConfigProvider {
    fn default() -> Self {
        Self {
            sdk_root: PathBuf::from("/tmp/switchy-test"),
            catalog_url: "http://127.0.0.1:9/sdkVersions.json".to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl ConfigProvider for MockConfigProvider {
    fn sdk_root(&self) -> SwitchyResult<PathBuf> {
        Ok(self.sdk_root.clone())
    }

    fn catalog_url(&self) -> &str {
        &self.catalog_url
    }

    fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}
