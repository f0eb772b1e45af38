//! Trait definitions for dependency injection

use crate::core::SwitchyResult;
use std::path::PathBuf;
use std::time::Duration;

/// Trait for configuration access
///
/// Provides read-only access to application configuration.
/// Implementations should be thread-safe (Send + Sync).
pub trait ConfigProvider: Send + Sync {
    /// Root directory holding `cache/` and `sdks/`
    fn sdk_root(&self) -> SwitchyResult<PathBuf>;

    /// URL of the remote SDK catalog
    fn catalog_url(&self) -> &str;

    /// Timeout applied to every HTTP request
    fn request_timeout(&self) -> Duration;
}
