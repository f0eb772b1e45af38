use crate::core::path::{config_file, default_sdk_root, ensure_dir};
use crate::core::{SwitchyError, SwitchyResult};
use crate::di::ConfigProvider;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the SDK root.
pub const SWITCHY_HOME_ENV: &str = "SWITCHY_HOME";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory holding `cache/` and `sdks/` (defaults to `~/.switchy`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdk_root: Option<PathBuf>,

    /// URL of the remote SDK catalog (JSON)
    #[serde(default = "default_catalog_url")]
    pub catalog_url: String,

    /// Timeout applied to every HTTP request, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_catalog_url() -> String {
    "https://raw.githubusercontent.com/jkvn/Switchy/refs/heads/main/sdk/sdkVersions.json"
        .to_string()
}

fn default_request_timeout_secs() -> u64 {
    300
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sdk_root: None,
            catalog_url: default_catalog_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    /// Load config from the platform-specific config directory, creating a default if it doesn't exist
    ///
    /// Config locations:
    /// - Windows: %APPDATA%\switchy\config.yaml
    /// - Linux: ~/.config/switchy/config.yaml
    /// - macOS: ~/Library/Application Support/switchy/config.yaml
    pub fn load() -> SwitchyResult<Self> {
        Self::load_from(&config_file()?)
    }

    /// Load config from an explicit path, writing defaults there if it is missing
    pub fn load_from(config_path: &Path) -> SwitchyResult<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let content =
            fs::read_to_string(config_path).map_err(|e| SwitchyError::fs(config_path, e))?;
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| SwitchyError::Config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Save config to the platform-specific config directory
    pub fn save(&self) -> SwitchyResult<()> {
        self.save_to(&config_file()?)
    }

    pub fn save_to(&self, config_path: &Path) -> SwitchyResult<()> {
        let config_dir = config_path
            .parent()
            .ok_or_else(|| SwitchyError::Path("Invalid config path".to_string()))?;

        ensure_dir(config_dir)?;

        let content = serde_yaml::to_string(self)
            .map_err(|e| SwitchyError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(config_path, content).map_err(|e| SwitchyError::fs(config_path, e))?;
        Ok(())
    }

    /// Resolve the SDK root: `SWITCHY_HOME`, then `sdk_root`, then `~/.switchy`
    pub fn get_sdk_root(&self) -> SwitchyResult<PathBuf> {
        if let Some(home) = std::env::var_os(SWITCHY_HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(home));
        }
        match self.sdk_root {
            Some(ref root) => Ok(root.clone()),
            None => default_sdk_root(),
        }
    }
}

impl ConfigProvider for Config {
    fn sdk_root(&self) -> SwitchyResult<PathBuf> {
        self.get_sdk_root()
    }

    fn catalog_url(&self) -> &str {
        &self.catalog_url
    }

    fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}
