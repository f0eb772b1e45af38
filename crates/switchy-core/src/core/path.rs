use crate::core::error::{SwitchyError, SwitchyResult};
use std::path::{Path, PathBuf};

/// Name of the per-type directory holding the active SDK.
pub const ACTIVE_DIR_NAME: &str = "default";

/// Sidecar file (next to the active directory) naming the active version.
pub const ACTIVE_RECORD_NAME: &str = ".active.yaml";

/// Get the Switchy config home directory
///
/// Platform-specific locations:
/// - Windows: %APPDATA%\switchy
/// - Linux: ~/.config/switchy
/// - macOS: ~/Library/Application Support/switchy
pub fn switchy_home() -> SwitchyResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| SwitchyError::Path("Could not determine config directory".to_string()))?;
    Ok(config_dir.join("switchy"))
}

/// Get the config file path (`<switchy_home>/config.yaml`)
pub fn config_file() -> SwitchyResult<PathBuf> {
    Ok(switchy_home()?.join("config.yaml"))
}

/// Default SDK root when neither config nor environment names one (`~/.switchy`)
pub fn default_sdk_root() -> SwitchyResult<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| SwitchyError::Path("Could not determine home directory".to_string()))?;
    Ok(home.join(".switchy"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> SwitchyResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| SwitchyError::fs(path, e))?;
    }
    Ok(())
}

/// On-disk layout under a resolved SDK root.
///
/// ```text
/// <root>/
///   cache/                    downloaded artifacts
///   sdks/<type>/<version>/    extracted version directories
///   sdks/<type>/default/      active slot
///   sdks/<type>/.active.yaml  active record
/// ```
///
/// Directories are created on demand by the stages that write them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkLayout {
    root: PathBuf,
}

impl SdkLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.root.join("cache")
    }

    pub fn sdks_dir(&self) -> PathBuf {
        self.root.join("sdks")
    }

    pub fn type_dir(&self, sdk_type: &str) -> PathBuf {
        self.sdks_dir().join(sdk_type)
    }

    pub fn version_dir(&self, sdk_type: &str, version: &str) -> PathBuf {
        self.type_dir(sdk_type).join(version)
    }

    pub fn active_dir(&self, sdk_type: &str) -> PathBuf {
        self.type_dir(sdk_type).join(ACTIVE_DIR_NAME)
    }

    pub fn active_record(&self, sdk_type: &str) -> PathBuf {
        self.type_dir(sdk_type).join(ACTIVE_RECORD_NAME)
    }
}

/// Reject names that would escape the SDK root when joined as a path segment.
pub fn validate_segment(kind: &str, value: &str) -> SwitchyResult<()> {
    let invalid = value.is_empty()
        || value == "."
        || value == ".."
        || value == ACTIVE_DIR_NAME
        || value.starts_with('.')
        || value.contains(['/', '\\']);
    if invalid {
        return Err(SwitchyError::Path(format!("Invalid {}: '{}'", kind, value)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_layout_paths() {
        let layout = SdkLayout::new("/opt/switchy");
        assert_eq!(layout.cache_dir(), PathBuf::from("/opt/switchy/cache"));
        assert_eq!(
            layout.version_dir("java", "21.0.6"),
            PathBuf::from("/opt/switchy/sdks/java/21.0.6")
        );
        assert_eq!(
            layout.active_dir("java"),
            PathBuf::from("/opt/switchy/sdks/java/default")
        );
        assert_eq!(
            layout.active_record("java"),
            PathBuf::from("/opt/switchy/sdks/java/.active.yaml")
        );
    }

    #[test]
    fn test_ensure_dir() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("a").join("b");

        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());
        // second call is a no-op
        ensure_dir(&dir).unwrap();
    }

    #[test]
    fn test_validate_segment() {
        assert!(validate_segment("version", "21.0.6").is_ok());
        assert!(validate_segment("SDK type", "java").is_ok());
        assert!(validate_segment("version", "").is_err());
        assert!(validate_segment("version", "..").is_err());
        assert!(validate_segment("version", "../etc").is_err());
        assert!(validate_segment("version", "default").is_err());
        assert!(validate_segment("version", ".hidden").is_err());
        assert!(validate_segment("version", "a\\b").is_err());
    }
}
