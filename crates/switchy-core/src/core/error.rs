use std::path::{Path, PathBuf};
use thiserror::Error;

pub type SwitchyResult<T> = Result<T, SwitchyError>;

#[derive(Error, Debug)]
pub enum SwitchyError {
    /// Host unreachable, non-success status, or the body could not be read.
    #[error("Network error: {0}")]
    Network(String),

    /// The catalog (or another structured document) is not well-formed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Unknown SDK type, version, or platform descriptor.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Downloaded bytes do not match the catalog's SHA-256 digest.
    #[error("Checksum mismatch for {}: expected {expected}, got {actual}", path.display())]
    Integrity {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// Corrupt or unrecognized archive.
    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("WalkDir error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Unsupported platform: {os} on {arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Path error: {0}")]
    Path(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl SwitchyError {
    /// Wrap an I/O error together with the path it happened on.
    pub fn fs(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        SwitchyError::Filesystem {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// True for every variant that reports a local filesystem failure.
    pub fn is_filesystem(&self) -> bool {
        matches!(
            self,
            SwitchyError::Filesystem { .. } | SwitchyError::Io(_) | SwitchyError::WalkDir(_)
        )
    }

    /// True if the failure came from a missing file or directory.
    pub fn is_missing_path(&self) -> bool {
        match self {
            SwitchyError::Filesystem { source, .. } | SwitchyError::Io(source) => {
                source.kind() == std::io::ErrorKind::NotFound
            }
            _ => false,
        }
    }
}
