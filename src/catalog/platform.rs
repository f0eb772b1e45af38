//! Operating system detection used to pick a catalog descriptor.

use crate::core::{SwitchyError, SwitchyResult};
use std::fmt;

/// Platforms the catalog publishes artifacts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Linux,
    Macos,
    Windows,
}

impl Platform {
    /// Detect the platform this binary runs on.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedPlatform` for any OS without published artifacts.
    pub fn detect() -> SwitchyResult<Self> {
        Self::from_os(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` value to a catalog platform.
    pub fn from_os(os: &str) -> SwitchyResult<Self> {
        match os {
            "linux" => Ok(Self::Linux),
            "macos" => Ok(Self::Macos),
            "windows" => Ok(Self::Windows),
            other => Err(SwitchyError::UnsupportedPlatform {
                os: other.to_string(),
                arch: std::env::consts::ARCH.to_string(),
            }),
        }
    }

    /// Key used in the catalog's `platforms` map.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Macos => "macos",
            Self::Windows => "windows",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
