//! Human-readable suggestions attached to pipeline errors.

use crate::core::error::SwitchyError;

/// A short hint telling the user what to try next.
pub trait ErrorHelp {
    fn help(&self) -> Option<String>;
}

impl ErrorHelp for SwitchyError {
    fn help(&self) -> Option<String> {
        let hint = match self {
            SwitchyError::Network(_) => {
                "Check your internet connection and the catalog_url in config.yaml, then retry."
            }
            SwitchyError::Parse(_) => {
                "The SDK catalog looks malformed. Try again later or point catalog_url at a valid catalog."
            }
            SwitchyError::NotFound(_) => {
                "Run `switchy list` to see available SDK types, or `switchy list <sdk>` for versions."
            }
            SwitchyError::Integrity { .. } => {
                "The download did not match its published checksum and was discarded. Retry; if it keeps failing the upstream file may have changed."
            }
            SwitchyError::Extraction(_) => {
                "The archive could not be unpacked. It may be corrupt or in an unsupported format."
            }
            SwitchyError::Filesystem { .. } | SwitchyError::Io(_) | SwitchyError::WalkDir(_) => {
                "Check that the SDK root is writable and has enough free space (see sdk_root in config.yaml or SWITCHY_HOME)."
            }
            SwitchyError::UnsupportedPlatform { .. } => {
                "Switchy publishes SDKs for linux, macos and windows only."
            }
            SwitchyError::Config(_) | SwitchyError::Yaml(_) => {
                "Fix or delete config.yaml; a default one is recreated on the next run."
            }
            SwitchyError::Path(_) | SwitchyError::Cancelled => return None,
        };
        Some(hint.to_string())
    }
}

/// Render an error followed by its suggestion, if any.
pub fn format_error_with_help(error: &SwitchyError) -> String {
    match error.help() {
        Some(help) => format!("Error: {}\n\n  help: {}", error, help),
        None => format!("Error: {}", error),
    }
}
