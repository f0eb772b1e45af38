//! Switchy: download, cache, unpack and switch between SDK versions.
//!
//! This crate provides the main Switchy library, re-exporting core functionality
//! from `switchy-core` and organizing the pipeline stages: catalog resolution,
//! the download cache, archive extraction and version activation.

pub use switchy_core::{format_error_with_help, ErrorHelp, SdkLayout, SwitchyError, SwitchyResult};

/// Core module re-exported for convenience.
pub mod core {
    pub use switchy_core::core::*;
    pub use switchy_core::*;
}

/// Configuration management.
pub mod config;

/// Dependency injection infrastructure.
pub mod di;

/// Remote SDK catalog.
pub mod catalog;

/// Verified download cache.
pub mod cache;

/// Archive extraction.
pub mod archive;

/// Active version switching.
pub mod activate;

/// Stage orchestration used by the CLI.
pub mod sdk;
