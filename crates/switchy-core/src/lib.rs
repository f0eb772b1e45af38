//! Core utilities shared by the Switchy library and binary.
//!
//! Holds the error taxonomy, user-facing error help, and the on-disk layout
//! of the SDK root.

pub mod core;

pub use crate::core::error::{SwitchyError, SwitchyResult};
pub use crate::core::error_help::{format_error_with_help, ErrorHelp};
pub use crate::core::path::SdkLayout;
