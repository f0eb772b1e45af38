//! End-to-end SDK installation and switching.

pub mod installer;

pub use installer::{ActivatedSdk, SdkInstaller};
