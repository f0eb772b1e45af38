//! Remote SDK catalog: fetching, parsing and version lookup.

pub mod client;
pub mod platform;
pub mod types;

pub use client::CatalogClient;
pub use platform::Platform;
pub use types::{Catalog, DownloadDescriptor, SdkType, Version};
