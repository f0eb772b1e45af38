pub mod list;
pub mod progress;
pub mod use_sdk;
pub mod version;
