//! Integration tests for the `switchy` CLI.

mod common;
mod error_recovery;
mod list;
mod use_sdk;
mod version;
