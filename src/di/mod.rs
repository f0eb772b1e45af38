//! Dependency injection infrastructure for Switchy
//!
//! Pipeline components are built once from a [`ConfigProvider`] and shared
//! through `Arc`s, so tests can swap in a mock configuration pointing at a
//! temporary SDK root and a local catalog server.
//!
//! # Example (Production)
//! ```no_run
//! use switchy::di::ServiceContainer;
//!
//! # fn example() -> switchy::core::SwitchyResult<()> {
//! let container = ServiceContainer::new()?;
//! let installer = container.installer();
//! # Ok(())
//! # }
//! ```
//!
//! # Example (Testing)
//! ```
//! use switchy::di::{ServiceContainer, mocks::MockConfigProvider};
//! use std::sync::Arc;
//!
//! # fn example() -> switchy::core::SwitchyResult<()> {
//! let config = Arc::new(MockConfigProvider::new("/tmp/switchy-test", "http://127.0.0.1:8080/sdks.json"));
//! let container = ServiceContainer::with_config(config)?;
//! # Ok(())
//! # }
//! ```

pub mod container;
pub mod mocks;
pub mod traits;

// Re-export key types
pub use container::ServiceContainer;
pub use traits::ConfigProvider;
