//! Bookstore Core - book records and pluggable storage.
//!
//! This crate provides the storage side of the bookstore service: the
//! [`Book`] record, the [`BookStore`] trait every backend implements, the
//! in-memory reference backend, and the provider registry that picks a
//! backend by name at startup. It has no HTTP dependency; the
//! `bookstore-server` crate is a thin adapter on top of it.
//!
//! # Example
//!
//! ```rust
//! use bookstore_core::{register_builtin_providers, Book, StoreRegistry};
//!
//! #[tokio::main]
//! async fn main() -> bookstore_core::Result<()> {
//!     let registry = StoreRegistry::new();
//!     register_builtin_providers(&registry);
//!
//!     let store = registry.lookup("mem")?;
//!     store.create(&Book::new("1").with_name("Dune")).await?;
//!
//!     let book = store.get("1").await?;
//!     assert_eq!(book.name, "Dune");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod registry;
pub mod store;

pub use config::{ProviderConfig, ServerConfig};
pub use error::{Result, StoreError};
pub use models::Book;
pub use registry::{register_builtin_providers, StoreRegistry};
pub use store::{BookStore, MemoryBookStore};
