//! Pluggable book storage.
//!
//! [`BookStore`] is the contract every backend implements; callers only ever
//! see `Arc<dyn BookStore>` handed out by the [registry](crate::registry).
//! [`MemoryBookStore`] is the in-memory reference backend.

mod memory;
mod traits;

pub use memory::MemoryBookStore;
pub use traits::BookStore;
