//! Storage backend trait.

use crate::error::Result;
use crate::models::Book;
use async_trait::async_trait;

/// Storage capability for a collection of books.
///
/// Implementations must be safe under arbitrary concurrent calls. Values go in
/// by reference and come out owned, so a caller never holds a handle into
/// stored state.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Insert a new book keyed by `book.id`.
    ///
    /// Fails with [`StoreError::AlreadyExists`](crate::StoreError::AlreadyExists)
    /// if the id is taken; the stored record is left untouched.
    async fn create(&self, book: &Book) -> Result<()>;

    /// Partially update the book at `book.id`.
    ///
    /// Merges with [`Book::merge_from`]. Fails with
    /// [`StoreError::NotFound`](crate::StoreError::NotFound) if absent.
    async fn update(&self, book: &Book) -> Result<()>;

    /// Get a copy of the book with the given id.
    async fn get(&self, id: &str) -> Result<Book>;

    /// Get a snapshot of every stored book, in arbitrary order.
    async fn get_all(&self) -> Result<Vec<Book>>;

    /// Delete the book with the given id.
    async fn delete(&self, id: &str) -> Result<()>;
}
