//! In-memory book store.

use super::traits::BookStore;
use crate::error::{Result, StoreError};
use crate::models::Book;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::trace;

/// In-memory backend keyed by book id.
///
/// A single reader/writer lock guards the whole collection: `create`,
/// `update` and `delete` take it exclusively, `get` and `get_all` share it.
/// The guard is never held across an `.await`.
#[derive(Debug, Default)]
pub struct MemoryBookStore {
    books: RwLock<HashMap<String, Book>>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored books.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // Every mutation is a single map operation, so a panicking holder cannot
    // leave the map half-written and a poisoned lock is safe to reuse.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Book>> {
        self.books.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Book>> {
        self.books.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn create(&self, book: &Book) -> Result<()> {
        let mut books = self.write();

        if books.contains_key(&book.id) {
            return Err(StoreError::already_exists(&book.id));
        }

        books.insert(book.id.clone(), book.clone());
        trace!("Stored book {}", book.id);
        Ok(())
    }

    async fn update(&self, book: &Book) -> Result<()> {
        let mut books = self.write();

        let existing = books
            .get(&book.id)
            .ok_or_else(|| StoreError::not_found(&book.id))?;

        let mut merged = existing.clone();
        merged.merge_from(book);
        books.insert(book.id.clone(), merged);

        trace!("Updated book {}", book.id);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Book> {
        self.read()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(id))
    }

    async fn get_all(&self) -> Result<Vec<Book>> {
        Ok(self.read().values().cloned().collect())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        match self.write().remove(id) {
            Some(_) => {
                trace!("Deleted book {}", id);
                Ok(())
            }
            None => Err(StoreError::not_found(id)),
        }
    }
}
