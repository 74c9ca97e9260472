//! Book storage.
//!
//! [`BookStore`] is the seam the service talks to; [`InMemoryBookStore`] keeps
//! the live collection behind a single lock, so every operation observes the
//! collection either before or after any other, never halfway.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{Book, ListQuery, SortOrder};

/// Hard ceiling on concurrently live books
pub const MAX_BOOKS: usize = 25;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Maximum of {limit} books reached.")]
    CapacityExceeded { limit: usize },

    #[error("Book {0} already exists.")]
    DuplicateId(Uuid),

    #[error("Book {0} not found.")]
    NotFound(Uuid),
}

#[async_trait]
pub trait BookStore: Send + Sync {
    /// Snapshot of the book, if it exists
    async fn get(&self, id: Uuid) -> Option<Book>;

    /// Filtered, sorted page of books plus the filtered (pre-pagination) count
    async fn list(&self, query: &ListQuery) -> (Vec<Book>, usize);

    /// Insert a new book; the capacity check and the insert are one step
    async fn add(&self, book: Book) -> Result<Book, StoreError>;

    /// Overwrite the rating and append `comment` when it is non-empty
    async fn apply_update(
        &self,
        id: Uuid,
        rating: Option<u8>,
        comment: Option<&str>,
    ) -> Result<Book, StoreError>;

    async fn remove(&self, id: Uuid) -> Result<(), StoreError>;

    async fn count(&self) -> usize;
}

/// Process-local store; nothing survives a restart.
pub struct InMemoryBookStore {
    books: RwLock<HashMap<Uuid, Book>>,
    capacity: usize,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::with_capacity(MAX_BOOKS)
    }

    /// Store with a non-standard ceiling, for fixtures larger than the shelf
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            books: RwLock::new(HashMap::new()),
            capacity,
        }
    }
}

impl Default for InMemoryBookStore {
    fn default() -> Self {
        Self::new()
    }
}

fn matches_search(book: &Book, needle: &str) -> bool {
    book.title.to_lowercase().contains(needle) || book.author.to_lowercase().contains(needle)
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn get(&self, id: Uuid) -> Option<Book> {
        self.books.read().await.get(&id).cloned()
    }

    async fn list(&self, query: &ListQuery) -> (Vec<Book>, usize) {
        let needle = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let books = self.books.read().await;
        let mut matched: Vec<(String, &Book)> = books
            .values()
            .filter(|book| needle.as_deref().map_or(true, |n| matches_search(book, n)))
            .map(|book| (book.title.to_lowercase(), book))
            .collect();

        // Ties on the folded title fall back to the raw title then the id so
        // that pages are stable between calls.
        matched.sort_by(|(a_key, a), (b_key, b)| {
            a_key
                .cmp(b_key)
                .then_with(|| a.title.cmp(&b.title))
                .then_with(|| a.id.cmp(&b.id))
        });
        if query.sort == SortOrder::Descending {
            matched.reverse();
        }

        let total = matched.len();
        let skip = query.page.saturating_sub(1).saturating_mul(query.page_size);
        let items = matched
            .into_iter()
            .skip(skip)
            .take(query.page_size)
            .map(|(_, book)| book.clone())
            .collect();

        (items, total)
    }

    async fn add(&self, book: Book) -> Result<Book, StoreError> {
        let mut books = self.books.write().await;

        if books.len() >= self.capacity {
            return Err(StoreError::CapacityExceeded {
                limit: self.capacity,
            });
        }
        if books.contains_key(&book.id) {
            return Err(StoreError::DuplicateId(book.id));
        }

        books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn apply_update(
        &self,
        id: Uuid,
        rating: Option<u8>,
        comment: Option<&str>,
    ) -> Result<Book, StoreError> {
        let mut books = self.books.write().await;
        let book = books.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        book.rating = rating;
        if let Some(text) = comment.filter(|c| !c.is_empty()) {
            book.comments.push(text.to_string());
        }

        Ok(book.clone())
    }

    async fn remove(&self, id: Uuid) -> Result<(), StoreError> {
        self.books
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn count(&self) -> usize {
        self.books.read().await.len()
    }
}
