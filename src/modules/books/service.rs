use std::sync::Arc;

use uuid::Uuid;

use super::error::{BookError, BookResult};
use super::models::{Book, BookPage, CreateBookRequest, ListQuery, SortOrder, UpdateBookRequest};
use super::store::{BookStore, StoreError, MAX_BOOKS};
use super::validation::Validate;

/// Entry point for every book operation.
///
/// Requests are validated before the store is touched; store failures come
/// back as [`BookError`] kinds.
#[derive(Clone)]
pub struct BookService {
    store: Arc<dyn BookStore>,
}

/// Validation already pinned the rating to 1..=5
fn stored_rating(rating: Option<i32>) -> Option<u8> {
    rating.and_then(|r| u8::try_from(r).ok())
}

impl BookService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn BookStore> {
        &self.store
    }

    pub async fn create(&self, request: CreateBookRequest) -> BookResult<Book> {
        let errors = request.validate();
        if !errors.is_empty() {
            return Err(BookError::ValidationFailed(errors));
        }

        let count = self.store.count().await;
        if count >= MAX_BOOKS {
            tracing::warn!(count, "book limit exceeded");
            return Err(BookError::BookLimitExceeded);
        }

        let book = Book {
            id: Uuid::new_v4(),
            rating: stored_rating(request.rating),
            comments: request
                .comment
                .filter(|c| !c.is_empty())
                .into_iter()
                .collect(),
            title: request.title,
            author: request.author,
            isbn: request.isbn,
            cover_image_url: request.cover_image_url,
        };

        match self.store.add(book).await {
            Ok(book) => {
                tracing::info!(book_id = %book.id, title = %book.title, "book created");
                Ok(book)
            }
            // Another creator took the last slot between the count and the insert
            Err(StoreError::CapacityExceeded { .. }) => {
                tracing::warn!(count = MAX_BOOKS, "book limit exceeded");
                Err(BookError::BookLimitExceeded)
            }
            Err(StoreError::DuplicateId(id)) => Err(BookError::Duplicate(id)),
            Err(StoreError::NotFound(id)) => Err(BookError::NotFound(id)),
        }
    }

    /// Overwrite the rating (clearing it when absent) and append the comment
    pub async fn update(&self, request: UpdateBookRequest) -> BookResult<Book> {
        let errors = request.validate();
        // A valid request always carries an id
        let Some(id) = request.book_id.filter(|_| errors.is_empty()) else {
            return Err(BookError::ValidationFailed(errors));
        };

        let book = self
            .store
            .apply_update(
                id,
                stored_rating(request.rating),
                request.comment.as_deref(),
            )
            .await
            .map_err(|_| BookError::NotFound(id))?;

        tracing::info!(
            book_id = %id,
            rating = ?book.rating,
            comments = book.comments.len(),
            "book updated"
        );
        Ok(book)
    }

    pub async fn delete(&self, id: Uuid) -> BookResult<()> {
        self.store
            .remove(id)
            .await
            .map_err(|_| BookError::NotFound(id))?;

        tracing::info!(book_id = %id, "book deleted");
        Ok(())
    }

    /// `None` is an ordinary outcome, not an error
    pub async fn get_by_id(&self, id: Uuid) -> Option<Book> {
        let book = self.store.get(id).await;
        tracing::debug!(book_id = %id, found = book.is_some(), "book lookup");
        book
    }

    /// Page of books; `sort_by == "desc"` (any case) flips the title order
    pub async fn list(
        &self,
        search: Option<&str>,
        sort_by: Option<&str>,
        page: usize,
        page_size: usize,
    ) -> BookPage {
        let query = ListQuery {
            page,
            page_size,
            search: search.map(str::to_string),
            sort: SortOrder::from_param(sort_by),
        };

        let (items, total_count) = self.store.list(&query).await;
        tracing::debug!(
            search = ?query.search,
            page,
            page_size,
            total_count,
            "books listed"
        );

        BookPage {
            items,
            total_count,
            page,
            page_size,
        }
    }
}
