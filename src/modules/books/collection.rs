use std::sync::Arc;

use time::OffsetDateTime;
use uuid::Uuid;

use super::error::{BookAction, BookError};
use super::models::{BookFilter, BookId, BookPayload, BookRecord, BookSummary};
use super::store::{BookStore, InMemoryBookStore};

/// Validation and lifecycle rules for the book collection.
///
/// Cloning is cheap; every clone shares the same store.
#[derive(Clone)]
pub struct BookCollection {
    store: Arc<dyn BookStore>,
}

impl BookCollection {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    /// Collection backed by a fresh [`InMemoryBookStore`]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryBookStore::new()))
    }

    /// Validate and append a new book, returning its identifier.
    pub fn add(&self, payload: BookPayload) -> Result<BookId, BookError> {
        let draft = payload.validate(BookAction::Add)?;
        let id = Uuid::now_v7().to_string();
        let record = BookRecord::new(id.clone(), draft, OffsetDateTime::now_utc());

        tracing::info!(
            book_id = %id,
            finished = record.finished,
            "book added"
        );
        self.store.insert(record);

        Ok(id)
    }

    pub fn list(&self, filter: &BookFilter) -> Vec<BookSummary> {
        let books = self.store.list(filter);
        tracing::debug!(?filter, matched = books.len(), "books listed");
        books
    }

    pub fn get(&self, id: &str) -> Result<BookRecord, BookError> {
        self.store
            .get(id)
            .ok_or_else(|| not_found(BookAction::Get, id))
    }

    /// Replace the mutable attributes of an existing book.
    ///
    /// Validation runs before the lookup, so an invalid payload for an
    /// unknown id reports the validation failure.
    pub fn update(&self, id: &str, payload: BookPayload) -> Result<BookRecord, BookError> {
        let draft = payload.validate(BookAction::Update)?;

        let record = self
            .store
            .update(id, draft, OffsetDateTime::now_utc())
            .ok_or_else(|| not_found(BookAction::Update, id))?;

        tracing::info!(book_id = %id, finished = record.finished, "book updated");
        Ok(record)
    }

    pub fn delete(&self, id: &str) -> Result<(), BookError> {
        self.store
            .remove(id)
            .ok_or_else(|| not_found(BookAction::Delete, id))?;

        tracing::info!(book_id = %id, "book deleted");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl Default for BookCollection {
    fn default() -> Self {
        Self::in_memory()
    }
}

fn not_found(action: BookAction, id: &str) -> BookError {
    tracing::debug!(book_id = %id, %action, "book not found");
    BookError::NotFound {
        action,
        id: id.to_string(),
    }
}
