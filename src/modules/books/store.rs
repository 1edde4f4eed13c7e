use parking_lot::RwLock;
use time::OffsetDateTime;

use super::models::{BookDraft, BookFilter, BookRecord, BookSummary};

/// Storage behind the book collection.
///
/// Implementations receive drafts that already passed validation and only
/// report whether the addressed record exists.
pub trait BookStore: Send + Sync {
    fn insert(&self, record: BookRecord);

    /// Summaries of matching records, in insertion order
    fn list(&self, filter: &BookFilter) -> Vec<BookSummary>;

    fn get(&self, id: &str) -> Option<BookRecord>;

    /// Apply `draft` to the record with `id`, returning the updated record
    fn update(&self, id: &str, draft: BookDraft, now: OffsetDateTime) -> Option<BookRecord>;

    /// Remove the record with `id`, returning it
    fn remove(&self, id: &str) -> Option<BookRecord>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-lifetime store; contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryBookStore {
    books: RwLock<Vec<BookRecord>>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BookStore for InMemoryBookStore {
    fn insert(&self, record: BookRecord) {
        self.books.write().push(record);
    }

    fn list(&self, filter: &BookFilter) -> Vec<BookSummary> {
        self.books
            .read()
            .iter()
            .filter(|book| filter.matches(book))
            .map(BookRecord::to_summary)
            .collect()
    }

    fn get(&self, id: &str) -> Option<BookRecord> {
        self.books.read().iter().find(|book| book.id == id).cloned()
    }

    fn update(&self, id: &str, draft: BookDraft, now: OffsetDateTime) -> Option<BookRecord> {
        let mut books = self.books.write();
        let book = books.iter_mut().find(|book| book.id == id)?;
        book.apply(draft, now);
        Some(book.clone())
    }

    fn remove(&self, id: &str) -> Option<BookRecord> {
        let mut books = self.books.write();
        let index = books.iter().position(|book| book.id == id)?;
        Some(books.remove(index))
    }

    fn len(&self) -> usize {
        self.books.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str) -> BookDraft {
        BookDraft {
            name: name.to_string(),
            year: Some(2001),
            author: None,
            summary: None,
            publisher: Some("Ace".to_string()),
            page_count: 10,
            read_page: 0,
            reading: false,
        }
    }

    fn store_with(names: &[&str]) -> InMemoryBookStore {
        let store = InMemoryBookStore::new();
        for name in names {
            store.insert(BookRecord::new(
                name.to_string(),
                draft(name),
                OffsetDateTime::UNIX_EPOCH,
            ));
        }
        store
    }

    #[test]
    fn list_preserves_insertion_order() {
        let store = store_with(&["c", "a", "b"]);
        let ids: Vec<_> = store
            .list(&BookFilter::new())
            .into_iter()
            .map(|summary| summary.id)
            .collect();
        assert_eq!(ids, ["c", "a", "b"]);
    }

    #[test]
    fn update_of_missing_record_is_none() {
        let store = store_with(&["a"]);
        assert!(store
            .update("zzz", draft("x"), OffsetDateTime::UNIX_EPOCH)
            .is_none());
        assert_eq!(store.get("a").unwrap().name, "a");
    }

    #[test]
    fn remove_takes_only_the_addressed_record() {
        let store = store_with(&["a", "b"]);
        assert_eq!(store.remove("a").unwrap().id, "a");
        assert!(store.remove("a").is_none());
        assert_eq!(store.len(), 1);
        assert!(store.get("b").is_some());
    }
}
