use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::{IntoParams, ToSchema};

use super::error::{BookAction, BookError};

/// Identifier assigned to a book when it is added.
pub type BookId = String;

/// A book held in the collection.
///
/// `finished` is derived from `page_count` and `read_page` whenever the record
/// is written, so it is only set through [`BookRecord::new`] and
/// [`BookRecord::apply`].
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub id: BookId,
    pub name: String,
    pub year: Option<i32>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    pub page_count: u32,
    pub read_page: u32,
    pub finished: bool,
    pub reading: bool,
    /// Creation time, never changed after insert
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub inserted_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: OffsetDateTime,
}

impl BookRecord {
    pub fn new(id: BookId, draft: BookDraft, now: OffsetDateTime) -> Self {
        Self {
            id,
            finished: draft.is_finished(),
            name: draft.name,
            year: draft.year,
            author: draft.author,
            summary: draft.summary,
            publisher: draft.publisher,
            page_count: draft.page_count,
            read_page: draft.read_page,
            reading: draft.reading,
            inserted_at: now,
            updated_at: now,
        }
    }

    /// Replace every mutable attribute, keeping `id` and `inserted_at`.
    pub fn apply(&mut self, draft: BookDraft, now: OffsetDateTime) {
        self.finished = draft.is_finished();
        self.name = draft.name;
        self.year = draft.year;
        self.author = draft.author;
        self.summary = draft.summary;
        self.publisher = draft.publisher;
        self.page_count = draft.page_count;
        self.read_page = draft.read_page;
        self.reading = draft.reading;
        self.updated_at = now;
    }

    pub fn to_summary(&self) -> BookSummary {
        BookSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            publisher: self.publisher.clone(),
        }
    }
}

/// Request body for adding or updating a book.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    /// Required, must not be empty
    pub name: Option<String>,
    pub year: Option<i32>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    #[serde(default)]
    pub page_count: u32,
    /// Must not exceed `pageCount`
    #[serde(default)]
    pub read_page: u32,
    #[serde(default)]
    pub reading: bool,
}

impl BookPayload {
    /// Check the payload for `action`, producing a draft the store can write.
    ///
    /// The name is checked before the page counts.
    pub fn validate(self, action: BookAction) -> Result<BookDraft, BookError> {
        let name = match self.name {
            Some(name) if !name.is_empty() => name,
            _ => return Err(BookError::MissingName { action }),
        };

        if self.read_page > self.page_count {
            return Err(BookError::ReadPageExceedsPageCount {
                action,
                read_page: self.read_page,
                page_count: self.page_count,
            });
        }

        Ok(BookDraft {
            name,
            year: self.year,
            author: self.author,
            summary: self.summary,
            publisher: self.publisher,
            page_count: self.page_count,
            read_page: self.read_page,
            reading: self.reading,
        })
    }
}

/// Validated book attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub name: String,
    pub year: Option<i32>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    pub page_count: u32,
    pub read_page: u32,
    pub reading: bool,
}

impl BookDraft {
    pub fn is_finished(&self) -> bool {
        self.read_page == self.page_count
    }
}

/// Projection returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BookSummary {
    pub id: BookId,
    pub name: String,
    pub publisher: Option<String>,
}

/// Raw list query as it arrives on the URL.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListBooksQuery {
    /// Case-insensitive substring of the book name
    pub name: Option<String>,
    /// `1` or `true` for books being read, anything else for the rest
    pub reading: Option<String>,
    /// `1` or `true` for finished books, anything else for the rest
    pub finished: Option<String>,
}

/// Criteria applied by the list operation; unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    name: Option<String>,
    pub reading: Option<bool>,
    pub finished: Option<bool>,
}

impl BookFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, needle: impl AsRef<str>) -> Self {
        self.name = Some(needle.as_ref().to_lowercase());
        self
    }

    pub fn reading(mut self, reading: bool) -> Self {
        self.reading = Some(reading);
        self
    }

    pub fn finished(mut self, finished: bool) -> Self {
        self.finished = Some(finished);
        self
    }

    pub fn matches(&self, book: &BookRecord) -> bool {
        if let Some(needle) = &self.name {
            if !book.name.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }

        self.reading.map_or(true, |reading| book.reading == reading)
            && self.finished.map_or(true, |finished| book.finished == finished)
    }
}

impl From<ListBooksQuery> for BookFilter {
    fn from(query: ListBooksQuery) -> Self {
        let mut filter = BookFilter::new();

        if let Some(name) = query.name.filter(|name| !name.is_empty()) {
            filter = filter.name(name);
        }
        if let Some(reading) = query.reading.as_deref().and_then(parse_flag) {
            filter = filter.reading(reading);
        }
        if let Some(finished) = query.finished.as_deref().and_then(parse_flag) {
            filter = filter.finished(finished);
        }

        filter
    }
}

/// Empty means "no filter"; `1`/`true` mean true; anything else means false.
fn parse_flag(raw: &str) -> Option<bool> {
    if raw.is_empty() {
        return None;
    }

    Some(raw == "1" || raw.eq_ignore_ascii_case("true"))
}

/// Body of a successful add.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookCreated {
    pub book_id: BookId,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetail {
    pub book: BookRecord,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookList {
    pub books: Vec<BookSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str, page_count: u32, read_page: u32) -> BookPayload {
        BookPayload {
            name: Some(name.to_string()),
            page_count,
            read_page,
            ..BookPayload::default()
        }
    }

    fn record(name: &str, page_count: u32, read_page: u32, reading: bool) -> BookRecord {
        let draft = BookPayload {
            reading,
            ..payload(name, page_count, read_page)
        }
        .validate(BookAction::Add)
        .unwrap();
        BookRecord::new(name.to_lowercase(), draft, OffsetDateTime::UNIX_EPOCH)
    }

    #[test]
    fn missing_name_is_rejected_before_page_counts() {
        let err = BookPayload {
            name: None,
            page_count: 1,
            read_page: 5,
            ..BookPayload::default()
        }
        .validate(BookAction::Add)
        .unwrap_err();

        assert!(matches!(err, BookError::MissingName { .. }));
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = payload("", 10, 0).validate(BookAction::Update).unwrap_err();
        assert!(matches!(
            err,
            BookError::MissingName {
                action: BookAction::Update
            }
        ));
    }

    #[test]
    fn read_page_beyond_page_count_is_rejected() {
        let err = payload("Dune", 100, 101).validate(BookAction::Add).unwrap_err();
        assert!(matches!(
            err,
            BookError::ReadPageExceedsPageCount {
                read_page: 101,
                page_count: 100,
                ..
            }
        ));
    }

    #[test]
    fn finished_follows_page_counts() {
        assert!(record("Done", 120, 120, false).finished);
        assert!(!record("Halfway", 120, 60, true).finished);
    }

    #[test]
    fn apply_keeps_identity_and_recomputes_finished() {
        let mut book = record("Draft", 100, 10, true);
        let later = OffsetDateTime::UNIX_EPOCH + time::Duration::hours(1);
        let draft = payload("Final", 100, 100).validate(BookAction::Update).unwrap();

        book.apply(draft, later);

        assert_eq!(book.id, "draft");
        assert_eq!(book.inserted_at, OffsetDateTime::UNIX_EPOCH);
        assert_eq!(book.updated_at, later);
        assert_eq!(book.name, "Final");
        assert!(book.finished);
        assert!(!book.reading);
    }

    #[test]
    fn record_serializes_with_camel_case_keys() {
        let value = serde_json::to_value(record("Dune", 412, 12, true)).unwrap();

        assert_eq!(value["pageCount"], 412);
        assert_eq!(value["readPage"], 12);
        assert_eq!(value["insertedAt"], "1970-01-01T00:00:00Z");
        assert_eq!(value["publisher"], serde_json::Value::Null);
    }

    #[test]
    fn name_filter_is_case_insensitive_substring() {
        let filter = BookFilter::new().name("DUN");
        assert!(filter.matches(&record("Dune Messiah", 10, 0, false)));
        assert!(!filter.matches(&record("Foundation", 10, 0, false)));
    }

    #[test]
    fn filters_compose_with_and() {
        let filter = BookFilter::new().reading(true).finished(false);
        assert!(filter.matches(&record("a", 10, 5, true)));
        assert!(!filter.matches(&record("b", 10, 10, true)));
        assert!(!filter.matches(&record("c", 10, 5, false)));
    }

    #[test]
    fn query_flags_follow_one_or_true() {
        let filter = BookFilter::from(ListBooksQuery {
            name: Some(String::new()),
            reading: Some("1".to_string()),
            finished: Some("0".to_string()),
        });
        assert_eq!(filter, BookFilter::new().reading(true).finished(false));

        let filter = BookFilter::from(ListBooksQuery {
            name: None,
            reading: Some("TRUE".to_string()),
            finished: Some(String::new()),
        });
        assert_eq!(filter, BookFilter::new().reading(true));

        let filter = BookFilter::from(ListBooksQuery {
            reading: Some("yes".to_string()),
            ..ListBooksQuery::default()
        });
        assert_eq!(filter.reading, Some(false));
    }
}
