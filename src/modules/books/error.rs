use std::fmt;

use serde_json::json;
use shelf_http::error::AppError;
use thiserror::Error;

use super::models::BookId;

/// Operation a [`BookError`] was raised from; shapes the message wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookAction {
    Add,
    Get,
    Update,
    Delete,
}

impl fmt::Display for BookAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            BookAction::Add => "add",
            BookAction::Get => "get",
            BookAction::Update => "update",
            BookAction::Delete => "delete",
        };
        f.write_str(verb)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookError {
    #[error("Failed to {action} book. Please provide the book name")]
    MissingName { action: BookAction },

    #[error("Failed to {action} book. readPage must not be greater than pageCount")]
    ReadPageExceedsPageCount {
        action: BookAction,
        read_page: u32,
        page_count: u32,
    },

    #[error("{}", not_found_message(.action))]
    NotFound { action: BookAction, id: BookId },
}

fn not_found_message(action: &BookAction) -> String {
    match action {
        BookAction::Get => "Book not found".to_string(),
        other => format!("Failed to {} book. Id not found", other),
    }
}

impl BookError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, BookError::NotFound { .. })
    }
}

impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        let message = err.to_string();

        match err {
            BookError::MissingName { .. } => AppError::validation(
                vec![json!({"field": "name", "error": "required"})],
                message,
            ),
            BookError::ReadPageExceedsPageCount {
                read_page,
                page_count,
                ..
            } => AppError::validation(
                vec![json!({
                    "field": "readPage",
                    "error": "exceeds_page_count",
                    "readPage": read_page,
                    "pageCount": page_count,
                })],
                message,
            ),
            BookError::NotFound { .. } => AppError::not_found(message),
        }
    }
}
