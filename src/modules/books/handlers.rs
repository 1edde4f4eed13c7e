//! HTTP adapters over [`BookCollection`].

use axum::{extract::State, http::StatusCode};
use shelf_http::{
    error::{AppError, ErrorResponse},
    extract::{ApiJson, ApiPath, ApiQuery},
    response::{ApiMessage, ApiResponse},
};
use utoipa_axum::{router::OpenApiRouter, routes};

use super::collection::BookCollection;
use super::models::{BookCreated, BookDetail, BookFilter, BookList, BookPayload, ListBooksQuery};

/// Routes and their OpenAPI description, relative to the module mount point
pub fn router(collection: BookCollection) -> OpenApiRouter {
    OpenApiRouter::<BookCollection>::new()
        .routes(routes!(add_book, list_books))
        .routes(routes!(get_book, update_book, delete_book))
        .routes(routes!(health_check))
        .with_state(collection)
}

/// Add a book
#[utoipa::path(
    post,
    path = "/",
    tag = "Books",
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book added", body = ApiResponse<BookCreated>),
        (status = 400, description = "Invalid book payload", body = ErrorResponse)
    )
)]
pub async fn add_book(
    State(collection): State<BookCollection>,
    ApiJson(payload): ApiJson<BookPayload>,
) -> Result<(StatusCode, ApiResponse<BookCreated>), AppError> {
    let book_id = collection.add(payload)?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message("Book added successfully", BookCreated { book_id }),
    ))
}

/// List books, optionally filtered
#[utoipa::path(
    get,
    path = "/",
    tag = "Books",
    params(ListBooksQuery),
    responses(
        (status = 200, description = "Matching books", body = ApiResponse<BookList>),
        (status = 400, description = "Malformed query string", body = ErrorResponse)
    )
)]
pub async fn list_books(
    State(collection): State<BookCollection>,
    ApiQuery(query): ApiQuery<ListBooksQuery>,
) -> ApiResponse<BookList> {
    let filter = BookFilter::from(query);
    let books = collection.list(&filter);

    ApiResponse::data(BookList { books })
}

/// Get a book by id
#[utoipa::path(
    get,
    path = "/{book_id}",
    tag = "Books",
    params(("book_id" = String, Path, description = "Book identifier")),
    responses(
        (status = 200, description = "The book", body = ApiResponse<BookDetail>),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn get_book(
    State(collection): State<BookCollection>,
    ApiPath(book_id): ApiPath<String>,
) -> Result<ApiResponse<BookDetail>, AppError> {
    let book = collection.get(&book_id)?;

    Ok(ApiResponse::data(BookDetail { book }))
}

/// Replace a book's attributes
#[utoipa::path(
    put,
    path = "/{book_id}",
    tag = "Books",
    params(("book_id" = String, Path, description = "Book identifier")),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Book updated", body = ApiMessage),
        (status = 400, description = "Invalid book payload", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn update_book(
    State(collection): State<BookCollection>,
    ApiPath(book_id): ApiPath<String>,
    ApiJson(payload): ApiJson<BookPayload>,
) -> Result<ApiMessage, AppError> {
    collection.update(&book_id, payload)?;

    Ok(ApiMessage::new("Book updated successfully"))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/{book_id}",
    tag = "Books",
    params(("book_id" = String, Path, description = "Book identifier")),
    responses(
        (status = 200, description = "Book deleted", body = ApiMessage),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn delete_book(
    State(collection): State<BookCollection>,
    ApiPath(book_id): ApiPath<String>,
) -> Result<ApiMessage, AppError> {
    collection.delete(&book_id)?;

    Ok(ApiMessage::new("Book deleted successfully"))
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "Books",
    responses((status = 200, description = "OK", body = String, content_type = "text/plain"))
)]
pub async fn health_check() -> &'static str {
    "books module is healthy"
}
