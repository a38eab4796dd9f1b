//! HTTP handlers for the books module.
//!
//! In lenient mode (the default) every handler answers 200: lookup misses
//! produce an empty book or the full listing, and bodies are decoded
//! best-effort. Strict mode reports those cases as 404 and 400.

use axum::{
    body::Bytes,
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use bookshelf_http::error::AppError;

use super::models::Book;
use super::payload::{self, DecodedBook};
use super::registry::{BookRegistry, UpdateOutcome};

/// State shared by every books handler.
#[derive(Debug, Clone)]
pub struct BooksState {
    pub registry: BookRegistry,
    pub strict_errors: bool,
}

/// Routes relative to `/api`.
pub fn router(state: BooksState) -> Router {
    Router::new()
        .route("/books", get(list_books).post(create_book))
        .route("/book/{id}", get(get_book))
        .route("/books/{id}", put(update_book).delete(delete_book))
        .with_state(state)
}

async fn list_books(State(state): State<BooksState>) -> Json<Vec<Book>> {
    Json(state.registry.list().await)
}

async fn get_book(
    State(state): State<BooksState>,
    Path(id): Path<String>,
) -> Result<Json<Book>, AppError> {
    match state.registry.get(&id).await {
        Some(book) => Ok(Json(book)),
        None if state.strict_errors => Err(not_found(&id)),
        None => Ok(Json(Book::default())),
    }
}

async fn create_book(
    State(state): State<BooksState>,
    body: Bytes,
) -> Result<Json<Book>, AppError> {
    let book = decode_book(&body, state.strict_errors)?;
    let created = state.registry.create(book).await;
    tracing::info!(id = %created.id, title = %created.title, "book created");
    Ok(Json(created))
}

async fn update_book(
    State(state): State<BooksState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Response, AppError> {
    let book = decode_book(&body, state.strict_errors)?;
    match state.registry.update(&id, book).await {
        UpdateOutcome::Updated(updated) => {
            tracing::info!(id = %updated.id, "book updated");
            Ok(Json(updated).into_response())
        }
        UpdateOutcome::Missing(_) if state.strict_errors => Err(not_found(&id)),
        UpdateOutcome::Missing(books) => Ok(Json(books).into_response()),
    }
}

async fn delete_book(
    State(state): State<BooksState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Book>>, AppError> {
    let outcome = state.registry.delete(&id).await;
    match outcome.removed {
        Some(_) => {
            tracing::info!(%id, "book deleted");
            Ok(Json(outcome.remaining))
        }
        None if state.strict_errors => Err(not_found(&id)),
        None => Ok(Json(outcome.remaining)),
    }
}

/// Decode a request body into a book.
///
/// Lenient mode keeps every readable field and logs the first problem; strict
/// mode rejects the body with that problem instead.
fn decode_book(body: &[u8], strict: bool) -> Result<Book, AppError> {
    let DecodedBook { book, error } = payload::decode(body);
    match error {
        None => Ok(book),
        Some(err) if strict => Err(AppError::invalid_input(err.details(), err.to_string())),
        Some(err) => {
            tracing::warn!(error = %err, "book payload only partially decoded");
            Ok(book)
        }
    }
}

fn not_found(id: &str) -> AppError {
    AppError::not_found(format!("book '{}' not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_decode_yields_empty_book() {
        let book = decode_book(b"{not json", false).unwrap();
        assert_eq!(book, Book::default());
    }

    #[test]
    fn lenient_decode_of_empty_body_yields_empty_book() {
        assert_eq!(decode_book(b"", false).unwrap(), Book::default());
    }

    #[test]
    fn lenient_decode_keeps_readable_fields() {
        let book = decode_book(br#"{"id":12,"isbn":"999","title":"New Book"}"#, false).unwrap();
        assert_eq!(book.isbn, "999");
        assert_eq!(book.title, "New Book");
    }

    #[test]
    fn strict_decode_reports_first_wrong_field() {
        let err = decode_book(b"{\"title\": 5}", true).unwrap_err();
        match err {
            AppError::BadRequest {
                details, message, ..
            } => {
                assert_eq!(details[0]["field"], "title");
                assert!(message.starts_with("invalid book payload"));
            }
            other => panic!("expected bad request, got {other:?}"),
        }
    }

    #[test]
    fn strict_decode_reports_syntax_position() {
        let err = decode_book(b"{\"title\": [", true).unwrap_err();
        match err {
            AppError::BadRequest { details, .. } => assert_eq!(details[0]["line"], 1),
            other => panic!("expected bad request, got {other:?}"),
        }
    }
}
