//! Book route handlers.
//!
//! Each handler decodes the request, makes one [`BookStore`] call and maps the
//! outcome to a response. Every store error and every undecodable body is a
//! 400 with the error message as a plain-text body.

use crate::server::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header::X_CONTENT_TYPE_OPTIONS, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bookstore_core::{Book, BookStore, StoreError};
use serde_json::json;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, warn};

/// Error returned by the book handlers.
#[derive(Debug)]
pub enum ApiError {
    /// The store rejected the operation.
    Store(StoreError),
    /// The request body is not a valid book.
    InvalidBody(serde_json::Error),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::InvalidBody(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match self {
            ApiError::Store(err) if err.is_business_error() => {
                debug!("Store rejected request: {}", err);
                err.to_string()
            }
            ApiError::Store(err) => {
                warn!("Store is misconfigured: {}", err);
                err.to_string()
            }
            ApiError::InvalidBody(err) => {
                debug!("Invalid request body: {}", err);
                err.to_string()
            }
        };
        error_response(StatusCode::BAD_REQUEST, message)
    }
}

/// Plain-text error response: the message plus a trailing newline, marked
/// `nosniff` so clients keep it as text.
pub fn error_response(status: StatusCode, message: impl Display) -> Response {
    (
        status,
        [(X_CONTENT_TYPE_OPTIONS, "nosniff")],
        format!("{}\n", message),
    )
        .into_response()
}

type ApiResult<T> = std::result::Result<T, ApiError>;

fn decode_book(body: &[u8]) -> ApiResult<Book> {
    Ok(serde_json::from_slice(body)?)
}

fn store(state: &AppState) -> &dyn BookStore {
    state.store.as_ref()
}

/// Health check endpoint.
pub async fn handle_health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// `POST /book`
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<StatusCode> {
    let book = decode_book(&body)?;
    store(&state).create(&book).await?;
    Ok(StatusCode::OK)
}

/// `PATCH /book/:id`
///
/// The id in the path wins over any id in the body.
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<StatusCode> {
    let mut book = decode_book(&body)?;
    book.id = id;
    store(&state).update(&book).await?;
    Ok(StatusCode::OK)
}

/// `GET /book/:id`
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Book>> {
    let book = store(&state).get(&id).await?;
    Ok(Json(book))
}

/// `GET /book`
pub async fn get_all_books(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Book>>> {
    let books = store(&state).get_all().await?;
    Ok(Json(books))
}

/// `DELETE /book/:id`
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    store(&state).delete(&id).await?;
    Ok(StatusCode::OK)
}
