//! Axum request handlers for all service endpoints.
//!
//! Raw ids never leave these handlers: every id, foreign key, and hyperlink
//! in a response body is rendered through the serializers.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::{CreateAuthorRequest, CreateBookRequest, ErrorResponse, HealthResponse};
use common::ServiceError;
use serde::Serialize;
use tracing::info;

use super::state::AppState;
use crate::serializers::{into_service_error, lookup_error, AuthorSerializer, BookSerializer};

/// `GET /health`: readiness check.
///
/// Returns `200 OK` when a lookup cipher is installed, `503` otherwise.
pub async fn health(State(state): State<AppState>) -> Response {
    let cipher_ready = state.lookup.is_ready();
    let (status_code, status_str) = if cipher_ready {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };
    let body = HealthResponse {
        status: status_str.into(),
        cipher_ready,
    };
    (status_code, Json(body)).into_response()
}

/// `GET /authors`
pub async fn list_authors(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let serializer = AuthorSerializer::new(&state, state.request_context(&headers));
    let bodies: Result<Vec<_>, _> = state
        .store
        .authors
        .all()
        .iter()
        .map(|author| serializer.to_representation(author))
        .collect();
    respond(StatusCode::OK, bodies.map_err(|e| into_service_error("id", e)))
}

/// `POST /authors`
pub async fn create_author(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateAuthorRequest>,
) -> Response {
    let serializer = AuthorSerializer::new(&state, state.request_context(&headers));
    let result = serializer.validate(&req).and_then(|name| {
        let author = state.store.create_author(name);
        info!(author_id = author.id, "author created");
        serializer
            .to_representation(&author)
            .map_err(|e| into_service_error("id", e))
    });
    respond(StatusCode::CREATED, result)
}

/// `GET /authors/:token`
pub async fn get_author(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(token): Path<String>,
) -> Response {
    let serializer = AuthorSerializer::new(&state, state.request_context(&headers));
    let result = serializer.lookup(token).map_err(lookup_error).and_then(|author| {
        serializer
            .to_representation(&author)
            .map_err(|e| into_service_error("id", e))
    });
    respond(StatusCode::OK, result)
}

/// `GET /books`
pub async fn list_books(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let serializer = BookSerializer::new(&state, state.request_context(&headers));
    let bodies: Result<Vec<_>, _> = state
        .store
        .books
        .all()
        .iter()
        .map(|book| serializer.to_representation(book))
        .collect();
    respond(StatusCode::OK, bodies.map_err(|e| into_service_error("id", e)))
}

/// `POST /books`: `author` must be an author token (or its JSON encoding).
pub async fn create_book(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateBookRequest>,
) -> Response {
    let serializer = BookSerializer::new(&state, state.request_context(&headers));
    let result = serializer.validate(&req).and_then(|(title, author)| {
        let book = state.store.create_book(title, &author);
        info!(book_id = book.id, author_id = author.id, "book created");
        serializer
            .to_representation(&book)
            .map_err(|e| into_service_error("id", e))
    });
    respond(StatusCode::CREATED, result)
}

/// `GET /books/:token`
pub async fn get_book(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(token): Path<String>,
) -> Response {
    let serializer = BookSerializer::new(&state, state.request_context(&headers));
    let result = serializer.lookup(token).map_err(lookup_error).and_then(|book| {
        serializer
            .to_representation(&book)
            .map_err(|e| into_service_error("id", e))
    });
    respond(StatusCode::OK, result)
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

fn respond<T: Serialize>(status: StatusCode, result: Result<T, ServiceError>) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(err) => error_response(&err),
    }
}

fn error_response(err: &ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = match err {
        ServiceError::Validation { field, source } => {
            ErrorResponse::new(err.code(), source.message.clone()).with_field(field.clone())
        }
        other => ErrorResponse::new(other.code(), other.to_string()),
    };
    (status, Json(body)).into_response()
}
