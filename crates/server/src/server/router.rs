//! Axum router construction.

use std::time::Duration;

use axum::{routing::get, Router};
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};

use super::{handlers, state::AppState};

/// Build the application [`Router`] with all routes and middleware attached.
///
/// Detail routes capture the lookup token as `:token`; see
/// [`crate::routes::RouteTable::api`] for the matching named patterns.
pub fn build(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route(
            "/authors",
            get(handlers::list_authors).post(handlers::create_author),
        )
        .route("/authors/:token", get(handlers::get_author))
        .route("/books", get(handlers::list_books).post(handlers::create_book))
        .route("/books/:token", get(handlers::get_book))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CompressionLayer::new())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::HOST, HeaderValue, StatusCode};
    use axum_test::TestServer;
    use common::protocol::{AuthorBody, BookBody, ErrorResponse, HealthResponse};
    use lookup::{AeadLookupCipher, Cipher, LookupContext, LookupKey};
    use serde_json::{json, Value};
    use std::sync::Arc;

    use crate::store::Store;

    const TIMEOUT: Duration = Duration::from_secs(30);

    fn server_with_cipher() -> (TestServer, AppState, Arc<AeadLookupCipher>) {
        let cipher =
            Arc::new(AeadLookupCipher::new(LookupKey::from_bytes(&[0x5A; 32]).unwrap()).unwrap());
        let state = AppState::new(
            LookupContext::with_cipher(cipher.clone()),
            Store::new(),
            "http".into(),
        );
        let server = TestServer::new(build(state.clone(), TIMEOUT)).unwrap();
        (server, state, cipher)
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let server = TestServer::new(build(AppState::default(), TIMEOUT)).unwrap();
        let resp = server.get("/unknown").await;
        resp.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_reflects_cipher_state() {
        let server = TestServer::new(build(AppState::default(), TIMEOUT)).unwrap();
        let resp = server.get("/health").await;
        resp.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        assert!(!resp.json::<HealthResponse>().cipher_ready);

        let (server, _, _) = server_with_cipher();
        let resp = server.get("/health").await;
        resp.assert_status_ok();
        assert_eq!(resp.json::<HealthResponse>().status, "ok");
    }

    #[tokio::test]
    async fn created_author_is_addressed_by_token() {
        let (server, _, cipher) = server_with_cipher();
        let resp = server
            .post("/authors")
            .json(&json!({"name": "Ted Chiang"}))
            .await;
        resp.assert_status(StatusCode::CREATED);
        let author: AuthorBody = resp.json();
        assert_eq!(author.id, json!(cipher.encode(&json!(1)).unwrap()));

        let token = author.id.as_str().unwrap();
        let resp = server.get(&format!("/authors/{token}")).await;
        resp.assert_status_ok();
        assert_eq!(resp.json::<AuthorBody>().name, "Ted Chiang");

        // The raw id is not a valid address.
        server.get("/authors/1").await.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn author_url_is_absolute_and_resolvable() {
        let (server, state, _) = server_with_cipher();
        state.store.create_author("Ted Chiang");
        let authors: Vec<AuthorBody> = server
            .get("/authors")
            .add_header(HOST, HeaderValue::from_static("api.test"))
            .await
            .json();
        let url = authors[0].url.as_str().unwrap();
        let path = url
            .strip_prefix("http://api.test")
            .unwrap_or_else(|| panic!("expected absolute URL, got {url}"));
        server.get(path).await.assert_status_ok();
    }

    #[tokio::test]
    async fn create_book_with_encrypted_author() {
        let (server, state, cipher) = server_with_cipher();
        let author = state.store.create_author("Ted Chiang");
        let token = cipher.encode(&json!(author.id)).unwrap();

        let resp = server
            .post("/books")
            .json(&json!({"title": "Exhalation", "author": token}))
            .await;
        resp.assert_status(StatusCode::CREATED);
        let book: BookBody = resp.json();
        assert_eq!(book.author, json!(token));
        assert_ne!(book.id, json!(1));

        // The JSON-encoded form of the token is accepted too.
        let wrapped = serde_json::to_string(&token).unwrap();
        server
            .post("/books")
            .json(&json!({"title": "Stories of Your Life", "author": wrapped}))
            .await
            .assert_status(StatusCode::CREATED);

        let books: Vec<BookBody> = server.get("/books").await.json();
        assert_eq!(books.len(), 2);
        let book_token = books[0].id.as_str().unwrap();
        let resp = server.get(&format!("/books/{book_token}")).await;
        resp.assert_status_ok();
        assert_eq!(resp.json::<BookBody>().title, "Exhalation");
    }

    #[tokio::test]
    async fn create_book_with_unknown_author_is_does_not_exist() {
        let (server, _, cipher) = server_with_cipher();
        let token = cipher.encode(&json!(999)).unwrap();
        let resp = server
            .post("/books")
            .json(&json!({"title": "Ghost", "author": token}))
            .await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        let err: ErrorResponse = resp.json();
        assert_eq!(err.code, "does_not_exist");
        assert_eq!(err.field.as_deref(), Some("author"));
        assert_eq!(err.message, "Invalid pk \"999\" - object does not exist.");
    }

    #[tokio::test]
    async fn create_book_with_raw_author_id_is_incorrect_type() {
        let (server, state, _) = server_with_cipher();
        state.store.create_author("Ted Chiang");
        let resp = server
            .post("/books")
            .json(&json!({"title": "Exhalation", "author": 1}))
            .await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        let err: ErrorResponse = resp.json();
        assert_eq!(err.code, "incorrect_type_encrypted_lookup");
        assert_eq!(
            err.message,
            "Incorrect type. Expected json encoded string value, received int."
        );
    }

    #[tokio::test]
    async fn create_book_without_cipher_is_503() {
        let server = TestServer::new(build(AppState::default(), TIMEOUT)).unwrap();
        let resp = server
            .post("/books")
            .json(&json!({"title": "Exhalation", "author": "v1.a.b"}))
            .await;
        resp.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn responses_never_contain_raw_ids() {
        let (server, state, _) = server_with_cipher();
        let author = state.store.create_author("Ted Chiang");
        state.store.create_book("Exhalation", &author);
        let books: Value = server.get("/books").await.json();
        let book = &books[0];
        for key in ["id", "author"] {
            assert!(book[key].is_string(), "{key} should be a token");
            assert_ne!(book[key], json!("1"));
        }
    }
}
