//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use axum::http::{header::HOST, HeaderMap};
use lookup::{LookupContext, RequestContext};

use crate::routes::RouteTable;
use crate::store::Store;

/// Application state shared across all request handlers.
///
/// All fields are cheaply cloneable (`Arc`-wrapped or already `Arc`-backed) so
/// that Axum can clone the state for each request without copying expensive data.
#[derive(Clone)]
pub struct AppState {
    /// Parent container holding the lookup cipher.
    pub lookup: LookupContext,
    /// In-memory tables.
    pub store: Store,
    /// Named routes for building and resolving hyperlinks.
    pub routes: RouteTable,
    /// Scheme used for absolute hyperlinks.
    pub url_scheme: Arc<String>,
}

impl AppState {
    /// Create a new [`AppState`] with the provided context, store, and scheme.
    pub fn new(lookup: LookupContext, store: Store, url_scheme: String) -> Self {
        Self {
            lookup,
            store,
            routes: RouteTable::api(),
            url_scheme: Arc::new(url_scheme),
        }
    }

    /// Request context for absolute URLs, taken from the `Host` header.
    /// Without one, hyperlinks are rendered as paths.
    pub fn request_context(&self, headers: &HeaderMap) -> Option<RequestContext> {
        let host = headers.get(HOST)?.to_str().ok()?;
        Some(RequestContext::new(self.url_scheme.as_str(), host))
    }
}

impl Default for AppState {
    /// Creates a default [`AppState`] with no cipher and empty tables, suitable for tests.
    fn default() -> Self {
        Self::new(LookupContext::new(), Store::new(), "http".into())
    }
}
