//! Axum HTTP server, routing, and shared state.
//!
//! # Responsibilities
//! - Define the Axum router with all routes and shared middleware.
//! - Inject shared application state (`AppState`) into handlers.
//! - Translate service errors into JSON error responses.

pub mod handlers;
pub mod router;
pub mod state;
