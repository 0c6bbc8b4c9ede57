//! Request and response types exchanged over the demo HTTP API.
//!
//! Every identifier in these bodies is an encrypted lookup token; raw primary
//! keys never appear on the wire.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Authors
// ---------------------------------------------------------------------------

/// Request body for `POST /authors`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuthorRequest {
    pub name: String,
}

/// Representation of an author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorBody {
    /// Encrypted primary key.
    pub id: serde_json::Value,
    pub name: String,
    /// Hyperlink to this author, built from the encrypted key.
    pub url: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Books
// ---------------------------------------------------------------------------

/// Request body for `POST /books`.
///
/// `author` is whatever the client received as an author `id`: a token
/// string, or the JSON encoding of one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookRequest {
    pub title: String,
    pub author: serde_json::Value,
}

/// Representation of a book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookBody {
    pub id: serde_json::Value,
    pub title: String,
    /// Encrypted primary key of the related author.
    pub author: serde_json::Value,
    pub author_url: serde_json::Value,
    pub url: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"does_not_exist"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
    /// Request field the error applies to, for validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            field: None,
        }
    }

    /// Attach the offending request field.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status: `"ok"` or `"degraded"`.
    pub status: String,
    /// Whether a lookup cipher is installed.
    pub cipher_ready: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_book_accepts_any_author_shape() {
        let req: CreateBookRequest =
            serde_json::from_value(json!({"title": "Dune", "author": 12345})).unwrap();
        assert_eq!(req.author, json!(12345));
        let req: CreateBookRequest =
            serde_json::from_value(json!({"title": "Dune", "author": "v1.abc.def"})).unwrap();
        assert_eq!(req.author, json!("v1.abc.def"));
    }

    #[test]
    fn error_response_omits_missing_field() {
        let e = ErrorResponse::new("not_found", "no such author");
        let v = serde_json::to_value(&e).unwrap();
        assert!(v.get("field").is_none());
        let v = serde_json::to_value(e.with_field("author")).unwrap();
        assert_eq!(v["field"], "author");
    }

    #[test]
    fn health_response_serde() {
        let h = HealthResponse {
            status: "ok".into(),
            cipher_ready: true,
        };
        let json = serde_json::to_string(&h).unwrap();
        let decoded: HealthResponse = serde_json::from_str(&json).unwrap();
        assert!(decoded.cipher_ready);
    }
}
