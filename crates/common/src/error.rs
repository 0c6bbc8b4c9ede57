//! Common error types shared across crates.

use thiserror::Error;

/// A field-level validation failure in the host's vocabulary.
///
/// `code` is the key of the message template that produced `message`
/// (e.g. `"does_not_exist"`), so callers can branch on the kind without
/// parsing human-readable text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Machine-readable error kind.
    pub code: String,
    /// Rendered, client-safe message.
    pub message: String,
}

impl ValidationError {
    /// Construct a [`ValidationError`] from a code and a rendered message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::Validation`] → 400
/// - [`ServiceError::NotFound`] → 404
/// - [`ServiceError::Unavailable`] → 503
/// - [`ServiceError::Internal`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A submitted field failed validation.
    #[error("invalid field `{field}`: {source}")]
    Validation {
        field: String,
        #[source]
        source: ValidationError,
    },

    /// The addressed object does not exist (or its token could not be decoded).
    #[error("not found: {0}")]
    NotFound(String),

    /// No cipher is installed yet.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Wrap a [`ValidationError`] raised while parsing `field`.
    pub fn validation(field: impl Into<String>, source: ValidationError) -> Self {
        ServiceError::Validation {
            field: field.into(),
            source,
        }
    }

    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::Validation { .. } => 400,
            ServiceError::NotFound(_) => 404,
            ServiceError::Unavailable(_) => 503,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Short machine-readable code for the error response body.
    pub fn code(&self) -> &str {
        match self {
            ServiceError::Validation { source, .. } => &source.code,
            ServiceError::NotFound(_) => "not_found",
            ServiceError::Unavailable(_) => "service_unavailable",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}
