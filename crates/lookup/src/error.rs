//! Errors raised by field adapters.

use common::ValidationError;
use thiserror::Error;

use crate::cipher::CipherError;
use crate::queryset::QuerysetError;
use crate::urls::UrlError;

/// Error returned by [`crate::RenderField`] and [`crate::ParseField`].
///
/// Only [`FieldError::Invalid`] is client-facing; every other variant is an
/// unclassified failure the host should treat as a server error.
#[derive(Debug, Error)]
pub enum FieldError {
    /// Client input failed validation.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The cipher (or its provider) failed.
    #[error(transparent)]
    Cipher(#[from] CipherError),

    /// The queryset failed.
    #[error(transparent)]
    Queryset(#[from] QuerysetError),

    /// URL building or resolution failed.
    #[error(transparent)]
    Url(#[from] UrlError),

    /// The view kwargs lack the lookup keyword.
    #[error("view kwargs have no `{0}` entry")]
    MissingLookupKwarg(String),
}

impl FieldError {
    /// The validation error, if this is a client-facing failure.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            FieldError::Invalid(v) => Some(v),
            _ => None,
        }
    }
}
