//! Host seam for resolving decoded primary keys into objects.

use serde_json::Value;
use thiserror::Error;

/// Errors a [`Queryset`] may raise while looking up a primary key.
#[derive(Debug, Error)]
pub enum QuerysetError {
    /// No object has the requested primary key.
    #[error("object does not exist")]
    DoesNotExist,

    /// The key has the wrong type or shape for this queryset's key column.
    #[error("invalid primary key: {0}")]
    InvalidKey(String),

    /// The backing store failed.
    #[error("queryset backend failure: {0}")]
    Backend(String),
}

/// Anything that can be looked up and exposed by primary key.
pub trait PrimaryKey {
    /// The raw primary key. `Value::Null` means "not saved yet".
    fn pk(&self) -> Value;
}

/// A resolvable collection of candidate objects.
pub trait Queryset {
    type Object;

    /// Fetch the object whose primary key is `pk`.
    ///
    /// # Errors
    ///
    /// Returns [`QuerysetError::DoesNotExist`] when no object matches and
    /// [`QuerysetError::InvalidKey`] when `pk` cannot be a key of this set.
    fn get(&self, pk: &Value) -> Result<Self::Object, QuerysetError>;
}

/// Returns `true` for keys the host treats as "no key" (`null` or `""`).
pub(crate) fn is_unsaved(pk: &Value) -> bool {
    match pk {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
