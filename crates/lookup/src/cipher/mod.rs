//! The lookup cipher capability and the parent container that holds it.
//!
//! Fields consume [`Cipher`] through a [`CipherProvider`]; they never build or
//! own one. [`LookupContext`] is the provider used by serializers: a cheap
//! clonable handle whose cipher can be installed or replaced at runtime.
//!
//! [`AeadLookupCipher`] is a ready-made cipher producing deterministic
//! `v1.<nonce>.<ciphertext>` tokens.

pub mod aead;
pub mod context;
pub mod key;

pub use aead::AeadLookupCipher;
pub use context::LookupContext;
pub use key::{KeyError, LookupKey, KEY_LEN};

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

/// Errors produced by a [`Cipher`] or its provider.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The token is not something this cipher produced (bad format, failed
    /// authentication, undecodable plaintext).
    #[error("malformed lookup token: {0}")]
    Malformed(String),

    /// The value has the wrong shape for this cipher (e.g. a number where a
    /// token string is expected).
    #[error("cannot decode a value of type {0}")]
    Unsupported(String),

    /// The parent has no cipher to hand out.
    #[error("no lookup cipher installed")]
    Unavailable,

    /// Any other failure inside the cipher.
    #[error("cipher failure: {0}")]
    Backend(String),
}

impl CipherError {
    /// Returns `true` for the type/value error class caused by bad client
    /// input. Fields translate these into validation failures; every other
    /// variant propagates.
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, CipherError::Malformed(_) | CipherError::Unsupported(_))
    }
}

/// Reversible transform between raw lookup values and client-facing tokens.
///
/// Implementations must satisfy `decode(&Value::String(encode(v)?)) == v` for
/// every `v` they accept.
#[cfg_attr(test, mockall::automock)]
pub trait Cipher: Send + Sync {
    /// Encode a raw value (usually a primary key) into a token.
    fn encode(&self, raw: &Value) -> Result<String, CipherError>;

    /// Decode a client-supplied value back into the raw value.
    fn decode(&self, token: &Value) -> Result<Value, CipherError>;
}

/// Parent container contract: whatever owns the cipher a field should use.
pub trait CipherProvider {
    /// Return the cipher currently held by this parent.
    ///
    /// # Errors
    ///
    /// Returns the parent's own error (for [`LookupContext`],
    /// [`CipherError::Unavailable`] when nothing is installed). Callers
    /// propagate it unchanged.
    fn get_cipher(&self) -> Result<Arc<dyn Cipher>, CipherError>;
}

impl<P: CipherProvider + ?Sized> CipherProvider for Arc<P> {
    fn get_cipher(&self) -> Result<Arc<dyn Cipher>, CipherError> {
        (**self).get_cipher()
    }
}
