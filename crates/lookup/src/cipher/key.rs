//! [`LookupKey`]: key material for [`super::AeadLookupCipher`].

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

/// Byte length of a lookup key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Errors produced while loading key material.
#[derive(Debug, Error)]
pub enum KeyError {
    /// The decoded key material has an unexpected length.
    #[error("lookup key has invalid length: expected {KEY_LEN} bytes, got {0}")]
    InvalidLength(usize),

    /// The key string is not valid base64.
    #[error("lookup key is not valid base64")]
    InvalidEncoding,
}

/// Fixed-size key buffer that holds exactly [`KEY_LEN`] bytes.
///
/// The buffer is overwritten with zeroes on drop and never printed.
#[derive(Clone)]
pub struct LookupKey(Box<[u8; KEY_LEN]>);

impl LookupKey {
    /// Copy `bytes` into a new key.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidLength`] if the slice is not [`KEY_LEN`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != KEY_LEN {
            return Err(KeyError::InvalidLength(bytes.len()));
        }
        let mut buf = Box::new([0u8; KEY_LEN]);
        buf.copy_from_slice(bytes);
        Ok(Self(buf))
    }

    /// Decode a standard-alphabet base64 string into a key.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidEncoding`] for bad base64 and
    /// [`KeyError::InvalidLength`] if the decoded bytes are the wrong length.
    pub fn from_base64(encoded: &str) -> Result<Self, KeyError> {
        let mut bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|_| KeyError::InvalidEncoding)?;
        let key = Self::from_bytes(&bytes);
        bytes.iter_mut().for_each(|b| *b = 0);
        key
    }

    /// Borrow the raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0[..]
    }
}

impl Drop for LookupKey {
    fn drop(&mut self) {
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for LookupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("LookupKey([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_rejects_wrong_length() {
        assert!(matches!(
            LookupKey::from_bytes(&[0u8; 16]),
            Err(KeyError::InvalidLength(16))
        ));
        assert!(LookupKey::from_bytes(&[7u8; KEY_LEN]).is_ok());
    }

    #[test]
    fn from_base64_accepts_encoded_key() {
        let encoded = STANDARD.encode([0x42u8; KEY_LEN]);
        let key = LookupKey::from_base64(&format!(" {encoded}\n")).unwrap();
        assert_eq!(key.as_bytes(), &[0x42u8; KEY_LEN]);
    }

    #[test]
    fn from_base64_rejects_garbage() {
        assert!(matches!(
            LookupKey::from_base64("not base64!"),
            Err(KeyError::InvalidEncoding)
        ));
        let short = STANDARD.encode([1u8; 8]);
        assert!(matches!(
            LookupKey::from_base64(&short),
            Err(KeyError::InvalidLength(8))
        ));
    }

    #[test]
    fn key_redacted_in_debug() {
        let key = LookupKey::from_bytes(&[0xFFu8; KEY_LEN]).unwrap();
        assert!(format!("{key:?}").contains("REDACTED"));
    }
}
