//! Deterministic AES-256-GCM-SIV lookup tokens.
//!
//! **Algorithm choice:** AES-256-GCM-SIV (RFC 8452) is nonce-misuse-resistant.
//! The nonce is synthesised from an HMAC-SHA256 of the plaintext, so the same
//! value + key always yields the same token. Lookup tokens end up in URLs and
//! must be stable across requests.
//!
//! Token format:
//!
//! ```text
//! v1.<base64url-no-pad(nonce)>.<base64url-no-pad(ciphertext+tag)>
//! ```
//!
//! The plaintext is the compact JSON encoding of the raw value, so any JSON
//! value (integer, string, UUID string) can be a lookup key.

use aes_gcm_siv::{
    aead::{Aead, KeyInit},
    Aes256GcmSiv, Nonce,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;

use super::{Cipher, CipherError, LookupKey};
use crate::value::type_name;

type HmacSha256 = Hmac<Sha256>;

/// Byte length of an AES-GCM-SIV nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Prefix that appears at the start of every token.
pub const VERSION_PREFIX: &str = "v1";

const ENCRYPTION_KEY_LABEL: &[u8] = b"encrypted-lookup/v1/encryption";
const NONCE_KEY_LABEL: &[u8] = b"encrypted-lookup/v1/nonce";

/// A parsed token.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    nonce: [u8; NONCE_LEN],
    ciphertext: Vec<u8>,
}

impl Token {
    fn to_string_repr(&self) -> String {
        format!(
            "{}.{}.{}",
            VERSION_PREFIX,
            URL_SAFE_NO_PAD.encode(self.nonce),
            URL_SAFE_NO_PAD.encode(&self.ciphertext),
        )
    }

    fn parse(s: &str) -> Result<Self, CipherError> {
        let invalid = || CipherError::Malformed("invalid token format".into());

        let parts: Vec<&str> = s.splitn(3, '.').collect();
        if parts.len() != 3 || parts[0] != VERSION_PREFIX {
            return Err(invalid());
        }
        let nonce_bytes = URL_SAFE_NO_PAD.decode(parts[1]).map_err(|_| invalid())?;
        if nonce_bytes.len() != NONCE_LEN {
            return Err(invalid());
        }
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&nonce_bytes);

        let ciphertext = URL_SAFE_NO_PAD.decode(parts[2]).map_err(|_| invalid())?;

        Ok(Self { nonce, ciphertext })
    }
}

/// [`Cipher`] producing deterministic, authenticated `v1` tokens.
///
/// Encryption and nonce derivation use separate subkeys derived from the
/// [`LookupKey`] with HMAC-SHA256.
pub struct AeadLookupCipher {
    aead: Aes256GcmSiv,
    nonce_key: LookupKey,
}

impl AeadLookupCipher {
    /// Build a cipher from `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Backend`] if subkey derivation fails (should be
    /// unreachable with a valid [`LookupKey`]).
    pub fn new(key: LookupKey) -> Result<Self, CipherError> {
        let encryption_key = LookupKey::from_bytes(&hmac(key.as_bytes(), ENCRYPTION_KEY_LABEL)?)
            .map_err(|e| CipherError::Backend(e.to_string()))?;
        let nonce_key = LookupKey::from_bytes(&hmac(key.as_bytes(), NONCE_KEY_LABEL)?)
            .map_err(|e| CipherError::Backend(e.to_string()))?;

        let aead = <Aes256GcmSiv as KeyInit>::new_from_slice(encryption_key.as_bytes())
            .map_err(|_| CipherError::Backend("invalid encryption key length".into()))?;

        Ok(Self { aead, nonce_key })
    }

    fn synthetic_nonce(&self, plaintext: &[u8]) -> Result<[u8; NONCE_LEN], CipherError> {
        let digest = hmac(self.nonce_key.as_bytes(), plaintext)?;
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&digest[..NONCE_LEN]);
        Ok(nonce)
    }
}

impl Cipher for AeadLookupCipher {
    fn encode(&self, raw: &Value) -> Result<String, CipherError> {
        let plaintext =
            serde_json::to_vec(raw).map_err(|e| CipherError::Backend(e.to_string()))?;
        let nonce = self.synthetic_nonce(&plaintext)?;

        let ciphertext = self
            .aead
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_ref())
            .map_err(|_| CipherError::Backend("aead operation failed".into()))?;

        Ok(Token { nonce, ciphertext }.to_string_repr())
    }

    fn decode(&self, token: &Value) -> Result<Value, CipherError> {
        let Value::String(s) = token else {
            return Err(CipherError::Unsupported(type_name(token).into()));
        };
        let token = Token::parse(s)?;

        let plaintext = self
            .aead
            .decrypt(Nonce::from_slice(&token.nonce), token.ciphertext.as_ref())
            .map_err(|_| CipherError::Malformed("token failed authentication".into()))?;

        // Only the nonce `encode` would have chosen is accepted, so every raw
        // value has exactly one valid token.
        if self.synthetic_nonce(&plaintext)? != token.nonce {
            return Err(CipherError::Malformed("non-canonical token".into()));
        }

        serde_json::from_slice(&plaintext)
            .map_err(|_| CipherError::Malformed("token payload is not JSON".into()))
    }
}

fn hmac(key: &[u8], data: &[u8]) -> Result<Vec<u8>, CipherError> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key)
        .map_err(|_| CipherError::Backend("invalid hmac key".into()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::KEY_LEN;
    use serde_json::json;

    fn cipher(byte: u8) -> AeadLookupCipher {
        AeadLookupCipher::new(LookupKey::from_bytes(&[byte; KEY_LEN]).unwrap()).unwrap()
    }

    #[test]
    fn encode_decode_round_trip() {
        let c = cipher(0x42);
        for raw in [json!(5), json!("a3f1c2"), json!(0), json!(9_007_199_254_740_991u64)] {
            let token = c.encode(&raw).unwrap();
            assert_eq!(c.decode(&Value::String(token)).unwrap(), raw);
        }
    }

    #[test]
    fn encoding_is_deterministic() {
        let c = cipher(0x42);
        assert_eq!(c.encode(&json!(5)).unwrap(), c.encode(&json!(5)).unwrap());
        assert_ne!(c.encode(&json!(5)).unwrap(), c.encode(&json!(6)).unwrap());
    }

    #[test]
    fn token_is_url_safe() {
        let token = cipher(0x01).encode(&json!(123456)).unwrap();
        assert!(token.starts_with("v1."), "expected v1. prefix, got: {token}");
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')));
    }

    #[test]
    fn raw_key_does_not_appear_in_token() {
        let token = cipher(0x01).encode(&json!("customer-42")).unwrap();
        assert!(!token.contains("customer-42"));
    }

    #[test]
    fn wrong_key_fails_decoding() {
        let token = cipher(0x01).encode(&json!(5)).unwrap();
        let err = cipher(0x02).decode(&Value::String(token)).unwrap_err();
        assert!(err.is_malformed_input());
    }

    #[test]
    fn non_string_input_is_unsupported() {
        let err = cipher(0x01).decode(&json!(12345)).unwrap_err();
        assert!(matches!(err, CipherError::Unsupported(ref t) if t == "int"));
    }

    #[test]
    fn bad_format_is_malformed() {
        let c = cipher(0x01);
        for bad in ["v2.abc.def", "v1.abc", "v1.!!!.abc", "enc5", ""] {
            let err = c.decode(&json!(bad)).unwrap_err();
            assert!(matches!(err, CipherError::Malformed(_)), "{bad}: {err}");
        }
    }

    #[test]
    fn tampered_ciphertext_fails_auth() {
        let c = cipher(0x01);
        let mut token = Token::parse(&c.encode(&json!(5)).unwrap()).unwrap();
        token.ciphertext[0] ^= 0xFF;
        let err = c.decode(&Value::String(token.to_string_repr())).unwrap_err();
        assert!(matches!(err, CipherError::Malformed(_)));
    }

    #[test]
    fn foreign_nonce_is_rejected() {
        let c = cipher(0x01);
        let plaintext = serde_json::to_vec(&json!(5)).unwrap();
        let nonce = [9u8; NONCE_LEN];
        let ciphertext = c
            .aead
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_ref())
            .unwrap();
        let forged = Token { nonce, ciphertext }.to_string_repr();
        let err = c.decode(&Value::String(forged)).unwrap_err();
        assert!(matches!(err, CipherError::Malformed(_)));
    }
}
