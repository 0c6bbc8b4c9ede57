//! [`LookupContext`]: the serializer-level owner of the active cipher.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use super::{Cipher, CipherError, CipherProvider};

/// Slot payload; `ArcSwapOption` needs a sized type.
struct Installed(Arc<dyn Cipher>);

/// Shared handle to the cipher used by every field bound to it.
///
/// Backed by [`ArcSwapOption`] so request handlers read the cipher without
/// blocking while a new one (e.g. after a key rotation) is swapped in
/// atomically.
#[derive(Clone)]
pub struct LookupContext {
    inner: Arc<ArcSwapOption<Installed>>,
}

impl LookupContext {
    /// Create a context with no cipher installed.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ArcSwapOption::empty()),
        }
    }

    /// Create a context with `cipher` already installed.
    pub fn with_cipher(cipher: Arc<dyn Cipher>) -> Self {
        let ctx = Self::new();
        ctx.install(cipher);
        ctx
    }

    /// Install (or replace) the cipher. Clones of this context see the change.
    pub fn install(&self, cipher: Arc<dyn Cipher>) {
        self.inner.store(Some(Arc::new(Installed(cipher))));
    }

    /// Returns `true` if a cipher is installed.
    pub fn is_ready(&self) -> bool {
        self.inner.load().is_some()
    }
}

impl CipherProvider for LookupContext {
    fn get_cipher(&self) -> Result<Arc<dyn Cipher>, CipherError> {
        self.inner
            .load_full()
            .map(|installed| Arc::clone(&installed.0))
            .ok_or(CipherError::Unavailable)
    }
}

impl Default for LookupContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LookupContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupContext")
            .field("ready", &self.is_ready())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::MockCipher;
    use serde_json::json;

    fn cipher_returning(token: &'static str) -> Arc<dyn Cipher> {
        let mut mock = MockCipher::new();
        mock.expect_encode().returning(move |_| Ok(token.to_owned()));
        Arc::new(mock)
    }

    #[test]
    fn empty_context_is_unavailable() {
        let ctx = LookupContext::new();
        assert!(!ctx.is_ready());
        assert!(matches!(ctx.get_cipher(), Err(CipherError::Unavailable)));
    }

    #[test]
    fn installed_cipher_is_returned() {
        let ctx = LookupContext::with_cipher(cipher_returning("enc5"));
        assert!(ctx.is_ready());
        let cipher = ctx.get_cipher().unwrap();
        assert_eq!(cipher.encode(&json!(5)).unwrap(), "enc5");
    }

    #[test]
    fn install_is_visible_through_clones() {
        let ctx = LookupContext::with_cipher(cipher_returning("old"));
        let view = ctx.clone();
        ctx.install(cipher_returning("new"));
        assert_eq!(view.get_cipher().unwrap().encode(&json!(1)).unwrap(), "new");
    }

    #[test]
    fn debug_does_not_expose_cipher() {
        let ctx = LookupContext::with_cipher(cipher_returning("x"));
        assert_eq!(format!("{ctx:?}"), "LookupContext { ready: true }");
    }
}
