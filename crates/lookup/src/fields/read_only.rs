//! [`EncryptedLookupField`]: read-only scalar shown to clients encrypted.

use serde_json::Value;

use super::{EncryptedLookup, RenderField};
use crate::cipher::CipherProvider;
use crate::error::FieldError;

/// Presents a scalar (usually the object's own primary key) as a token.
///
/// There is no parse path; writes are rejected by the host before they get
/// here.
#[derive(Debug, Clone)]
pub struct EncryptedLookupField<P> {
    parent: P,
}

impl<P: CipherProvider> EncryptedLookupField<P> {
    pub fn new(parent: P) -> Self {
        Self { parent }
    }
}

impl<P: CipherProvider> EncryptedLookup for EncryptedLookupField<P> {
    type Parent = P;

    fn parent(&self) -> &P {
        &self.parent
    }
}

impl<P: CipherProvider> RenderField for EncryptedLookupField<P> {
    type Input = Value;

    fn render(&self, value: &Value) -> Result<Value, FieldError> {
        Ok(Value::String(self.get_cipher()?.encode(value)?))
    }
}
