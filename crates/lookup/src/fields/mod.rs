//! Field capabilities and the three encrypted-lookup adapters.
//!
//! A field can always render; only writable fields can parse. The read-only
//! adapter therefore implements [`RenderField`] alone.

pub mod hyperlinked;
pub mod read_only;
pub mod related;

pub use hyperlinked::EncryptedLookupHyperlinkedRelatedField;
pub use read_only::EncryptedLookupField;
pub use related::EncryptedLookupRelatedField;

use std::sync::Arc;

use serde_json::Value;

use crate::cipher::{Cipher, CipherError, CipherProvider};
use crate::error::FieldError;

/// Internal value → client representation.
pub trait RenderField {
    type Input: ?Sized;

    fn render(&self, value: &Self::Input) -> Result<Value, FieldError>;
}

/// Client data → internal value.
pub trait ParseField: RenderField {
    type Output;

    fn parse(&self, data: &Value) -> Result<Self::Output, FieldError>;
}

/// Cipher access shared by every encrypted-lookup field: the cipher always
/// comes from the parent the field was bound to.
pub trait EncryptedLookup {
    type Parent: CipherProvider;

    fn parent(&self) -> &Self::Parent;

    fn get_cipher(&self) -> Result<Arc<dyn Cipher>, CipherError> {
        self.parent().get_cipher()
    }
}
