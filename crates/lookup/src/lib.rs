//! Encrypted-lookup field adapters.
//!
//! Primary keys leave the service only as cipher-encoded tokens and come back
//! in through [`Cipher::decode`] before they are used as lookup keys. The
//! fields never own a cipher: they ask their parent ([`CipherProvider`]) for
//! it on every operation.
//!
//! - [`EncryptedLookupField`]: read-only scalar, `render(v) = encode(v)`.
//! - [`EncryptedLookupRelatedField`]: related object by encrypted primary key.
//! - [`EncryptedLookupHyperlinkedRelatedField`]: related object by hyperlink
//!   whose lookup segment is the encrypted primary key.

pub mod cipher;
pub mod error;
pub mod fields;
pub mod messages;
pub mod queryset;
pub mod urls;
pub mod value;

pub use cipher::{AeadLookupCipher, Cipher, CipherError, CipherProvider, LookupContext, LookupKey};
pub use error::FieldError;
pub use fields::{
    EncryptedLookup, EncryptedLookupField, EncryptedLookupHyperlinkedRelatedField,
    EncryptedLookupRelatedField, ParseField, RenderField,
};
pub use queryset::{PrimaryKey, Queryset, QuerysetError};
pub use urls::{RequestContext, ResolverMatch, UrlError, UrlResolver, ViewKwargs};
