//! [`EncryptedLookupRelatedField`]: related object addressed by encrypted
//! primary key.

use std::borrow::Cow;

use serde_json::Value;
use tracing::debug;

use super::{EncryptedLookup, ParseField, RenderField};
use crate::cipher::CipherProvider;
use crate::error::FieldError;
use crate::messages::{DOES_NOT_EXIST, INCORRECT_TYPE_ENCRYPTED_LOOKUP, RELATED_FIELD_MESSAGES};
use crate::queryset::{PrimaryKey, Queryset, QuerysetError};
use crate::value::{display_value, type_name};

/// Drop-in replacement for a primary-key relation whose keys are exposed
/// only as tokens.
///
/// Parsing accepts either the token itself or its JSON encoding (a token
/// transported inside a string), decodes it, and resolves it through the
/// bound queryset.
#[derive(Debug, Clone)]
pub struct EncryptedLookupRelatedField<P, Q> {
    parent: P,
    queryset: Q,
}

impl<P: CipherProvider, Q: Queryset> EncryptedLookupRelatedField<P, Q> {
    pub fn new(parent: P, queryset: Q) -> Self {
        Self { parent, queryset }
    }

    pub fn queryset(&self) -> &Q {
        &self.queryset
    }

    fn incorrect_type(data_type: &str) -> FieldError {
        RELATED_FIELD_MESSAGES
            .fail(INCORRECT_TYPE_ENCRYPTED_LOOKUP, &[("data_type", data_type.to_owned())])
            .into()
    }
}

impl<P: CipherProvider, Q: Queryset> EncryptedLookup for EncryptedLookupRelatedField<P, Q> {
    type Parent = P;

    fn parent(&self) -> &P {
        &self.parent
    }
}

impl<P, Q> RenderField for EncryptedLookupRelatedField<P, Q>
where
    P: CipherProvider,
    Q: Queryset,
    Q::Object: PrimaryKey,
{
    type Input = Q::Object;

    fn render(&self, value: &Q::Object) -> Result<Value, FieldError> {
        Ok(Value::String(self.get_cipher()?.encode(&value.pk())?))
    }
}

impl<P, Q> ParseField for EncryptedLookupRelatedField<P, Q>
where
    P: CipherProvider,
    Q: Queryset,
    Q::Object: PrimaryKey,
{
    type Output = Q::Object;

    fn parse(&self, data: &Value) -> Result<Q::Object, FieldError> {
        // A string holding JSON is unwrapped first; any other string is
        // handed to the cipher unchanged.
        let data = match data {
            Value::String(text) => match serde_json::from_str::<Value>(text) {
                Ok(parsed) => Cow::Owned(parsed),
                Err(_) => Cow::Borrowed(data),
            },
            other => Cow::Borrowed(other),
        };
        let data_type = type_name(&data);

        let pk = match self.get_cipher()?.decode(&data) {
            Ok(pk) => pk,
            Err(e) if e.is_malformed_input() => {
                debug!(data_type, error = %e, "rejected encrypted lookup value");
                return Err(Self::incorrect_type(data_type));
            }
            Err(e) => return Err(e.into()),
        };

        match self.queryset.get(&pk) {
            Ok(obj) => Ok(obj),
            Err(QuerysetError::DoesNotExist) => Err(RELATED_FIELD_MESSAGES
                .fail(DOES_NOT_EXIST, &[("pk_value", display_value(&pk))])
                .into()),
            Err(QuerysetError::InvalidKey(_)) => {
                let key_type = type_name(&pk);
                debug!(key_type, "decoded key rejected by queryset");
                Err(Self::incorrect_type(key_type))
            }
            Err(e) => Err(e.into()),
        }
    }
}
