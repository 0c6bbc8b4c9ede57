//! [`EncryptedLookupHyperlinkedRelatedField`]: related object addressed by a
//! hyperlink whose lookup segment is the encrypted primary key.

use serde_json::Value;
use tracing::debug;

use super::{EncryptedLookup, ParseField, RenderField};
use crate::cipher::CipherProvider;
use crate::error::FieldError;
use crate::messages::{
    DOES_NOT_EXIST, HYPERLINKED_FIELD_MESSAGES, INCORRECT_MATCH, INCORRECT_TYPE, NO_MATCH,
};
use crate::queryset::{is_unsaved, PrimaryKey, Queryset, QuerysetError};
use crate::urls::{url_path, RequestContext, UrlResolver, ViewKwargs};
use crate::value::type_name;

/// Keyword the lookup value is captured under unless configured otherwise.
pub const DEFAULT_LOOKUP_URL_KWARG: &str = "pk";

/// Stand-in handed to the URL builder in place of the real object: it only
/// knows the encrypted key.
struct EncryptedKey(Value);

impl PrimaryKey for EncryptedKey {
    fn pk(&self) -> Value {
        self.0.clone()
    }
}

/// Hyperlinked relation that never exposes or accepts raw primary keys.
///
/// URLs are reversed with `encode(obj.pk)` as the lookup kwarg; incoming
/// lookup kwargs are decoded before the queryset sees them.
#[derive(Debug, Clone)]
pub struct EncryptedLookupHyperlinkedRelatedField<P, Q, R> {
    parent: P,
    queryset: Q,
    resolver: R,
    view_name: String,
    lookup_url_kwarg: String,
    request: Option<RequestContext>,
    format: Option<String>,
}

impl<P, Q, R> EncryptedLookupHyperlinkedRelatedField<P, Q, R>
where
    P: CipherProvider,
    Q: Queryset,
    R: UrlResolver,
{
    pub fn new(parent: P, queryset: Q, resolver: R, view_name: impl Into<String>) -> Self {
        Self {
            parent,
            queryset,
            resolver,
            view_name: view_name.into(),
            lookup_url_kwarg: DEFAULT_LOOKUP_URL_KWARG.into(),
            request: None,
            format: None,
        }
    }

    /// Capture the lookup value under `kwarg` instead of `pk`.
    pub fn with_lookup_url_kwarg(mut self, kwarg: impl Into<String>) -> Self {
        self.lookup_url_kwarg = kwarg.into();
        self
    }

    /// Build absolute URLs for this request.
    pub fn with_request(mut self, request: Option<RequestContext>) -> Self {
        self.request = request;
        self
    }

    /// Pass a format suffix through to URL reversal.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn view_name(&self) -> &str {
        &self.view_name
    }

    pub fn lookup_url_kwarg(&self) -> &str {
        &self.lookup_url_kwarg
    }

    /// Build the URL of `obj`, substituting its encrypted primary key.
    ///
    /// Returns `None` for objects without a primary key.
    pub fn resolve_url(
        &self,
        obj: &Q::Object,
        view_name: &str,
        request: Option<&RequestContext>,
        format: Option<&str>,
    ) -> Result<Option<String>, FieldError>
    where
        Q::Object: PrimaryKey,
    {
        let raw = obj.pk();
        if is_unsaved(&raw) {
            return Ok(None);
        }
        let stand_in = EncryptedKey(Value::String(self.get_cipher()?.encode(&raw)?));
        self.standard_url(&stand_in, view_name, request, format)
    }

    /// Decode the lookup kwarg in place, then fetch the object it names.
    ///
    /// Cipher and queryset failures are returned unchanged.
    pub fn resolve_object(
        &self,
        view_name: &str,
        view_args: &[Value],
        view_kwargs: &mut ViewKwargs,
    ) -> Result<Q::Object, FieldError> {
        let cipher = self.get_cipher()?;
        let lookup = view_kwargs
            .get_mut(&self.lookup_url_kwarg)
            .ok_or_else(|| FieldError::MissingLookupKwarg(self.lookup_url_kwarg.clone()))?;
        let decoded = cipher.decode(lookup)?;
        *lookup = decoded;

        self.standard_object(view_name, view_args, view_kwargs)
    }

    fn standard_url(
        &self,
        obj: &dyn PrimaryKey,
        view_name: &str,
        request: Option<&RequestContext>,
        format: Option<&str>,
    ) -> Result<Option<String>, FieldError> {
        let lookup_value = obj.pk();
        if is_unsaved(&lookup_value) {
            return Ok(None);
        }
        let mut kwargs = ViewKwargs::new();
        kwargs.insert(self.lookup_url_kwarg.clone(), lookup_value);
        if let Some(format) = format {
            kwargs.insert("format".into(), Value::String(format.to_owned()));
        }
        let path = self.resolver.reverse(view_name, &kwargs)?;
        Ok(Some(match request {
            Some(request) => request.build_absolute_uri(&path),
            None => path,
        }))
    }

    fn standard_object(
        &self,
        _view_name: &str,
        _view_args: &[Value],
        view_kwargs: &ViewKwargs,
    ) -> Result<Q::Object, FieldError> {
        let lookup_value = view_kwargs
            .get(&self.lookup_url_kwarg)
            .ok_or_else(|| FieldError::MissingLookupKwarg(self.lookup_url_kwarg.clone()))?;
        Ok(self.queryset.get(lookup_value)?)
    }
}

impl<P: CipherProvider, Q, R> EncryptedLookup for EncryptedLookupHyperlinkedRelatedField<P, Q, R> {
    type Parent = P;

    fn parent(&self) -> &P {
        &self.parent
    }
}

impl<P, Q, R> RenderField for EncryptedLookupHyperlinkedRelatedField<P, Q, R>
where
    P: CipherProvider,
    Q: Queryset,
    Q::Object: PrimaryKey,
    R: UrlResolver,
{
    type Input = Q::Object;

    fn render(&self, value: &Q::Object) -> Result<Value, FieldError> {
        let url = self.resolve_url(
            value,
            &self.view_name,
            self.request.as_ref(),
            self.format.as_deref(),
        )?;
        Ok(url.map_or(Value::Null, Value::String))
    }
}

impl<P, Q, R> ParseField for EncryptedLookupHyperlinkedRelatedField<P, Q, R>
where
    P: CipherProvider,
    Q: Queryset,
    Q::Object: PrimaryKey,
    R: UrlResolver,
{
    type Output = Q::Object;

    fn parse(&self, data: &Value) -> Result<Q::Object, FieldError> {
        let Value::String(url) = data else {
            return Err(HYPERLINKED_FIELD_MESSAGES
                .fail(INCORRECT_TYPE, &[("data_type", type_name(data).to_owned())])
                .into());
        };

        let Ok(matched) = self.resolver.resolve(url_path(url)) else {
            return Err(HYPERLINKED_FIELD_MESSAGES.fail(NO_MATCH, &[]).into());
        };
        if matched.view_name != self.view_name {
            return Err(HYPERLINKED_FIELD_MESSAGES.fail(INCORRECT_MATCH, &[]).into());
        }

        let mut kwargs = matched.kwargs;
        match self.resolve_object(&matched.view_name, &matched.args, &mut kwargs) {
            Ok(obj) => Ok(obj),
            Err(FieldError::Queryset(QuerysetError::DoesNotExist | QuerysetError::InvalidKey(_))) => {
                Err(HYPERLINKED_FIELD_MESSAGES.fail(DOES_NOT_EXIST, &[]).into())
            }
            Err(FieldError::Cipher(e)) if e.is_malformed_input() => {
                debug!(error = %e, "rejected hyperlink lookup value");
                Err(HYPERLINKED_FIELD_MESSAGES.fail(DOES_NOT_EXIST, &[]).into())
            }
            Err(e) => Err(e),
        }
    }
}
