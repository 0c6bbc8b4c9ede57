//! Per-request serializers composing the encrypted-lookup fields.
//!
//! Built fresh for every request from [`AppState`]; every field is bound to
//! the same [`LookupContext`], so they all use the installed cipher.

use common::protocol::{AuthorBody, BookBody, CreateAuthorRequest, CreateBookRequest};
use common::{ServiceError, ValidationError};
use lookup::{
    CipherError, EncryptedLookupField, EncryptedLookupHyperlinkedRelatedField,
    EncryptedLookupRelatedField, FieldError, LookupContext, ParseField, PrimaryKey, Queryset,
    QuerysetError, RenderField, RequestContext, ViewKwargs,
};
use serde_json::Value;
use tracing::warn;

use crate::routes::{RouteTable, AUTHOR_DETAIL, BOOK_DETAIL};
use crate::server::state::AppState;
use crate::store::{Author, Book, Table};

type IdField = EncryptedLookupField<LookupContext>;
type AuthorLink = EncryptedLookupHyperlinkedRelatedField<LookupContext, Table<Author>, RouteTable>;
type BookLink = EncryptedLookupHyperlinkedRelatedField<LookupContext, Table<Book>, RouteTable>;
type AuthorRef = EncryptedLookupRelatedField<LookupContext, Table<Author>>;

fn blank() -> ValidationError {
    ValidationError::new("blank", "This field may not be blank.")
}

fn author_link(state: &AppState, request: Option<RequestContext>) -> AuthorLink {
    AuthorLink::new(
        state.lookup.clone(),
        state.store.authors.clone(),
        state.routes.clone(),
        AUTHOR_DETAIL,
    )
    .with_request(request)
}

pub struct AuthorSerializer {
    id: IdField,
    url: AuthorLink,
}

impl AuthorSerializer {
    pub fn new(state: &AppState, request: Option<RequestContext>) -> Self {
        Self {
            id: IdField::new(state.lookup.clone()),
            url: author_link(state, request),
        }
    }

    pub fn to_representation(&self, author: &Author) -> Result<AuthorBody, FieldError> {
        Ok(AuthorBody {
            id: self.id.render(&author.pk())?,
            name: author.name.clone(),
            url: self.url.render(author)?,
        })
    }

    /// Validate a create request, returning the trimmed name.
    pub fn validate(&self, req: &CreateAuthorRequest) -> Result<String, ServiceError> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(ServiceError::validation("name", blank()));
        }
        Ok(name.to_owned())
    }

    /// Fetch the author addressed by the `token` segment of its detail URL.
    pub fn lookup(&self, token: String) -> Result<Author, FieldError> {
        let mut kwargs =
            ViewKwargs::from([(self.url.lookup_url_kwarg().to_owned(), Value::String(token))]);
        self.url.resolve_object(AUTHOR_DETAIL, &[], &mut kwargs)
    }
}

pub struct BookSerializer {
    id: IdField,
    url: BookLink,
    author: AuthorRef,
    author_url: AuthorLink,
}

impl BookSerializer {
    pub fn new(state: &AppState, request: Option<RequestContext>) -> Self {
        Self {
            id: IdField::new(state.lookup.clone()),
            url: BookLink::new(
                state.lookup.clone(),
                state.store.books.clone(),
                state.routes.clone(),
                BOOK_DETAIL,
            )
            .with_request(request.clone()),
            author: AuthorRef::new(state.lookup.clone(), state.store.authors.clone()),
            author_url: author_link(state, request),
        }
    }

    pub fn to_representation(&self, book: &Book) -> Result<BookBody, FieldError> {
        let author = self.author.queryset().get(&Value::from(book.author_id))?;
        Ok(BookBody {
            id: self.id.render(&book.pk())?,
            title: book.title.clone(),
            author: self.author.render(&author)?,
            author_url: self.author_url.render(&author)?,
            url: self.url.render(book)?,
        })
    }

    /// Validate a create request, resolving the encrypted `author` reference.
    pub fn validate(&self, req: &CreateBookRequest) -> Result<(String, Author), ServiceError> {
        let title = req.title.trim();
        if title.is_empty() {
            return Err(ServiceError::validation("title", blank()));
        }
        let author = self
            .author
            .parse(&req.author)
            .map_err(|e| into_service_error("author", e))?;
        Ok((title.to_owned(), author))
    }

    /// Fetch the book addressed by the `token` segment of its detail URL.
    pub fn lookup(&self, token: String) -> Result<Book, FieldError> {
        let mut kwargs =
            ViewKwargs::from([(self.url.lookup_url_kwarg().to_owned(), Value::String(token))]);
        self.url.resolve_object(BOOK_DETAIL, &[], &mut kwargs)
    }
}

/// Convert a field failure on `field` into the service's error vocabulary.
pub fn into_service_error(field: &str, err: FieldError) -> ServiceError {
    match err {
        FieldError::Invalid(v) => ServiceError::validation(field, v),
        FieldError::Cipher(CipherError::Unavailable) => {
            ServiceError::Unavailable("lookup cipher not installed".into())
        }
        other => {
            warn!(field, error = %other, "field operation failed");
            ServiceError::Internal("field processing failed".into())
        }
    }
}

/// Convert a failed detail-URL lookup. Unknown and undecodable tokens are
/// both reported as not found.
pub fn lookup_error(err: FieldError) -> ServiceError {
    match err {
        FieldError::Queryset(QuerysetError::DoesNotExist | QuerysetError::InvalidKey(_)) => {
            ServiceError::NotFound("no object matches this identifier".into())
        }
        FieldError::Cipher(e) if e.is_malformed_input() => {
            ServiceError::NotFound("no object matches this identifier".into())
        }
        other => into_service_error("pk", other),
    }
}
