//! Host seam for building and resolving hyperlinks.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

/// Keyword arguments captured from (or substituted into) a URL pattern.
pub type ViewKwargs = BTreeMap<String, Value>;

/// Errors raised by a [`UrlResolver`].
#[derive(Debug, Error)]
pub enum UrlError {
    /// No route named `view_name` accepts the given kwargs.
    #[error("no reverse match for view `{0}`")]
    NoReverseMatch(String),

    /// No route matches the path.
    #[error("no route matches `{0}`")]
    NoMatch(String),
}

/// Outcome of resolving a path against the route table.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverMatch {
    pub view_name: String,
    pub args: Vec<Value>,
    pub kwargs: ViewKwargs,
}

/// The host's URL routing: path building and path resolution.
#[cfg_attr(test, mockall::automock)]
pub trait UrlResolver {
    /// Build the path of `view_name` with `kwargs` substituted.
    fn reverse(&self, view_name: &str, kwargs: &ViewKwargs) -> Result<String, UrlError>;

    /// Match `path` to a view and capture its kwargs.
    fn resolve(&self, path: &str) -> Result<ResolverMatch, UrlError>;
}

/// The parts of the current request needed to build absolute URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub scheme: String,
    pub host: String,
}

impl RequestContext {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
        }
    }

    /// Prefix `path` with this request's scheme and host.
    pub fn build_absolute_uri(&self, path: &str) -> String {
        format!("{}://{}{}", self.scheme, self.host, path)
    }
}

/// Reduce an absolute `http(s)` URL to its path; anything else is returned
/// as-is. Query string and fragment are dropped.
pub(crate) fn url_path(url: &str) -> &str {
    let Some(rest) = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
    else {
        return url;
    };
    let path = match rest.find('/') {
        Some(i) => &rest[i..],
        None => "/",
    };
    match path.find(['?', '#']) {
        Some(i) => &path[..i],
        None => path,
    }
}
