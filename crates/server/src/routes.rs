//! Named routes of the demo API, used to reverse and resolve hyperlinks.
//!
//! Patterns here must agree with the axum routes in
//! [`crate::server::router::build`]: `{name}` here is `:token` there.

use std::sync::Arc;

use lookup::value::display_value;
use lookup::{ResolverMatch, UrlError, UrlResolver, ViewKwargs};
use serde_json::Value;

pub const AUTHOR_LIST: &str = "author-list";
pub const AUTHOR_DETAIL: &str = "author-detail";
pub const BOOK_LIST: &str = "book-list";
pub const BOOK_DETAIL: &str = "book-detail";

#[derive(Debug)]
struct Route {
    name: &'static str,
    pattern: &'static str,
}

/// Route table with `{kwarg}` placeholders, one per path segment.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Arc<[Route]>,
}

impl RouteTable {
    pub fn new(routes: &[(&'static str, &'static str)]) -> Self {
        Self {
            routes: routes
                .iter()
                .map(|&(name, pattern)| Route { name, pattern })
                .collect(),
        }
    }

    /// The routes served by this binary.
    pub fn api() -> Self {
        Self::new(&[
            (AUTHOR_LIST, "/authors"),
            (AUTHOR_DETAIL, "/authors/{pk}"),
            (BOOK_LIST, "/books"),
            (BOOK_DETAIL, "/books/{pk}"),
        ])
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::api()
    }
}

impl UrlResolver for RouteTable {
    fn reverse(&self, view_name: &str, kwargs: &ViewKwargs) -> Result<String, UrlError> {
        let no_match = || UrlError::NoReverseMatch(view_name.to_owned());
        let route = self
            .routes
            .iter()
            .find(|r| r.name == view_name)
            .ok_or_else(no_match)?;

        let mut path = String::new();
        let mut consumed = 0;
        for segment in route.pattern.split('/').skip(1) {
            path.push('/');
            match placeholder(segment) {
                Some(name) => {
                    let value = display_value(kwargs.get(name).ok_or_else(no_match)?);
                    if value.is_empty() || value.contains('/') {
                        return Err(no_match());
                    }
                    path.push_str(&value);
                    consumed += 1;
                }
                None => path.push_str(segment),
            }
        }
        // Every kwarg must land in the path.
        if consumed != kwargs.len() {
            return Err(no_match());
        }
        Ok(path)
    }

    fn resolve(&self, path: &str) -> Result<ResolverMatch, UrlError> {
        let trimmed = match path.strip_suffix('/') {
            Some(p) if !p.is_empty() => p,
            _ => path,
        };
        let segments: Vec<&str> = trimmed.split('/').collect();

        for route in self.routes.iter() {
            let pattern: Vec<&str> = route.pattern.split('/').collect();
            if pattern.len() != segments.len() {
                continue;
            }
            let mut kwargs = ViewKwargs::new();
            let matched = pattern.iter().zip(&segments).all(|(p, s)| match placeholder(p) {
                Some(name) if !s.is_empty() => {
                    kwargs.insert(name.to_owned(), Value::String((*s).to_owned()));
                    true
                }
                Some(_) => false,
                None => p == s,
            });
            if matched {
                return Ok(ResolverMatch {
                    view_name: route.name.to_owned(),
                    args: Vec::new(),
                    kwargs,
                });
            }
        }
        Err(UrlError::NoMatch(path.to_owned()))
    }
}

fn placeholder(segment: &str) -> Option<&str> {
    segment.strip_prefix('{')?.strip_suffix('}')
}
