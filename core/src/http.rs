//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe catalog requests and responses as plain data. The
//! client builds `HttpRequest` values and parses `HttpResponse` values; a
//! `Transport` in between performs the actual GET. Every request the service
//! accepts is a GET with all arguments in the path and query string, so a
//! request is just a path plus its query pairs.

use url::form_urlencoded;

/// A GET request against the catalog service, relative to the API root.
///
/// Built by `GoodreadsClient::build_*` methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    /// Append a query parameter. Insertion order does not matter; see
    /// [`HttpRequest::query_string`].
    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Form-urlencoded query with keys sorted alphabetically.
    ///
    /// The sort is stable, so repeated keys keep their insertion order.
    pub fn query_string(&self) -> String {
        let mut pairs: Vec<&(String, String)> = self.query.iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs.into_iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .finish()
    }

    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        format!("{}?{}", self.path, self.query_string())
    }

    /// Absolute URL under `root`. A trailing `/` on the root is ignored.
    pub fn url(&self, root: &str) -> String {
        format!("{}{}", root.trim_end_matches('/'), self.path_and_query())
    }
}

/// An HTTP response described as plain data.
///
/// Produced by a `Transport` after executing an `HttpRequest`, then passed
/// to `GoodreadsClient::parse_*` methods for decoding.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Percent-encode a single path segment so ids cannot inject `/`, `?` or `#`.
pub(crate) fn path_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}
