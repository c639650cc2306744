//! Blocking API client for the Goodreads book catalog.
//!
//! # Overview
//! Builds `HttpRequest` values, executes them through a `Transport`, and
//! decodes the XML or JSON body into typed records. The build and parse
//! halves are public on their own, so callers that do their own I/O can use
//! the client without a transport round-trip.
//!
//! # Design
//! - `GoodreadsClient` is stateless: it holds the API key and a transport.
//! - Query strings are sorted by key, so generated URLs are reproducible.
//! - Each endpoint decodes a fixed envelope shape; there is no generic tree.
//! - `UreqTransport` is the default; anything implementing `Transport` can
//!   replace it.

pub mod client;
mod envelope;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::GoodreadsClient;
pub use error::ApiError;
pub use http::{HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport, DEFAULT_API_ROOT};
pub use types::{
    Author, Book, Review, ReviewCounts, ReviewListQuery, SearchField, SortOrder, User, UserShelf,
};
