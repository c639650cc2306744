//! Request builder, response parser and transport-driven calls for the
//! catalog API.
//!
//! # Design
//! `GoodreadsClient` holds only the API key and a `Transport` and carries no
//! mutable state between calls. Each operation is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that consumes
//! an `HttpResponse`; the plain-named method chains the two through the
//! transport. Every query carries the key under `key`.

use tracing::instrument;

use crate::envelope;
use crate::error::ApiError;
use crate::http::{path_segment, HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    Author, Book, Review, ReviewCounts, ReviewListQuery, SearchField, User, UserShelf,
};

/// Version of the review list response format requested from the service.
const REVIEW_LIST_VERSION: u32 = 2;

/// Client for the catalog API.
///
/// Safe to share across threads: the key and transport are read-only after
/// construction.
#[derive(Debug, Clone)]
pub struct GoodreadsClient<T = UreqTransport> {
    api_key: String,
    transport: T,
}

impl GoodreadsClient<UreqTransport> {
    /// Client against the production service.
    pub fn new(api_key: &str) -> Self {
        Self::with_transport(api_key, UreqTransport::default())
    }
}

impl<T: Transport> GoodreadsClient<T> {
    pub fn with_transport(api_key: &str, transport: T) -> Self {
        Self {
            api_key: api_key.to_string(),
            transport,
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn request(&self, path: String) -> HttpRequest {
        HttpRequest::new(path).param("key", &self.api_key)
    }

    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.transport.execute(&request)
    }

    // -----------------------------------------------------------------------
    // Builders
    // -----------------------------------------------------------------------

    pub fn build_author_books(&self, author_id: &str, page: u32) -> HttpRequest {
        self.request(format!("/author/list/{}", path_segment(author_id)))
            .param("page", page_number(page))
    }

    pub fn build_author_show(&self, author_id: &str) -> HttpRequest {
        self.request(format!("/author/show/{}", path_segment(author_id)))
    }

    /// ISBNs are joined with `,` in caller order.
    pub fn build_book_review_counts<S: AsRef<str>>(
        &self,
        isbns: &[S],
    ) -> Result<HttpRequest, ApiError> {
        if isbns.is_empty() {
            return Err(ApiError::EmptyIsbnList);
        }
        let joined = isbns
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(",");
        Ok(self
            .request("/book/review_counts.json".to_string())
            .param("isbns", joined))
    }

    pub fn build_review_list(&self, user_id: &str, query: &ReviewListQuery) -> HttpRequest {
        self.request(format!("/review/list/{}.xml", path_segment(user_id)))
            .param("order", query.order)
            .param("page", page_number(query.page))
            .param("per_page", query.per_page)
            .param("search", &query.search)
            .param("shelf", &query.shelf)
            .param("sort", &query.sort)
            .param("v", REVIEW_LIST_VERSION)
    }

    pub fn build_search_books(&self, query: &str, page: u32, field: SearchField) -> HttpRequest {
        self.request("/search/index.xml".to_string())
            .param("q", query)
            .param("page", page_number(page))
            .param("search[field]", field)
    }

    pub fn build_shelves_list(&self, user_id: &str) -> HttpRequest {
        self.request("/shelf/list.xml".to_string())
            .param("user_id", user_id)
    }

    pub fn build_user_show(&self, user_id: &str) -> HttpRequest {
        self.request(format!("/user/show/{}.xml", path_segment(user_id)))
    }

    // -----------------------------------------------------------------------
    // Parsers
    // -----------------------------------------------------------------------

    pub fn parse_author_books(&self, response: HttpResponse) -> Result<Author, ApiError> {
        check_status(&response)?;
        envelope::author(&response.body)
    }

    pub fn parse_author_show(&self, response: HttpResponse) -> Result<Author, ApiError> {
        check_status(&response)?;
        envelope::author(&response.body)
    }

    pub fn parse_book_review_counts(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<ReviewCounts>, ApiError> {
        check_status(&response)?;
        envelope::review_counts(&response.body)
    }

    pub fn parse_review_list(&self, response: HttpResponse) -> Result<Vec<Review>, ApiError> {
        check_status(&response)?;
        envelope::reviews(&response.body)
    }

    pub fn parse_search_books(&self, response: HttpResponse) -> Result<Vec<Book>, ApiError> {
        check_status(&response)?;
        envelope::books(&response.body)
    }

    pub fn parse_shelves_list(&self, response: HttpResponse) -> Result<Vec<UserShelf>, ApiError> {
        check_status(&response)?;
        envelope::shelves(&response.body)
    }

    pub fn parse_user_show(&self, response: HttpResponse) -> Result<User, ApiError> {
        check_status(&response)?;
        envelope::user(&response.body)
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Author record from the author's paginated book list. Only the
    /// `<author>` node is decoded; the book list itself is not returned.
    #[instrument(skip(self))]
    pub fn author_books(&self, author_id: &str, page: u32) -> Result<Author, ApiError> {
        let response = self.execute(self.build_author_books(author_id, page))?;
        self.parse_author_books(response)
    }

    #[instrument(skip(self))]
    pub fn author_show(&self, author_id: &str) -> Result<Author, ApiError> {
        let response = self.execute(self.build_author_show(author_id))?;
        self.parse_author_show(response)
    }

    /// One entry per book object in the response, in response order.
    #[instrument(skip_all, fields(isbns = isbns.len()))]
    pub fn book_review_counts<S: AsRef<str>>(
        &self,
        isbns: &[S],
    ) -> Result<Vec<ReviewCounts>, ApiError> {
        let response = self.execute(self.build_book_review_counts(isbns)?)?;
        self.parse_book_review_counts(response)
    }

    #[instrument(skip(self))]
    pub fn review_list(
        &self,
        user_id: &str,
        query: &ReviewListQuery,
    ) -> Result<Vec<Review>, ApiError> {
        let response = self.execute(self.build_review_list(user_id, query))?;
        self.parse_review_list(response)
    }

    /// A `page` of 0 requests the first page.
    #[instrument(skip(self))]
    pub fn search_books(
        &self,
        query: &str,
        page: u32,
        field: SearchField,
    ) -> Result<Vec<Book>, ApiError> {
        let response = self.execute(self.build_search_books(query, page, field))?;
        self.parse_search_books(response)
    }

    #[instrument(skip(self))]
    pub fn shelves_list(&self, user_id: &str) -> Result<Vec<UserShelf>, ApiError> {
        let response = self.execute(self.build_shelves_list(user_id))?;
        self.parse_shelves_list(response)
    }

    #[instrument(skip(self))]
    pub fn user_show(&self, user_id: &str) -> Result<User, ApiError> {
        let response = self.execute(self.build_user_show(user_id))?;
        self.parse_user_show(response)
    }
}

/// Pages are 1-based; 0 stands for the first page.
fn page_number(page: u32) -> u32 {
    page.max(1)
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
