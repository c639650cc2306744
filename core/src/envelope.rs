//! Response envelopes, one per endpoint shape.
//!
//! Every XML endpoint wraps its payload in a root element (`<response>` in
//! fixtures, `<GoodreadsResponse>` on the live service) whose name is not
//! checked. Only the nested path each endpoint promises is mapped; siblings
//! such as `<Request>` are skipped.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiError;
use crate::types::{Author, Book, Review, ReviewCounts, User, UserShelf};

/// `response/author`; only the first node is used.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AuthorEnvelope {
    author: Vec<Author>,
}

/// `response/user`; only the first node is used.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UserEnvelope {
    user: Vec<User>,
}

/// `response/reviews/review[]`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReviewsEnvelope {
    reviews: ReviewNodes,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReviewNodes {
    review: Vec<ReviewNode>,
}

/// `<rating/>` arrives as empty text and means 0.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReviewNode {
    id: String,
    rating: String,
}

impl TryFrom<ReviewNode> for Review {
    type Error = ApiError;

    fn try_from(node: ReviewNode) -> Result<Self, Self::Error> {
        let text = node.rating.trim();
        let rating = if text.is_empty() {
            0
        } else {
            text.parse().map_err(|_| {
                ApiError::DeserializationError(format!("invalid rating {text:?} for review {}", node.id))
            })?
        };
        Ok(Review { id: node.id, rating })
    }
}

/// `response/books/user_book[]`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BooksEnvelope {
    books: BookNodes,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BookNodes {
    user_book: Vec<BookNode>,
}

/// Search results name the title either `<title>` or `<name>`; `<title>` wins.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BookNode {
    id: String,
    title: Option<String>,
    name: Option<String>,
}

impl From<BookNode> for Book {
    fn from(node: BookNode) -> Self {
        Book {
            id: node.id,
            title: node.title.or(node.name).unwrap_or_default(),
        }
    }
}

/// `response/shelves/user_shelf[]`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ShelvesEnvelope {
    shelves: ShelfNodes,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ShelfNodes {
    user_shelf: Vec<UserShelf>,
}

/// `{"books": [...]}`
#[derive(Debug, Deserialize)]
struct ReviewCountsEnvelope {
    books: Vec<ReviewCounts>,
}

fn from_xml<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    quick_xml::de::from_str(body).map_err(|err| {
        debug!(error = %err, "XML response did not match envelope");
        ApiError::from(err)
    })
}

fn from_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|err| {
        debug!(error = %err, "JSON response did not match envelope");
        ApiError::from(err)
    })
}

pub(crate) fn author(body: &str) -> Result<Author, ApiError> {
    from_xml::<AuthorEnvelope>(body)?
        .author
        .into_iter()
        .next()
        .ok_or(ApiError::MissingElement("author"))
}

pub(crate) fn user(body: &str) -> Result<User, ApiError> {
    from_xml::<UserEnvelope>(body)?
        .user
        .into_iter()
        .next()
        .ok_or(ApiError::MissingElement("user"))
}

pub(crate) fn reviews(body: &str) -> Result<Vec<Review>, ApiError> {
    from_xml::<ReviewsEnvelope>(body)?
        .reviews
        .review
        .into_iter()
        .map(Review::try_from)
        .collect()
}

pub(crate) fn books(body: &str) -> Result<Vec<Book>, ApiError> {
    Ok(from_xml::<BooksEnvelope>(body)?
        .books
        .user_book
        .into_iter()
        .map(Book::from)
        .collect())
}

pub(crate) fn shelves(body: &str) -> Result<Vec<UserShelf>, ApiError> {
    Ok(from_xml::<ShelvesEnvelope>(body)?.shelves.user_shelf)
}

pub(crate) fn review_counts(body: &str) -> Result<Vec<ReviewCounts>, ApiError> {
    Ok(from_json::<ReviewCountsEnvelope>(body)?.books)
}
