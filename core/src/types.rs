//! Domain records and typed query parameters for the catalog API.
//!
//! # Design
//! Records are plain values decoded fresh per call. Every record is
//! `#[serde(default)]`, so a field the service leaves out decodes to its zero
//! value and unknown elements are ignored. Query inputs that the service only
//! accepts from a fixed vocabulary are enums, never free strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Author {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct User {
    pub id: String,
    pub name: String,
}

/// The subset of a catalog book that search results carry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Book {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Review {
    pub id: String,
    pub rating: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UserShelf {
    pub id: String,
    pub name: String,
}

/// Rating and review tallies for one book, from `/book/review_counts.json`.
///
/// `average_rating` stays a string so the service's formatting survives
/// (`"3.80"` is not rewritten to `3.8`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReviewCounts {
    pub id: u64,
    pub isbn: String,
    pub isbn13: String,
    pub ratings_count: u64,
    pub reviews_count: u64,
    pub text_reviews_count: u64,
    pub work_ratings_count: u64,
    pub work_reviews_count: u64,
    pub work_text_reviews_count: u64,
    pub average_rating: String,
}

/// Value of the `search[field]` parameter of `/search/index.xml`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SearchField {
    #[default]
    All,
    Title,
    Author,
    Genre,
}

impl SearchField {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchField::All => "all",
            SearchField::Title => "title",
            SearchField::Author => "author",
            SearchField::Genre => "genre",
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchField {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(SearchField::All),
            "title" => Ok(SearchField::Title),
            "author" => Ok(SearchField::Author),
            "genre" => Ok(SearchField::Genre),
            other => Err(ApiError::InvalidSearchField(other.to_string())),
        }
    }
}

/// Value of the `order` parameter of `/review/list`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Ascending => "a",
            SortOrder::Descending => "d",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filters and paging for a user's review list. Every field is sent, empty
/// strings included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewListQuery {
    pub shelf: String,
    pub sort: String,
    pub search: String,
    pub order: SortOrder,
    pub page: u32,
    pub per_page: u32,
}

impl Default for ReviewListQuery {
    fn default() -> Self {
        Self {
            shelf: String::new(),
            sort: String::new(),
            search: String::new(),
            order: SortOrder::Descending,
            page: 1,
            per_page: 20,
        }
    }
}
