//! In-process stand-in for the catalog service.
//!
//! Serves a fixed catalog on the same paths, query parameters and envelope
//! shapes as the live API. Requests with a wrong `key` get 401, missing
//! required parameters get 400, unknown ids get 404.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::debug;

pub const API_KEY: &str = "test-api-key";

#[derive(Clone, Debug, Serialize)]
pub struct Author {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Shelf {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Review {
    pub id: String,
    pub rating: u32,
    #[serde(skip)]
    pub shelf: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    #[serde(skip)]
    pub author: String,
}

#[derive(Clone, Debug, Serialize)]
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

/// Read-only data served by the mock.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub api_key: String,
    pub authors: HashMap<String, Author>,
    pub users: HashMap<String, User>,
    pub shelves: HashMap<String, Vec<Shelf>>,
    pub reviews: HashMap<String, Vec<Review>>,
    pub books: Vec<Book>,
    pub review_counts: Vec<ReviewCounts>,
}

impl Catalog {
    /// A small catalog keyed by [`API_KEY`].
    pub fn sample() -> Self {
        let author = |id: &str, name: &str| Author {
            id: id.to_string(),
            name: name.to_string(),
        };
        let shelf = |id: &str, name: &str| Shelf {
            id: id.to_string(),
            name: name.to_string(),
        };
        let review = |id: &str, rating: u32, shelf: &str| Review {
            id: id.to_string(),
            rating,
            shelf: shelf.to_string(),
        };
        let book = |id: &str, title: &str, author: &str| Book {
            id: id.to_string(),
            title: title.to_string(),
            author: author.to_string(),
        };

        Self {
            api_key: API_KEY.to_string(),
            authors: HashMap::from([
                ("12345".to_string(), author("12345", "Haruki Murakami")),
                ("58".to_string(), author("58", "Frank Herbert")),
            ]),
            users: HashMap::from([(
                "user-id".to_string(),
                User {
                    id: "user-id".to_string(),
                    name: "User Name".to_string(),
                },
            )]),
            shelves: HashMap::from([(
                "user-id".to_string(),
                vec![
                    shelf("shelf1", "read"),
                    shelf("shelf2", "currently-reading"),
                    shelf("shelf3", "to-read"),
                ],
            )]),
            reviews: HashMap::from([(
                "user-id".to_string(),
                vec![
                    review("review1", 1, "read"),
                    review("review2", 2, "read"),
                    review("review3", 3, "to-read"),
                    review("review4", 5, "read"),
                ],
            )]),
            books: vec![
                book("book1", "Norwegian Wood", "Haruki Murakami"),
                book("book2", "Kafka on the Shore", "Haruki Murakami"),
                book("book3", "Dune", "Frank Herbert"),
                book("book4", "Dune Messiah", "Frank Herbert"),
            ],
            review_counts: vec![
                ReviewCounts {
                    id: 15,
                    isbn: "1400078776".to_string(),
                    isbn13: "9781400078776".to_string(),
                    ratings_count: 1,
                    reviews_count: 2,
                    text_reviews_count: 3,
                    work_ratings_count: 4,
                    work_reviews_count: 5,
                    work_text_reviews_count: 6,
                    average_rating: "3.82".to_string(),
                },
                ReviewCounts {
                    id: 234225,
                    isbn: "0441172717".to_string(),
                    isbn13: "9780441172719".to_string(),
                    ratings_count: 10,
                    reviews_count: 20,
                    text_reviews_count: 30,
                    work_ratings_count: 40,
                    work_reviews_count: 50,
                    work_text_reviews_count: 60,
                    average_rating: "4.30".to_string(),
                },
            ],
        }
    }
}

pub type Db = Arc<Catalog>;

type Params = HashMap<String, String>;

pub fn app() -> Router {
    app_with(Catalog::sample())
}

pub fn app_with(catalog: Catalog) -> Router {
    let db: Db = Arc::new(catalog);
    Router::new()
        .route("/author/list/{id}", get(author_books))
        .route("/author/show/{id}", get(author_show))
        .route("/book/review_counts.json", get(review_counts))
        .route("/review/list/{file}", get(review_list))
        .route("/search/index.xml", get(search_books))
        .route("/shelf/list.xml", get(shelves_list))
        .route("/user/show/{file}", get(user_show))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename = "response")]
struct AuthorResponse<'a> {
    author: &'a Author,
}

#[derive(Serialize)]
#[serde(rename = "response")]
struct UserResponse<'a> {
    user: &'a User,
}

#[derive(Serialize)]
#[serde(rename = "response")]
struct ReviewsResponse<'a> {
    reviews: ReviewNodes<'a>,
}

#[derive(Serialize)]
struct ReviewNodes<'a> {
    review: Vec<&'a Review>,
}

#[derive(Serialize)]
#[serde(rename = "response")]
struct BooksResponse<'a> {
    books: BookNodes<'a>,
}

#[derive(Serialize)]
struct BookNodes<'a> {
    user_book: Vec<&'a Book>,
}

#[derive(Serialize)]
#[serde(rename = "response")]
struct ShelvesResponse<'a> {
    shelves: ShelfNodes<'a>,
}

#[derive(Serialize)]
struct ShelfNodes<'a> {
    user_shelf: Vec<&'a Shelf>,
}

#[derive(Serialize)]
struct ReviewCountsResponse<'a> {
    books: Vec<&'a ReviewCounts>,
}

fn xml<T: Serialize>(envelope: &T) -> Response {
    match quick_xml::se::to_string(envelope) {
        Ok(body) => ([(header::CONTENT_TYPE, "application/xml")], body).into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}

// ---------------------------------------------------------------------------
// Parameter checks
// ---------------------------------------------------------------------------

fn authorize(db: &Catalog, params: &Params) -> Result<(), Response> {
    match params.get("key") {
        Some(key) if *key == db.api_key => Ok(()),
        _ => {
            debug!("rejected request with bad API key");
            Err((StatusCode::UNAUTHORIZED, "Invalid API key").into_response())
        }
    }
}

fn required<'a>(params: &'a Params, name: &str) -> Result<&'a str, Response> {
    params
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| (StatusCode::BAD_REQUEST, format!("missing parameter: {name}")).into_response())
}

fn number(params: &Params, name: &str) -> Result<usize, Response> {
    required(params, name)?
        .parse()
        .map_err(|_| (StatusCode::BAD_REQUEST, format!("invalid parameter: {name}")).into_response())
}

fn xml_id(file: &str) -> Result<&str, Response> {
    file.strip_suffix(".xml")
        .ok_or_else(|| StatusCode::NOT_FOUND.into_response())
}

/// 1-based page slice.
fn page_of<T>(items: &[T], page: usize, per_page: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(per_page).min(items.len());
    let end = start.saturating_add(per_page).min(items.len());
    &items[start..end]
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn author_books(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<Params>,
) -> Result<Response, Response> {
    authorize(&db, &params)?;
    number(&params, "page")?;
    let author = db.authors.get(&id).ok_or_else(|| StatusCode::NOT_FOUND.into_response())?;
    Ok(xml(&AuthorResponse { author }))
}

async fn author_show(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<Params>,
) -> Result<Response, Response> {
    authorize(&db, &params)?;
    let author = db.authors.get(&id).ok_or_else(|| StatusCode::NOT_FOUND.into_response())?;
    Ok(xml(&AuthorResponse { author }))
}

async fn review_counts(
    State(db): State<Db>,
    Query(params): Query<Params>,
) -> Result<Response, Response> {
    authorize(&db, &params)?;
    let books: Vec<&ReviewCounts> = required(&params, "isbns")?
        .split(',')
        .filter_map(|isbn| {
            db.review_counts
                .iter()
                .find(|c| c.isbn == isbn || c.isbn13 == isbn)
        })
        .collect();
    if books.is_empty() {
        return Err((StatusCode::NOT_FOUND, "No books match those ISBNs.").into_response());
    }
    Ok(Json(ReviewCountsResponse { books }).into_response())
}

async fn review_list(
    State(db): State<Db>,
    Path(file): Path<String>,
    Query(params): Query<Params>,
) -> Result<Response, Response> {
    authorize(&db, &params)?;
    let user_id = xml_id(&file)?;
    if required(&params, "v")? != "2" {
        return Err((StatusCode::BAD_REQUEST, "unsupported version").into_response());
    }
    for name in ["order", "search", "sort"] {
        required(&params, name)?;
    }
    let shelf = required(&params, "shelf")?;
    let page = number(&params, "page")?;
    let per_page = number(&params, "per_page")?;

    let reviews = db.reviews.get(user_id).ok_or_else(|| StatusCode::NOT_FOUND.into_response())?;
    let on_shelf: Vec<&Review> = reviews
        .iter()
        .filter(|r| shelf.is_empty() || r.shelf == shelf)
        .collect();
    let review = page_of(&on_shelf, page, per_page).to_vec();
    Ok(xml(&ReviewsResponse {
        reviews: ReviewNodes { review },
    }))
}

async fn search_books(
    State(db): State<Db>,
    Query(params): Query<Params>,
) -> Result<Response, Response> {
    authorize(&db, &params)?;
    let q = required(&params, "q")?.to_lowercase();
    let page = number(&params, "page")?;
    let field = required(&params, "search[field]")?;

    if !["all", "title", "author", "genre"].contains(&field) {
        return Err((StatusCode::BAD_REQUEST, format!("invalid search field: {field}")).into_response());
    }

    let found: Vec<&Book> = db
        .books
        .iter()
        .filter(|book| {
            let title = book.title.to_lowercase().contains(&q);
            let author = book.author.to_lowercase().contains(&q);
            match field {
                "title" => title,
                "author" => author,
                _ => title || author,
            }
        })
        .collect();
    let user_book = page_of(&found, page, 20).to_vec();
    Ok(xml(&BooksResponse {
        books: BookNodes { user_book },
    }))
}

async fn shelves_list(
    State(db): State<Db>,
    Query(params): Query<Params>,
) -> Result<Response, Response> {
    authorize(&db, &params)?;
    let user_id = required(&params, "user_id")?;
    let shelves = db.shelves.get(user_id).ok_or_else(|| StatusCode::NOT_FOUND.into_response())?;
    Ok(xml(&ShelvesResponse {
        shelves: ShelfNodes {
            user_shelf: shelves.iter().collect(),
        },
    }))
}

async fn user_show(
    State(db): State<Db>,
    Path(file): Path<String>,
    Query(params): Query<Params>,
) -> Result<Response, Response> {
    authorize(&db, &params)?;
    let user = db.users.get(xml_id(&file)?).ok_or_else(|| StatusCode::NOT_FOUND.into_response())?;
    Ok(xml(&UserResponse { user }))
}
