use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, API_KEY};
use tower::ServiceExt;

async fn body_text(response: axum::response::Response) -> String {
    let bytes: bytes::Bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

// --- authentication ---

#[tokio::test]
async fn wrong_key_returns_401() {
    let resp = app()
        .oneshot(get("/author/show/12345?key=nope"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(resp).await, "Invalid API key");
}

#[tokio::test]
async fn missing_key_returns_401() {
    let resp = app().oneshot(get("/shelf/list.xml?user_id=user-id")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- authors ---

#[tokio::test]
async fn author_show_returns_envelope() {
    let resp = app()
        .oneshot(get(&format!("/author/show/12345?key={API_KEY}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_text(resp).await,
        "<response><author><id>12345</id><name>Haruki Murakami</name></author></response>"
    );
}

#[tokio::test]
async fn author_books_requires_page() {
    let resp = app()
        .oneshot(get(&format!("/author/list/12345?key={API_KEY}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(resp).await, "missing parameter: page");
}

#[tokio::test]
async fn unknown_author_returns_404() {
    let resp = app()
        .oneshot(get(&format!("/author/show/999?key={API_KEY}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- review counts ---

#[tokio::test]
async fn review_counts_follow_request_order() {
    let resp = app()
        .oneshot(get(&format!(
            "/book/review_counts.json?isbns=0441172717%2C9781400078776&key={API_KEY}"
        )))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
    let ids: Vec<u64> = json["books"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, [234225, 15]);
}

#[tokio::test]
async fn review_counts_unknown_isbn_returns_404() {
    let resp = app()
        .oneshot(get(&format!("/book/review_counts.json?isbns=000&key={API_KEY}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- reviews ---

#[tokio::test]
async fn review_list_filters_by_shelf_and_pages() {
    let resp = app()
        .oneshot(get(&format!(
            "/review/list/user-id.xml?key={API_KEY}&order=d&page=2&per_page=2&search=&shelf=read&sort=&v=2"
        )))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("<id>review4</id>"));
    assert!(!body.contains("review1"));
    assert!(!body.contains("review3"));
}

#[tokio::test]
async fn review_list_requires_version_2() {
    let resp = app()
        .oneshot(get(&format!(
            "/review/list/user-id.xml?key={API_KEY}&order=d&page=1&per_page=2&search=&shelf=&sort=&v=1"
        )))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- search ---

#[tokio::test]
async fn search_by_author_field() {
    let resp = app()
        .oneshot(get(&format!(
            "/search/index.xml?key={API_KEY}&page=1&q=herbert&search%5Bfield%5D=author"
        )))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("<title>Dune</title>"));
    assert!(body.contains("<title>Dune Messiah</title>"));
    assert!(!body.contains("Norwegian Wood"));
}

#[tokio::test]
async fn search_rejects_unknown_field() {
    let resp = app()
        .oneshot(get(&format!(
            "/search/index.xml?key={API_KEY}&page=1&q=dune&search%5Bfield%5D=isbn"
        )))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- users and shelves ---

#[tokio::test]
async fn user_show_strips_xml_suffix() {
    let resp = app()
        .oneshot(get(&format!("/user/show/user-id.xml?key={API_KEY}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("<name>User Name</name>"));
}

#[tokio::test]
async fn shelves_list_keeps_catalog_order() {
    let resp = app()
        .oneshot(get(&format!("/shelf/list.xml?key={API_KEY}&user_id=user-id")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    let read = body.find("shelf1").unwrap();
    let current = body.find("shelf2").unwrap();
    let to_read = body.find("shelf3").unwrap();
    assert!(read < current && current < to_read);
}
