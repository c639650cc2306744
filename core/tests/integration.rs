//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every client
//! operation over real HTTP through `UreqTransport`. Validates that the
//! URLs the client builds are accepted by a server enforcing the same
//! parameter contract, and that statuses map to the right errors.

use std::net::SocketAddr;

use goodreads_core::{
    ApiError, Author, Book, GoodreadsClient, Review, ReviewListQuery, SearchField, UreqTransport,
    User, UserShelf,
};

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn client_for(addr: SocketAddr, key: &str) -> GoodreadsClient {
    let transport = UreqTransport::new(&format!("http://{addr}/")).verbose(true);
    GoodreadsClient::with_transport(key, transport)
}

#[test]
fn every_operation_round_trips() {
    let addr = start_server();
    let client = client_for(addr, mock_server::API_KEY);

    let author = client.author_show("12345").unwrap();
    assert_eq!(
        author,
        Author {
            id: "12345".to_string(),
            name: "Haruki Murakami".to_string()
        }
    );

    let author = client.author_books("58", 0).unwrap();
    assert_eq!(author.name, "Frank Herbert");

    let counts = client
        .book_review_counts(&["9780441172719", "1400078776"])
        .unwrap();
    let ids: Vec<u64> = counts.iter().map(|c| c.id).collect();
    assert_eq!(ids, [234225, 15]);
    assert_eq!(counts[1].average_rating, "3.82");
    assert_eq!(counts[1].work_text_reviews_count, 6);

    let query = ReviewListQuery {
        shelf: "read".to_string(),
        per_page: 200,
        ..ReviewListQuery::default()
    };
    let reviews = client.review_list("user-id", &query).unwrap();
    assert_eq!(
        reviews,
        vec![
            Review { id: "review1".to_string(), rating: 1 },
            Review { id: "review2".to_string(), rating: 2 },
            Review { id: "review4".to_string(), rating: 5 },
        ]
    );

    let books = client.search_books("dune", 0, SearchField::Title).unwrap();
    assert_eq!(
        books,
        vec![
            Book { id: "book3".to_string(), title: "Dune".to_string() },
            Book { id: "book4".to_string(), title: "Dune Messiah".to_string() },
        ]
    );

    let shelves = client.shelves_list("user-id").unwrap();
    let names: Vec<&str> = shelves.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["read", "currently-reading", "to-read"]);

    let user = client.user_show("user-id").unwrap();
    assert_eq!(
        user,
        User {
            id: "user-id".to_string(),
            name: "User Name".to_string()
        }
    );
}

#[test]
fn empty_results_decode_to_empty_lists() {
    let addr = start_server();
    let client = client_for(addr, mock_server::API_KEY);

    let books = client.search_books("no such book", 1, SearchField::All).unwrap();
    assert!(books.is_empty());

    let query = ReviewListQuery {
        page: 5,
        ..ReviewListQuery::default()
    };
    let reviews = client.review_list("user-id", &query).unwrap();
    assert!(reviews.is_empty());
}

#[test]
fn bad_key_is_http_error() {
    let addr = start_server();
    let client = client_for(addr, "wrong-key");

    let err = client.user_show("user-id").unwrap_err();
    match err {
        ApiError::HttpError { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "Invalid API key");
        }
        other => panic!("expected HttpError, got {other:?}"),
    }
}

#[test]
fn unknown_ids_are_not_found() {
    let addr = start_server();
    let client = client_for(addr, mock_server::API_KEY);

    assert!(matches!(client.author_show("999"), Err(ApiError::NotFound)));
    assert!(matches!(client.user_show("ghost"), Err(ApiError::NotFound)));
    assert!(matches!(client.shelves_list("ghost"), Err(ApiError::NotFound)));
    assert!(matches!(
        client.book_review_counts(&["0000000000"]),
        Err(ApiError::NotFound)
    ));
}

#[test]
fn unreachable_server_is_transport_error() {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    drop(std_listener);

    let client = client_for(addr, mock_server::API_KEY);
    let err = client.shelves_list("user-id").unwrap_err();
    assert!(matches!(err, ApiError::Transport { .. }), "got {err:?}");
}

#[test]
fn concurrent_calls_share_one_client() {
    let addr = start_server();
    let client = client_for(addr, mock_server::API_KEY);

    std::thread::scope(|s| {
        let mut handles = Vec::new();
        for i in 0..8 {
            let client = &client;
            handles.push(s.spawn(move || {
                if i % 2 == 0 {
                    let author = client.author_show("58").unwrap();
                    assert_eq!(author.name, "Frank Herbert");
                } else {
                    let shelves: Vec<UserShelf> = client.shelves_list("user-id").unwrap();
                    assert_eq!(shelves.len(), 3);
                    let user = client.user_show("user-id").unwrap();
                    assert_eq!(user.id, "user-id");
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
    });
}
