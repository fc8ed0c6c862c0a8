mod common;

use common::mock_server::{books_page, OharaMock};
use serde_json::json;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_get_books_with_filter() {
    let mock = OharaMock::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "5"))
        .and(query_param("filter", "fantasy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(books_page(2, 10)))
        .expect(1)
        .mount(&mock.server)
        .await;

    let books = mock.client().get_books(2, 5, Some("fantasy")).await.unwrap();
    assert_eq!(books.data.len(), 2);
    assert_eq!(books.data[0].title, "The Night Circus");
    assert_eq!(books.data[0].progress, 42);
    assert!(books.data[0].last_opened.is_some());
    assert!(books.data[1].cover_url.is_none());
    assert_eq!(books.meta.current_page, 2);
    assert_eq!(books.meta.total_pages, 10);
}

#[tokio::test]
async fn test_get_books_omits_absent_filter() {
    let mock = OharaMock::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "10"))
        .and(query_param_is_missing("filter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(books_page(1, 1)))
        .expect(1)
        .mount(&mock.server)
        .await;

    let books = mock.client().get_books(1, 10, None).await.unwrap();
    assert_eq!(books.meta.total_pages, 1);
}

#[tokio::test]
async fn test_error_message_includes_status_text() {
    let mock = OharaMock::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "catalog unavailable" })),
        )
        .mount(&mock.server)
        .await;

    let err = mock.client().get_books(1, 5, None).await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Internal Server Error"), "{message}");
    assert!(message.contains("catalog unavailable"), "{message}");
}

#[tokio::test]
async fn test_error_without_json_body_uses_status_text() {
    let mock = OharaMock::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock.server)
        .await;

    let err = mock.client().get_books(1, 5, None).await.unwrap_err();
    assert!(err.is_status(404));
    assert!(err.to_string().contains("Not Found"));
}
