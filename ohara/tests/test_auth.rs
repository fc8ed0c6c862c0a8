mod common;

use common::mock_server::{current_user_body, token_with_exp, unix_now, OharaMock};
use ohara::types::{InsertUser, LoginUser};
use ohara::Error;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_login_returns_token() {
    let mock = OharaMock::start().await;
    let token = token_with_exp(unix_now() + 3600);
    Mock::given(method("POST"))
        .and(path("/auth/users/login"))
        .and(body_json(json!({
            "username": "casey",
            "password": "hunter2"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": token })))
        .expect(1)
        .mount(&mock.server)
        .await;

    let credentials = LoginUser {
        username: "casey".to_string(),
        password: "hunter2".to_string(),
    };
    let response = mock.client().login(&credentials).await.unwrap();
    assert_eq!(response.token, token);
}

#[tokio::test]
async fn test_login_bad_credentials() {
    let mock = OharaMock::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/users/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid credentials" })),
        )
        .mount(&mock.server)
        .await;

    let credentials = LoginUser {
        username: "casey".to_string(),
        password: "wrong".to_string(),
    };
    let err = mock.client().login(&credentials).await.unwrap_err();
    assert!(err.to_string().contains("Invalid credentials"));
}

#[tokio::test]
async fn test_register_success() {
    let mock = OharaMock::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users"))
        .and(body_json(json!({
            "username": "casey",
            "password": "hunter2",
            "email": "casey@example.com",
            "firstName": "Casey",
            "lastName": "Reader"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(current_user_body()))
        .expect(1)
        .mount(&mock.server)
        .await;

    let new_user = InsertUser {
        username: "casey".to_string(),
        password: "hunter2".to_string(),
        email: "casey@example.com".to_string(),
        first_name: "Casey".to_string(),
        last_name: "Reader".to_string(),
    };
    let created = mock.client().register(&new_user).await.unwrap();
    assert_eq!(created.username, "casey");
    assert_eq!(created.display_name(), "Casey");
}

#[tokio::test]
async fn test_register_validation_fails_before_any_request() {
    let mock = OharaMock::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(201).set_body_json(current_user_body()))
        .expect(0)
        .mount(&mock.server)
        .await;

    let new_user = InsertUser {
        username: "casey".to_string(),
        password: String::new(),
        email: "casey@example.com".to_string(),
        first_name: "Casey".to_string(),
        last_name: "Reader".to_string(),
    };
    let err = mock.session().register(&new_user).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(err.to_string().to_lowercase().contains("password"));
}

#[tokio::test]
async fn test_current_user_unauthorized_is_none() {
    let mock = OharaMock::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/users/current"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "Unauthorized" })))
        .mount(&mock.server)
        .await;

    let user = mock.client().current_user().await.unwrap();
    assert!(user.is_none());
}

#[tokio::test]
async fn test_current_user_with_token() {
    let mock = OharaMock::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/users/current"))
        .and(header("Authorization", "Bearer reader-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_user_body()))
        .mount(&mock.server)
        .await;

    let client = mock.client().with_token("reader-token");
    let user = client.current_user().await.unwrap().unwrap();
    assert_eq!(user.username, "casey");
    assert_eq!(user.email, "casey@example.com");
}
