mod common;

use common::mock_server::{current_user_body, token_with_exp, unix_now, OharaMock};
use ohara::types::LoginUser;
use ohara::SessionEvent;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

fn credentials() -> LoginUser {
    LoginUser {
        username: "casey".to_string(),
        password: "hunter2".to_string(),
    }
}

async fn mount_login(mock: &OharaMock, token: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/users/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": token })))
        .mount(&mock.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/users/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_user_body()))
        .mount(&mock.server)
        .await;
}

#[tokio::test]
async fn test_login_then_logout() {
    let mock = OharaMock::start().await;
    mount_login(&mock, &token_with_exp(unix_now() + 3600)).await;
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock.server)
        .await;

    let mut session = mock.session();
    assert!(!session.is_authenticated());

    let user = session.login(&credentials()).await.unwrap();
    assert_eq!(user.username, "casey");
    assert!(session.is_authenticated());
    assert!(session.token().is_some());
    assert!(session.expires_at().is_some());

    session.logout().await.unwrap();
    assert!(!session.is_authenticated());
    assert!(session.token().is_none());
    assert!(session.user().is_none());
}

#[tokio::test]
async fn test_login_failure_stays_anonymous() {
    let mock = OharaMock::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/users/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid credentials" })),
        )
        .mount(&mock.server)
        .await;

    let mut session = mock.session();
    let err = session.login(&credentials()).await.unwrap_err();
    assert!(err.to_string().contains("Invalid credentials"));
    assert!(!session.is_authenticated());
    assert!(session.token().is_none());
}

#[tokio::test]
async fn test_lapsed_token_fires_expiry_event() {
    let mock = OharaMock::start().await;
    mount_login(&mock, &token_with_exp(unix_now() - 10)).await;

    let mut session = mock.session();
    session.login(&credentials()).await.unwrap();

    let mut fired = None;
    for _ in 0..40 {
        if let Some(event) = session.poll_event() {
            fired = Some(event);
            break;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    assert_eq!(fired, Some(SessionEvent::Expired));
}

#[tokio::test]
async fn test_logout_drops_raced_expiry_event() {
    let mock = OharaMock::start().await;
    mount_login(&mock, &token_with_exp(unix_now() - 10)).await;
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock.server)
        .await;

    let mut session = mock.session();
    session.login(&credentials()).await.unwrap();
    // Give the zero-delay timer time to fire, then log out explicitly.
    tokio::time::sleep(Duration::from_millis(100)).await;
    session.logout().await.unwrap();
    assert_eq!(session.poll_event(), None);
}

#[tokio::test]
async fn test_restore_expired_token_makes_no_request() {
    let mock = OharaMock::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/users/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_user_body()))
        .expect(0)
        .mount(&mock.server)
        .await;

    let mut session = mock.session();
    let expired = time::OffsetDateTime::now_utc() - time::Duration::hours(1);
    let restored = session
        .restore(token_with_exp(unix_now() - 3600), expired)
        .await
        .unwrap();
    assert!(restored.is_none());
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_restore_unexpired_token() {
    let mock = OharaMock::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/users/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_user_body()))
        .expect(1)
        .mount(&mock.server)
        .await;

    let mut session = mock.session();
    let expires_at = time::OffsetDateTime::now_utc() + time::Duration::hours(1);
    let restored = session
        .restore(token_with_exp(unix_now() + 3600), expires_at)
        .await
        .unwrap();
    assert_eq!(restored.unwrap().username, "casey");
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn test_restore_rejected_token_resets() {
    let mock = OharaMock::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/users/current"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "Unauthorized" })))
        .mount(&mock.server)
        .await;

    let mut session = mock.session();
    let expires_at = time::OffsetDateTime::now_utc() + time::Duration::hours(1);
    let restored = session
        .restore(token_with_exp(unix_now() + 3600), expires_at)
        .await
        .unwrap();
    assert!(restored.is_none());
    assert!(session.token().is_none());
}
