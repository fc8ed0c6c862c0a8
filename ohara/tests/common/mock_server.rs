use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ohara::{OharaClient, Session};
use serde_json::json;
use time::OffsetDateTime;
use wiremock::MockServer;

pub struct OharaMock {
    pub server: MockServer,
}

impl OharaMock {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn client(&self) -> OharaClient {
        OharaClient::new().with_base_url(self.server.uri())
    }

    #[allow(dead_code)]
    pub fn session(&self) -> Session {
        Session::new(self.client())
    }
}

/// Builds an unsigned JWT whose payload carries the given `exp` claim.
/// The client never verifies signatures, so "signature" will do.
#[allow(dead_code)]
pub fn token_with_exp(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(json!({ "sub": "casey", "exp": exp }).to_string());
    format!("{header}.{payload}.signature")
}

#[allow(dead_code)]
pub fn unix_now() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

/// A one-page books payload in the API's wire shape.
#[allow(dead_code)]
pub fn books_page(current_page: u32, total_pages: u32) -> serde_json::Value {
    json!({
        "data": [
            {
                "id": 1,
                "title": "The Night Circus",
                "author": "Erin Morgenstern",
                "category": "Fantasy",
                "coverUrl": "https://covers.example/night-circus.jpg",
                "lastOpened": "2026-07-20T12:00:00Z",
                "progress": 42
            },
            {
                "id": 2,
                "title": "Educated",
                "author": "Tara Westover",
                "category": "Non-Fiction",
                "coverUrl": null,
                "lastOpened": null,
                "progress": 0
            }
        ],
        "meta": {
            "currentPage": current_page,
            "totalPages": total_pages,
            "totalItems": 48,
            "itemsPerPage": 5
        }
    })
}

/// The current-user payload in the API's wire shape.
#[allow(dead_code)]
pub fn current_user_body() -> serde_json::Value {
    json!({
        "id": 7,
        "username": "casey",
        "email": "casey@example.com",
        "firstName": "Casey",
        "lastName": "Reader"
    })
}
