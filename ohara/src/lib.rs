pub mod session;
pub mod types;

pub use crate::session::{Session, SessionEvent};

use crate::types::{
    Book, BooksResponse, CurrentUser, ErrorBody, InsertUser, LoginResponse, LoginUser, NewBook,
};
use reqwest::{Client, Response};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-success response, normalized from the status line and the server's
    /// `{"error": ...}` payload.
    #[error("{status} {reason}: {message}")]
    Api {
        status: u16,
        reason: String,
        message: String,
    },
    #[error("invalid session token: {0}")]
    Token(String),
    #[error("validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

impl Error {
    /// Whether this error is an API response with the given status code.
    #[must_use]
    pub fn is_status(&self, code: u16) -> bool {
        matches!(self, Self::Api { status, .. } if *status == code)
    }
}

/// Async client for the Ohara book library API.
///
/// Holds the base URL and, once a login has succeeded, the session's bearer
/// token. Every call is a single attempt: no retry, no backoff.
#[derive(Debug, Clone)]
pub struct OharaClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl Default for OharaClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OharaClient {
    /// Creates a client pointed at the default local API.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: "http://localhost:4125".to_string(),
            token: None,
        }
    }

    /// Sets the API base URL. A trailing slash is stripped so endpoint paths
    /// can always start with `/`.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        self.base_url = base_url;
        self
    }

    /// Sets the bearer token attached to every request.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Replaces or clears the bearer token.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// The currently attached bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    async fn get<T, U>(&self, endpoint: &str, query: &U) -> Result<T, Error>
    where
        T: serde::de::DeserializeOwned,
        U: serde::ser::Serialize,
    {
        let mut request = self
            .client
            .get(format!("{}{}", self.base_url, endpoint))
            .query(query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = check_status(request.send().await?).await?;
        response.json().await.map_err(Error::from)
    }

    async fn post<T, U>(&self, endpoint: &str, body: &U) -> Result<T, Error>
    where
        T: serde::de::DeserializeOwned,
        U: serde::ser::Serialize,
    {
        let mut request = self
            .client
            .post(format!("{}{}", self.base_url, endpoint))
            .json(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = check_status(request.send().await?).await?;
        response.json().await.map_err(Error::from)
    }

    /// Retrieves one page of the global catalog. `filter` is matched by the
    /// server against title, author, and category; `None` omits it from the
    /// query string.
    ///
    /// # Errors
    /// Returns an error if the HTTP request fails or response cannot be parsed.
    pub async fn get_books(
        &self,
        page: u32,
        limit: u32,
        filter: Option<&str>,
    ) -> Result<BooksResponse, Error> {
        let query: Vec<(&str, String)> = vec![
            Some(("page", page.to_string())),
            Some(("limit", limit.to_string())),
            filter.map(|f| ("filter", f.to_string())),
        ]
        .into_iter()
        .flatten()
        .collect();
        self.get("/api/books", &query).await
    }

    /// Retrieves one page of the current user's books. The server answers 401
    /// when no valid session token is attached.
    ///
    /// # Errors
    /// Returns an error if the HTTP request fails or response cannot be parsed.
    pub async fn get_user_books(&self, page: u32, limit: u32) -> Result<BooksResponse, Error> {
        let query = [("page", page.to_string()), ("limit", limit.to_string())];
        self.get("/api/user/books", &query).await
    }

    /// Exchanges credentials for a session token. Credentials are sent as-is;
    /// callers validate them first (see [`Session::login`]).
    ///
    /// # Errors
    /// Returns an error if the HTTP request fails or response cannot be parsed.
    pub async fn login(&self, credentials: &LoginUser) -> Result<LoginResponse, Error> {
        self.post("/auth/users/login", credentials).await
    }

    /// Registers a new user. Does not issue a session token.
    ///
    /// # Errors
    /// Returns an error if the HTTP request fails or response cannot be parsed.
    pub async fn register(&self, new_user: &InsertUser) -> Result<CurrentUser, Error> {
        self.post("/api/users", new_user).await
    }

    /// Retrieves the current user, or `None` when the server answers 401.
    /// A 401 here means "not logged in" and is not an error, so callers can
    /// tell a lapsed session apart from a network failure.
    ///
    /// # Errors
    /// Returns an error if the HTTP request fails (other than with a 401) or
    /// the response cannot be parsed.
    pub async fn current_user(&self) -> Result<Option<CurrentUser>, Error> {
        let query: [(&str, &str); 0] = [];
        match self.get("/auth/users/current", &query).await {
            Ok(user) => Ok(Some(user)),
            Err(Error::Api { status: 401, .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Tells the server to end the session. The response body is ignored; on
    /// some deployments this endpoint is a stub.
    ///
    /// # Errors
    /// Returns an error if the HTTP request fails.
    pub async fn logout(&self) -> Result<(), Error> {
        let mut request = self.client.post(format!("{}/api/logout", self.base_url));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        check_status(request.send().await?).await?;
        Ok(())
    }

    /// Creates a book record. Used by the seeding tool.
    ///
    /// # Errors
    /// Returns an error if the HTTP request fails or response cannot be parsed.
    pub async fn create_book(&self, book: &NewBook) -> Result<Book, Error> {
        self.post("/api/books", book).await
    }
}

/// Normalizes a non-success response into [`Error::Api`], carrying the
/// canonical status text and the server's error payload.
async fn check_status(response: Response) -> Result<Response, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let reason = status
        .canonical_reason()
        .unwrap_or("HTTP error")
        .to_string();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|parsed| parsed.error)
        .unwrap_or(body);
    let message = if message.trim().is_empty() {
        reason.clone()
    } else {
        message
    };
    Err(Error::Api {
        status: status.as_u16(),
        reason,
        message,
    })
}
