use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use validator::Validate;

// =============================================================================
// CATALOG TYPES - Records owned and mutated by the server
// =============================================================================

/// A book record as returned by the catalog and shelf endpoints.
/// Owned by the server; the client holds short-lived, read-only copies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Server-assigned identifier
    pub id: i64,
    /// Book title
    pub title: String,
    /// Author name
    pub author: String,
    /// Category label (e.g., "Fiction", "Self-Help")
    pub category: String,
    /// URL of the cover image, if any
    pub cover_url: Option<String>,
    /// When the reader last opened the book
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub last_opened: Option<OffsetDateTime>,
    /// Reading progress as a percentage in [0, 100]; reported by the server
    /// as-is, not clamped or validated locally
    #[serde(default)]
    pub progress: i32,
}

impl Book {
    /// Whether the book is partially read (strictly between 0% and 100%).
    #[must_use]
    pub const fn in_progress(&self) -> bool {
        self.progress > 0 && self.progress < 100
    }
}

/// Pagination metadata attached to every book listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// The 1-based page this response covers
    pub current_page: u32,
    /// Total number of pages for the query
    pub total_pages: u32,
    /// Total number of matching records
    pub total_items: u64,
    /// Page size the server applied
    pub items_per_page: u32,
}

/// One page of books plus its pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BooksResponse {
    pub data: Vec<Book>,
    pub meta: PageMeta,
}

// =============================================================================
// USER TYPES
// =============================================================================

/// The authenticated user's identity, as issued by the server.
/// Never carries the password.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl CurrentUser {
    /// Preferred display name: first name when present, username otherwise.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self.first_name.as_deref() {
            Some(first) if !first.is_empty() => first,
            _ => &self.username,
        }
    }
}

// =============================================================================
// FORM INPUT TYPES - Validated locally before any request is issued
// =============================================================================

/// Login credentials. Ephemeral form input; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginUser {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Registration payload. Ephemeral form input; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InsertUser {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email must be a valid address")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
}

/// Response to a successful login: the bearer token for the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Error payload shape used by the API on non-success responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
}

// =============================================================================
// SEEDING TYPES
// =============================================================================

/// A book record to be created, as posted by the seeding tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub category: String,
    pub cover_url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub last_opened: OffsetDateTime,
    pub progress: i32,
}
