#![allow(clippy::multiple_crate_versions)]

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

pub const APP_NAME: &str = "ohara";

const SESSION_FILE: &str = "session";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Page size for the global catalog table
    #[serde(default = "default_catalog_page_size")]
    pub catalog_page_size: u32,
    /// Page size for the "continue reading" shelf
    #[serde(default = "default_shelf_page_size")]
    pub shelf_page_size: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            catalog_page_size: default_catalog_page_size(),
            shelf_page_size: default_shelf_page_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuiConfig {
    #[serde(default = "default_true")]
    pub refresh_on_start: bool,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            refresh_on_start: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OharaConfig {
    /// Base URL of the Ohara API server
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub tui: TuiConfig,
}

impl Default for OharaConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            display: DisplayConfig::default(),
            tui: TuiConfig::default(),
        }
    }
}

fn default_api_base_url() -> String {
    "http://localhost:4125".to_string()
}

const fn default_catalog_page_size() -> u32 {
    5
}

const fn default_shelf_page_size() -> u32 {
    3
}

const fn default_true() -> bool {
    true
}

#[derive(Debug, thiserror::Error)]
pub enum OharaConfigError {
    #[error("config error: {0}")]
    Confy(#[from] confy::ConfyError),
}

pub type Result<T> = std::result::Result<T, OharaConfigError>;

impl OharaConfig {
    /// Loads the config file from the standard OS location.
    ///
    /// # Errors
    /// Returns an error if the config file cannot be read or deserialized.
    pub fn load() -> Result<Self> {
        Ok(confy::load(APP_NAME, None)?)
    }

    /// Stores the config to the standard OS location.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn store(&self) -> Result<()> {
        confy::store(APP_NAME, None, self)?;
        Ok(())
    }
}

/// The persisted session: the bearer token plus the expiry decoded from it at
/// login time. The decoded expiry is the single source of truth for session
/// lifetime; an entry is ignored once it has lapsed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub expires_at: Option<OffsetDateTime>,
}

impl StoredSession {
    /// Loads the stored session from the standard OS location.
    ///
    /// # Errors
    /// Returns an error if the session file cannot be read or deserialized.
    pub fn load() -> Result<Self> {
        Ok(confy::load(APP_NAME, Some(SESSION_FILE))?)
    }

    /// Persists a token and its expiry.
    ///
    /// # Errors
    /// Returns an error if the session file cannot be written.
    pub fn save(token: &str, expires_at: OffsetDateTime) -> Result<()> {
        let session = Self {
            token: Some(token.to_string()),
            expires_at: Some(expires_at),
        };
        confy::store(APP_NAME, Some(SESSION_FILE), session)?;
        Ok(())
    }

    /// Clears the persisted session.
    ///
    /// # Errors
    /// Returns an error if the session file cannot be written.
    pub fn clear() -> Result<()> {
        confy::store(APP_NAME, Some(SESSION_FILE), Self::default())?;
        Ok(())
    }

    /// The stored token and expiry, when present and not yet lapsed.
    #[must_use]
    pub fn active(&self) -> Option<(&str, OffsetDateTime)> {
        let token = self.token.as_deref().filter(|token| !token.is_empty())?;
        let expires_at = self.expires_at?;
        if expires_at <= OffsetDateTime::now_utc() {
            return None;
        }
        Some((token, expires_at))
    }
}

const TIMESTAMP_FORMAT: &[time::format_description::FormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

/// Formats a timestamp in the local offset when it can be determined, UTC
/// otherwise.
#[must_use]
pub fn format_timestamp(timestamp: OffsetDateTime) -> String {
    let local = UtcOffset::current_local_offset()
        .map_or(timestamp, |offset| timestamp.to_offset(offset));
    local
        .format(TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| local.to_string())
}

/// Renders a "last opened" instant relative to now: Today, Yesterday, N days
/// ago, and so on. `None` renders as "N/A".
#[must_use]
pub fn format_last_opened(last_opened: Option<OffsetDateTime>) -> String {
    let Some(opened) = last_opened else {
        return "N/A".to_string();
    };
    let days = (OffsetDateTime::now_utc() - opened).whole_days();
    if days < 0 {
        return format_timestamp(opened);
    }
    match days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{days} days ago"),
        7..=29 => {
            let weeks = days / 7;
            format!("{} {} ago", weeks, if weeks == 1 { "week" } else { "weeks" })
        }
        30..=364 => {
            let months = days / 30;
            format!(
                "{} {} ago",
                months,
                if months == 1 { "month" } else { "months" }
            )
        }
        _ => {
            let years = days / 365;
            format!("{} {} ago", years, if years == 1 { "year" } else { "years" })
        }
    }
}

/// Buckets the remaining reading time from a progress percentage.
#[must_use]
pub fn format_time_left(progress: i32) -> String {
    if progress >= 100 {
        return "Completed".to_string();
    }
    let remaining = 100 - progress;
    let label = if remaining <= 10 {
        "Less than 30 min"
    } else if remaining <= 30 {
        "1-2 hours"
    } else if remaining <= 50 {
        "2-3 hours"
    } else if remaining <= 70 {
        "3-5 hours"
    } else {
        "5+ hours"
    };
    label.to_string()
}

#[cfg(test)]
mod tests {
    use super::{
        format_last_opened, format_time_left, OharaConfig, StoredSession,
    };
    use time::{Duration, OffsetDateTime};

    #[test]
    fn defaults() {
        let config = OharaConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:4125");
        assert_eq!(config.display.catalog_page_size, 5);
        assert_eq!(config.display.shelf_page_size, 3);
        assert!(config.tui.refresh_on_start);
    }

    #[test]
    fn active_requires_unexpired_token() {
        let now = OffsetDateTime::now_utc();
        let live = StoredSession {
            token: Some("tok".to_string()),
            expires_at: Some(now + Duration::hours(1)),
        };
        assert!(live.active().is_some());

        let lapsed = StoredSession {
            token: Some("tok".to_string()),
            expires_at: Some(now - Duration::hours(1)),
        };
        assert!(lapsed.active().is_none());

        let empty = StoredSession {
            token: Some(String::new()),
            expires_at: Some(now + Duration::hours(1)),
        };
        assert!(empty.active().is_none());
        assert!(StoredSession::default().active().is_none());
    }

    #[test]
    fn relative_last_opened() {
        let now = OffsetDateTime::now_utc();
        assert_eq!(format_last_opened(None), "N/A");
        assert_eq!(format_last_opened(Some(now - Duration::hours(2))), "Today");
        assert_eq!(
            format_last_opened(Some(now - Duration::days(1))),
            "Yesterday"
        );
        assert_eq!(
            format_last_opened(Some(now - Duration::days(3))),
            "3 days ago"
        );
        assert_eq!(
            format_last_opened(Some(now - Duration::days(7))),
            "1 week ago"
        );
        assert_eq!(
            format_last_opened(Some(now - Duration::days(65))),
            "2 months ago"
        );
        assert_eq!(
            format_last_opened(Some(now - Duration::days(800))),
            "2 years ago"
        );
    }

    #[test]
    fn time_left_buckets() {
        assert_eq!(format_time_left(100), "Completed");
        assert_eq!(format_time_left(120), "Completed");
        assert_eq!(format_time_left(95), "Less than 30 min");
        assert_eq!(format_time_left(75), "1-2 hours");
        assert_eq!(format_time_left(55), "2-3 hours");
        assert_eq!(format_time_left(35), "3-5 hours");
        assert_eq!(format_time_left(0), "5+ hours");
    }
}
