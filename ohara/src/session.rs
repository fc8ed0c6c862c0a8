//! Auth session controller.
//!
//! A [`Session`] owns the API client and all mutable auth state: the bearer
//! token, the cached current user, and the auto-logout timer. Front-ends hold
//! exactly one and drive every transition through it; there is no ambient
//! auth state.

use crate::types::{CurrentUser, InsertUser, LoginUser};
use crate::{Error, OharaClient};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use time::{Duration, OffsetDateTime};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use validator::Validate;

/// Fallback session lifetime for tokens whose payload carries no `exp` claim.
pub const SESSION_MAX_AGE: Duration = Duration::seconds(86_400);

/// Events emitted by the session outside the caller's own transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The armed expiry timer fired; the owner should force a logout and tell
    /// the user their session lapsed.
    Expired,
}

/// The `exp` claim is all the client reads from the token payload; the
/// signature is the server's concern.
#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    exp: Option<i64>,
}

/// Client-side session state machine: anonymous or authenticated, with an
/// armed one-shot timer while a token with a known expiry is held.
pub struct Session {
    client: OharaClient,
    user: Option<CurrentUser>,
    expires_at: Option<OffsetDateTime>,
    expiry_task: Option<JoinHandle<()>>,
    events_tx: UnboundedSender<SessionEvent>,
    events_rx: UnboundedReceiver<SessionEvent>,
}

impl Session {
    /// Creates an anonymous session around the given client.
    #[must_use]
    pub fn new(client: OharaClient) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            client,
            user: None,
            expires_at: None,
            expiry_task: None,
            events_tx,
            events_rx,
        }
    }

    /// The underlying client, for read-only queries.
    #[must_use]
    pub const fn client(&self) -> &OharaClient {
        &self.client
    }

    /// The cached current user, when authenticated.
    #[must_use]
    pub const fn user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    /// The session token currently attached to the client.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.client.token()
    }

    /// When the held token expires.
    #[must_use]
    pub const fn expires_at(&self) -> Option<OffsetDateTime> {
        self.expires_at
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Validates and submits credentials. On success the token is stored and
    /// the expiry timer armed before the current user is fetched, so a caller
    /// that renders right after `login` resolves never sees a stale anonymous
    /// state. On failure the session stays anonymous and the server's message
    /// is returned for display.
    ///
    /// # Errors
    /// Returns an error if validation fails, the HTTP request fails, or the
    /// token cannot be decoded.
    pub async fn login(&mut self, credentials: &LoginUser) -> Result<CurrentUser, Error> {
        credentials.validate()?;
        let response = self.client.login(credentials).await?;
        let expires_at = token_expiry(&response.token)?;
        self.client.set_token(Some(response.token));
        self.arm_expiry_timer(expires_at);
        self.expires_at = Some(expires_at);
        match self.client.current_user().await {
            Ok(Some(user)) => {
                self.user = Some(user.clone());
                Ok(user)
            }
            Ok(None) => {
                self.reset();
                Err(Error::Token(
                    "server rejected the freshly issued token".to_string(),
                ))
            }
            Err(err) => {
                self.reset();
                Err(err)
            }
        }
    }

    /// Validates and submits a registration. A successful registration does
    /// not log the user in; callers switch to the login view.
    ///
    /// # Errors
    /// Returns an error if validation fails or the HTTP request fails.
    pub async fn register(&mut self, new_user: &InsertUser) -> Result<CurrentUser, Error> {
        new_user.validate()?;
        self.client.register(new_user).await
    }

    /// Ends the session. The server is told best-effort; local state (token,
    /// cached user, armed timer) is cleared unconditionally, and any server
    /// error is still returned for display.
    ///
    /// # Errors
    /// Returns an error if the logout request fails. The session is anonymous
    /// afterwards either way.
    pub async fn logout(&mut self) -> Result<(), Error> {
        let result = if self.client.token().is_some() {
            self.client.logout().await
        } else {
            Ok(())
        };
        self.reset();
        // Drop any expiry event that raced with the explicit logout.
        while self.events_rx.try_recv().is_ok() {}
        result
    }

    /// Adopts a previously stored token. An already-lapsed token is discarded
    /// without a request; an unexpired one is attached, its timer armed, and
    /// the current user fetched. `Ok(None)` means the session stays anonymous
    /// (token lapsed or no longer accepted).
    ///
    /// # Errors
    /// Returns an error if the current-user request fails. The token stays
    /// attached in that case so the caller can retry.
    pub async fn restore(
        &mut self,
        token: String,
        expires_at: OffsetDateTime,
    ) -> Result<Option<CurrentUser>, Error> {
        if expires_at <= OffsetDateTime::now_utc() {
            return Ok(None);
        }
        self.client.set_token(Some(token));
        self.arm_expiry_timer(expires_at);
        self.expires_at = Some(expires_at);
        match self.client.current_user().await {
            Ok(Some(user)) => {
                self.user = Some(user.clone());
                Ok(Some(user))
            }
            Ok(None) => {
                self.reset();
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Re-fetches the current user and refreshes the cache.
    ///
    /// # Errors
    /// Returns an error if the HTTP request fails with anything but a 401.
    pub async fn refresh_user(&mut self) -> Result<Option<CurrentUser>, Error> {
        let user = self.client.current_user().await?;
        self.user.clone_from(&user);
        Ok(user)
    }

    /// Returns the next pending session event, if any. Front-ends call this
    /// from their tick loop and force a logout on [`SessionEvent::Expired`].
    pub fn poll_event(&mut self) -> Option<SessionEvent> {
        self.events_rx.try_recv().ok()
    }

    /// Arms the one-shot auto-logout timer, replacing any armed one and
    /// dropping any event it already fired, so a stale timer can never force
    /// a duplicate logout.
    fn arm_expiry_timer(&mut self, expires_at: OffsetDateTime) {
        self.cancel_expiry_timer();
        while self.events_rx.try_recv().is_ok() {}
        let delay = std::time::Duration::try_from(expires_at - OffsetDateTime::now_utc())
            .unwrap_or(std::time::Duration::ZERO);
        let events_tx = self.events_tx.clone();
        self.expiry_task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events_tx.send(SessionEvent::Expired);
        }));
    }

    fn cancel_expiry_timer(&mut self) {
        if let Some(task) = self.expiry_task.take() {
            task.abort();
        }
    }

    fn reset(&mut self) {
        self.cancel_expiry_timer();
        self.client.set_token(None);
        self.user = None;
        self.expires_at = None;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cancel_expiry_timer();
    }
}

/// Decodes the token's expiry from its payload segment. Tokens without an
/// `exp` claim get the fallback [`SESSION_MAX_AGE`] horizon from now.
fn token_expiry(token: &str) -> Result<OffsetDateTime, Error> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next()) {
        (Some(_), Some(payload)) => payload,
        _ => return Err(Error::Token("token is not a JWT".to_string())),
    };
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|err| Error::Token(err.to_string()))?;
    let claims: Claims =
        serde_json::from_slice(&bytes).map_err(|err| Error::Token(err.to_string()))?;
    match claims.exp {
        Some(exp) => {
            OffsetDateTime::from_unix_timestamp(exp).map_err(|err| Error::Token(err.to_string()))
        }
        None => Ok(OffsetDateTime::now_utc() + SESSION_MAX_AGE),
    }
}
