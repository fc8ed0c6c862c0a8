//! Main application state and logic.

use crate::pagination::clamp_page;
use crate::state::{
    clamp_index, AuthForm, DashInput, Screen, StatusKind, StatusMessage, CATEGORY_FILTERS,
    STATUS_TTL,
};
use ohara::types::BooksResponse;
use ohara::{Error as OharaError, Session, SessionEvent};
use oharaconfig::{OharaConfig, StoredSession};
use ratatui::widgets::TableState;
use std::time::Instant;
use time::{Duration, OffsetDateTime};
use tokio::runtime::Runtime;

/// Main application state.
pub struct App {
    pub config: OharaConfig,
    pub session: Session,
    pub screen: Screen,
    pub auth: AuthForm,
    pub input: DashInput,
    pub catalog: Option<BooksResponse>,
    pub shelf: Option<BooksResponse>,
    pub page: u32,
    pub filter: String,
    pub category: usize,
    pub catalog_state: TableState,
    pub status: Option<StatusMessage>,
}

impl App {
    pub fn new(config: OharaConfig, session: Session) -> Self {
        let screen = if session.is_authenticated() {
            Screen::Dashboard
        } else {
            Screen::Auth
        };
        Self {
            config,
            session,
            screen,
            auth: AuthForm::default(),
            input: DashInput::Normal,
            catalog: None,
            shelf: None,
            page: 1,
            filter: String::new(),
            category: 0,
            catalog_state: TableState::default(),
            status: None,
        }
    }

    pub fn set_status(&mut self, kind: StatusKind, text: String) {
        self.status = Some(StatusMessage {
            kind,
            text,
            created: Instant::now(),
        });
    }

    pub fn clear_expired_status(&mut self) {
        if let Some(status) = &self.status {
            if status.created.elapsed() > STATUS_TTL {
                self.status = None;
            }
        }
    }

    /// Refreshes both the catalog page and the continue-reading shelf.
    pub fn refresh(&mut self, runtime: &Runtime) -> Result<(), OharaError> {
        self.refresh_catalog(runtime)?;
        self.refresh_shelf(runtime)
    }

    pub fn refresh_catalog(&mut self, runtime: &Runtime) -> Result<(), OharaError> {
        let limit = self.config.display.catalog_page_size;
        let filter = (!self.filter.is_empty()).then_some(self.filter.as_str());
        let books =
            runtime.block_on(self.session.client().get_books(self.page, limit, filter))?;
        if books.data.is_empty() {
            self.catalog_state.select(None);
        } else {
            let selected = self.catalog_state.selected().unwrap_or(0);
            self.catalog_state
                .select(Some(selected.min(books.data.len() - 1)));
        }
        self.catalog = Some(books);
        Ok(())
    }

    /// Refreshes the user's books. An unauthorized answer just empties the
    /// shelf; the dashboard itself keeps working anonymously.
    pub fn refresh_shelf(&mut self, runtime: &Runtime) -> Result<(), OharaError> {
        if !self.session.is_authenticated() {
            self.shelf = None;
            return Ok(());
        }
        let limit = self.config.display.shelf_page_size;
        match runtime.block_on(self.session.client().get_user_books(1, limit)) {
            Ok(books) => {
                self.shelf = Some(books);
                Ok(())
            }
            Err(err) if err.is_status(401) => {
                self.shelf = None;
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    pub fn total_pages(&self) -> u32 {
        self.catalog
            .as_ref()
            .map_or(0, |catalog| catalog.meta.total_pages)
    }

    /// Moves to the requested page, clamped to the valid range. Out-of-range
    /// requests land on the boundary; a request for the current page is a
    /// no-op.
    pub fn set_page(&mut self, requested: i64, runtime: &Runtime) {
        let page = clamp_page(requested, self.total_pages());
        if page == self.page {
            return;
        }
        self.page = page;
        if let Err(err) = self.refresh_catalog(runtime) {
            self.set_status(StatusKind::Error, err.to_string());
        }
    }

    pub fn next_page(&mut self, runtime: &Runtime) {
        self.set_page(i64::from(self.page) + 1, runtime);
    }

    pub fn prev_page(&mut self, runtime: &Runtime) {
        self.set_page(i64::from(self.page) - 1, runtime);
    }

    pub fn move_selection(&mut self, delta: i32) {
        let Some(catalog) = &self.catalog else {
            return;
        };
        if catalog.data.is_empty() {
            return;
        }
        let selected = self.catalog_state.selected().unwrap_or(0);
        let max = catalog.data.len().saturating_sub(1);
        let next = clamp_index(selected, delta, max);
        self.catalog_state.select(Some(next));
    }

    pub fn enter_search(&mut self) {
        self.input = DashInput::Search {
            buffer: self.filter.clone(),
        };
    }

    pub fn cancel_search(&mut self) {
        self.input = DashInput::Normal;
    }

    pub fn apply_search(&mut self, buffer: String, runtime: &Runtime) {
        self.filter = buffer;
        self.category = 0;
        self.page = 1;
        self.input = DashInput::Normal;
        if let Err(err) = self.refresh_catalog(runtime) {
            self.set_status(StatusKind::Error, err.to_string());
        }
    }

    /// Cycles the category shortcut; the first entry clears the filter.
    pub fn cycle_category(&mut self, runtime: &Runtime) {
        self.category = (self.category + 1) % CATEGORY_FILTERS.len();
        self.filter = if self.category == 0 {
            String::new()
        } else {
            CATEGORY_FILTERS[self.category].to_string()
        };
        self.page = 1;
        if let Err(err) = self.refresh_catalog(runtime) {
            self.set_status(StatusKind::Error, err.to_string());
        }
    }

    pub fn submit_login(&mut self, runtime: &Runtime) {
        let credentials = self.auth.login_user();
        match runtime.block_on(self.session.login(&credentials)) {
            Ok(user) => {
                if let (Some(token), Some(expires_at)) =
                    (self.session.token(), self.session.expires_at())
                {
                    if let Err(err) = StoredSession::save(token, expires_at) {
                        self.set_status(StatusKind::Error, err.to_string());
                    }
                }
                self.auth.clear_password();
                self.screen = Screen::Dashboard;
                self.page = 1;
                if let Err(err) = self.refresh(runtime) {
                    self.set_status(StatusKind::Error, err.to_string());
                } else {
                    self.set_status(
                        StatusKind::Success,
                        format!("Welcome back, {}!", user.username),
                    );
                }
            }
            Err(err) => {
                self.set_status(StatusKind::Error, format!("Login failed: {err}"));
            }
        }
    }

    pub fn submit_register(&mut self, runtime: &Runtime) {
        let new_user = self.auth.insert_user();
        match runtime.block_on(self.session.register(&new_user)) {
            Ok(_) => {
                self.auth.clear_password();
                self.auth.switch_to_login();
                self.set_status(
                    StatusKind::Success,
                    "Registration successful. Please login with your credentials.".to_string(),
                );
            }
            Err(err) => {
                self.set_status(StatusKind::Error, format!("Registration failed: {err}"));
            }
        }
    }

    pub fn logout(&mut self, runtime: &Runtime) {
        let result = runtime.block_on(self.session.logout());
        if let Err(err) = StoredSession::clear() {
            self.set_status(StatusKind::Error, err.to_string());
        }
        self.screen = Screen::Auth;
        self.input = DashInput::Normal;
        self.shelf = None;
        self.catalog = None;
        match result {
            Ok(()) => self.set_status(
                StatusKind::Info,
                "You have been successfully logged out.".to_string(),
            ),
            Err(err) => self.set_status(StatusKind::Error, format!("Logout failed: {err}")),
        }
    }

    /// Drains session events; an expiry event forces a logout and tells the
    /// user their session lapsed.
    pub fn poll_session(&mut self, runtime: &Runtime) {
        if let Some(SessionEvent::Expired) = self.session.poll_event() {
            let _ = runtime.block_on(self.session.logout());
            let _ = StoredSession::clear();
            self.screen = Screen::Auth;
            self.input = DashInput::Normal;
            self.shelf = None;
            self.catalog = None;
            self.set_status(
                StatusKind::Error,
                "Your session has expired. Please log in again.".to_string(),
            );
        }
    }

    /// Dashboard stats from the shelf data: total books in the collection,
    /// how many are partially read, and how many were opened this month.
    pub fn stats(&self) -> Option<(u64, usize, usize)> {
        let shelf = self.shelf.as_ref()?;
        let reading = shelf.data.iter().filter(|book| book.in_progress()).count();
        let month_ago = OffsetDateTime::now_utc() - Duration::days(30);
        let recent = shelf
            .data
            .iter()
            .filter(|book| book.last_opened.is_some_and(|opened| opened > month_ago))
            .count();
        Some((shelf.meta.total_items, reading, recent))
    }
}
