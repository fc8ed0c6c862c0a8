//! State types for the TUI application.

use ohara::types::{InsertUser, LoginUser};
use std::time::{Duration, Instant};

pub const STATUS_TTL: Duration = Duration::from_secs(4);
pub const TICK_RATE: Duration = Duration::from_millis(200);

/// Category shortcuts offered by the dashboard filter, cycled in order.
/// The first entry clears the filter.
pub const CATEGORY_FILTERS: &[&str] = &[
    "All Books",
    "Fiction",
    "Non-Fiction",
    "Science",
    "Self-Help",
    "Fantasy",
];

/// The current screen being displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Auth,
    Dashboard,
}

/// Input mode for the dashboard screen.
#[derive(Debug)]
pub enum DashInput {
    Normal,
    Search { buffer: String },
}

/// Which half of the auth form pair is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

/// Fields of the auth forms, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Username,
    Password,
    Email,
    FirstName,
    LastName,
}

impl AuthField {
    pub const LOGIN: [Self; 2] = [Self::Username, Self::Password];
    pub const REGISTER: [Self; 5] = [
        Self::Username,
        Self::Password,
        Self::Email,
        Self::FirstName,
        Self::LastName,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Username => "Username",
            Self::Password => "Password",
            Self::Email => "Email",
            Self::FirstName => "First name",
            Self::LastName => "Last name",
        }
    }

    /// Whether the field's buffer is rendered masked.
    pub const fn masked(self) -> bool {
        matches!(self, Self::Password)
    }
}

/// The login/register form pair. Buffers survive a mode switch so a freshly
/// registered user does not retype their username.
#[derive(Debug, Default)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub focus: usize,
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl AuthForm {
    pub fn fields(&self) -> &'static [AuthField] {
        match self.mode {
            AuthMode::Login => &AuthField::LOGIN,
            AuthMode::Register => &AuthField::REGISTER,
        }
    }

    pub fn focused(&self) -> AuthField {
        let fields = self.fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    pub fn buffer(&self, field: AuthField) -> &String {
        match field {
            AuthField::Username => &self.username,
            AuthField::Password => &self.password,
            AuthField::Email => &self.email,
            AuthField::FirstName => &self.first_name,
            AuthField::LastName => &self.last_name,
        }
    }

    pub fn focused_buffer_mut(&mut self) -> &mut String {
        match self.focused() {
            AuthField::Username => &mut self.username,
            AuthField::Password => &mut self.password,
            AuthField::Email => &mut self.email,
            AuthField::FirstName => &mut self.first_name,
            AuthField::LastName => &mut self.last_name,
        }
    }

    pub fn move_focus(&mut self, delta: i32) {
        let max = self.fields().len().saturating_sub(1);
        self.focus = clamp_index(self.focus, delta, max);
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
        self.focus = 0;
    }

    /// Switches to the login form, e.g. after a successful registration.
    pub fn switch_to_login(&mut self) {
        self.mode = AuthMode::Login;
        self.focus = 0;
    }

    pub fn clear_password(&mut self) {
        self.password.clear();
    }

    pub fn login_user(&self) -> LoginUser {
        LoginUser {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        }
    }

    pub fn insert_user(&self) -> InsertUser {
        InsertUser {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
            email: self.email.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
        }
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// A status message with expiration tracking.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
    pub created: Instant,
}

/// Clamp an index after applying a delta.
pub fn clamp_index(current: usize, delta: i32, max: usize) -> usize {
    let current = isize::try_from(current).unwrap_or(0);
    let max = isize::try_from(max).unwrap_or(0);
    let delta = isize::try_from(delta).unwrap_or(0);
    let next = (current + delta).clamp(0, max);
    usize::try_from(next).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{AuthField, AuthForm, AuthMode};

    #[test]
    fn focus_stays_within_active_form() {
        let mut form = AuthForm::default();
        assert_eq!(form.fields().len(), 2);
        form.move_focus(5);
        assert_eq!(form.focused(), AuthField::Password);
        form.move_focus(-5);
        assert_eq!(form.focused(), AuthField::Username);

        form.toggle_mode();
        assert_eq!(form.mode, AuthMode::Register);
        form.move_focus(10);
        assert_eq!(form.focused(), AuthField::LastName);

        // Shrinking back to the login form clamps a stale focus index.
        form.toggle_mode();
        assert_eq!(form.focused(), AuthField::Username);
    }

    #[test]
    fn buffers_survive_mode_switch() {
        let mut form = AuthForm::default();
        form.username.push_str("casey");
        form.toggle_mode();
        form.toggle_mode();
        assert_eq!(form.login_user().username, "casey");
    }
}
