//! Keyboard event handlers.

use crate::app::App;
use crate::state::{AuthMode, DashInput, Screen, StatusKind};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::runtime::Runtime;

/// Handle a key event, returns true if the app should exit.
pub fn handle_key(app: &mut App, key: KeyEvent, runtime: &Runtime) -> bool {
    match app.screen {
        Screen::Auth => handle_auth_key(app, key, runtime),
        Screen::Dashboard => handle_dashboard_key(app, key, runtime),
    }
}

fn handle_auth_key(app: &mut App, key: KeyEvent, runtime: &Runtime) -> bool {
    match key.code {
        KeyCode::Esc => return true,
        KeyCode::Tab => app.auth.toggle_mode(),
        KeyCode::Up => app.auth.move_focus(-1),
        KeyCode::Down => app.auth.move_focus(1),
        KeyCode::Enter => match app.auth.mode {
            AuthMode::Login => app.submit_login(runtime),
            AuthMode::Register => app.submit_register(runtime),
        },
        KeyCode::Backspace => {
            app.auth.focused_buffer_mut().pop();
        }
        KeyCode::Char(c) => {
            if !key.modifiers.contains(KeyModifiers::CONTROL) {
                app.auth.focused_buffer_mut().push(c);
            }
        }
        _ => {}
    }
    false
}

fn handle_dashboard_key(app: &mut App, key: KeyEvent, runtime: &Runtime) -> bool {
    match &mut app.input {
        DashInput::Normal => match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('r') => {
                if let Err(err) = app.refresh(runtime) {
                    app.set_status(StatusKind::Error, err.to_string());
                } else {
                    app.set_status(StatusKind::Info, "Library refreshed".to_string());
                }
            }
            KeyCode::Char('j') | KeyCode::Down => app.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => app.move_selection(-1),
            KeyCode::Char('h') | KeyCode::Left => app.prev_page(runtime),
            KeyCode::Char('l') | KeyCode::Right => app.next_page(runtime),
            KeyCode::Char('/') => app.enter_search(),
            KeyCode::Char('c') => app.cycle_category(runtime),
            KeyCode::Char('L') => app.logout(runtime),
            _ => {}
        },
        DashInput::Search { buffer } => match key.code {
            KeyCode::Esc => app.cancel_search(),
            KeyCode::Enter => {
                let next = buffer.clone();
                app.apply_search(next, runtime);
            }
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(c) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL) {
                    buffer.push(c);
                }
            }
            _ => {}
        },
    }
    false
}
