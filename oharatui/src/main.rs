#![allow(clippy::multiple_crate_versions)]

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ohara::{OharaClient, Session};
use oharaconfig::{OharaConfig, StoredSession};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use tokio::runtime::Runtime;

mod app;
mod handlers;
mod pagination;
mod state;
mod ui;

use app::App;
use state::{Screen, StatusKind, TICK_RATE};

fn main() -> Result<()> {
    let config = OharaConfig::load().with_context(|| "Failed to load ohara config")?;
    let runtime = Runtime::new().with_context(|| "Failed to start async runtime")?;

    let client = OharaClient::new().with_base_url(config.api_base_url.clone());
    let mut session = Session::new(client);
    let stored = StoredSession::load().unwrap_or_default();
    let mut restore_error = None;
    if let Some((token, expires_at)) = stored.active() {
        match runtime.block_on(session.restore(token.to_string(), expires_at)) {
            Ok(Some(_)) => {}
            Ok(None) => {
                let _ = StoredSession::clear();
            }
            Err(err) => restore_error = Some(err.to_string()),
        }
    }

    let mut app = App::new(config, session);
    if let Some(message) = restore_error {
        app.set_status(StatusKind::Error, message);
    }
    if app.screen == Screen::Dashboard && app.config.tui.refresh_on_start {
        if let Err(err) = app.refresh(&runtime) {
            app.set_status(StatusKind::Error, err.to_string());
        }
    }

    enable_raw_mode().with_context(|| "Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).with_context(|| "Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, &runtime);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    runtime: &Runtime,
) -> Result<()> {
    loop {
        app.poll_session(runtime);
        app.clear_expired_status();
        terminal.draw(|f| ui::render_app(f, app))?;
        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handlers::handle_key(app, key, runtime) {
                    return Ok(());
                }
            }
        }
    }
}
