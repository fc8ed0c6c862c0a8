//! UI rendering functions.

use crate::app::App;
use crate::pagination::{page_window, PageItem};
use crate::state::{AuthMode, DashInput, Screen, StatusKind, StatusMessage, CATEGORY_FILTERS};
use oharaconfig::{format_last_opened, format_time_left};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use unicode_width::UnicodeWidthStr;

/// Render the application based on current screen.
pub fn render_app(f: &mut ratatui::Frame, app: &mut App) {
    match app.screen {
        Screen::Auth => render_auth(f, app),
        Screen::Dashboard => render_dashboard(f, app),
    }
}

fn render_auth(f: &mut ratatui::Frame, app: &App) {
    let size = f.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(2)])
        .split(size);

    let block = Block::default()
        .title_top("ohara")
        .title_top(Line::from("[Esc] quit").right_aligned())
        .borders(Borders::ALL);
    let inner = block.inner(layout[0]);
    f.render_widget(block, layout[0]);

    let fields = app.auth.fields();
    let height = u16::try_from(fields.len()).unwrap_or(5) + 6;
    let form_area = centered_rect(46, height, inner);

    let mut lines = vec![
        Line::from("Your digital library, wherever you read.").centered(),
        Line::from(""),
        tabs_line(app.auth.mode),
        Line::from(""),
    ];
    for (idx, field) in fields.iter().enumerate() {
        let value = app.auth.buffer(*field);
        let shown = if field.masked() {
            "\u{2022}".repeat(value.chars().count())
        } else {
            value.clone()
        };
        let focused = idx == app.auth.focus.min(fields.len() - 1);
        let marker = if focused { "> " } else { "  " };
        let style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{:<12}", field.label()), style),
            Span::styled(shown, style),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from("[Tab] switch form  [Enter] submit").centered());

    f.render_widget(Paragraph::new(lines), form_area);

    // Cursor at the end of the focused field's value.
    let focus = app.auth.focus.min(fields.len() - 1);
    let value = app.auth.buffer(fields[focus]);
    let value_width = if fields[focus].masked() {
        value.chars().count()
    } else {
        value.width()
    };
    let x = form_area
        .x
        .saturating_add(14)
        .saturating_add(u16::try_from(value_width).unwrap_or(0));
    let y = form_area.y + 4 + u16::try_from(focus).unwrap_or(0);
    f.set_cursor_position(Position::new(x, y));

    render_status_line(f, app.status.as_ref(), layout[1]);
}

fn tabs_line(mode: AuthMode) -> Line<'static> {
    let active = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let inactive = Style::default().add_modifier(Modifier::DIM);
    let (login, register) = match mode {
        AuthMode::Login => (active, inactive),
        AuthMode::Register => (inactive, active),
    };
    Line::from(vec![
        Span::styled("  Login  ", login),
        Span::raw(" "),
        Span::styled("  Register  ", register),
    ])
    .centered()
}

fn render_dashboard(f: &mut ratatui::Frame, app: &mut App) {
    let size = f.area();
    let shelf_height = u16::try_from(app.config.display.shelf_page_size)
        .unwrap_or(3)
        .saturating_add(2);
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(shelf_height),
            Constraint::Min(5),
            Constraint::Length(2),
        ])
        .split(size);

    render_stats(f, app, layout[0]);
    render_shelf(f, app, layout[1]);
    render_catalog(f, app, layout[2]);
    render_footer(f, app, layout[3]);
}

fn render_stats(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let welcome = app.session.user().map_or_else(String::new, |user| {
        format!("Welcome back, {}!", user.display_name())
    });
    let block = Block::default()
        .title_top("My Library Dashboard")
        .title_top(Line::from(welcome).right_aligned())
        .borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let line = match app.stats() {
        Some((total, reading, recent)) => format!(
            "Books in collection: {total}   Currently reading: {reading}   Read this month: {recent}"
        ),
        None => "Log in to see your collection stats".to_string(),
    };
    f.render_widget(Paragraph::new(line), inner);
}

fn render_shelf(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title_top("Continue Reading")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(shelf) = &app.shelf else {
        let empty = Paragraph::new("Log in to pick up where you left off")
            .alignment(Alignment::Center);
        f.render_widget(empty, inner);
        return;
    };

    if shelf.data.is_empty() {
        let empty = Paragraph::new("You have no books in your collection yet.")
            .alignment(Alignment::Center);
        f.render_widget(empty, inner);
        return;
    }

    let lines: Vec<Line> = shelf
        .data
        .iter()
        .map(|book| {
            Line::from(vec![
                Span::styled(
                    format!("{:<32}", truncate(&book.title, 30)),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("{:<24}", truncate(&book.author, 22))),
                Span::styled(
                    progress_bar(book.progress, 10),
                    Style::default().fg(Color::Green),
                ),
                Span::raw(format!(
                    " {:>3}% \u{b7} {}",
                    book.progress,
                    format_time_left(book.progress)
                )),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn render_catalog(f: &mut ratatui::Frame, app: &mut App, area: Rect) {
    let filter_label = if app.filter.is_empty() {
        CATEGORY_FILTERS[0].to_string()
    } else {
        format!("filter: {}", app.filter)
    };
    let block = Block::default()
        .title_top("Book Library")
        .title_top(Line::from(filter_label).right_aligned())
        .borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(catalog) = &app.catalog else {
        let empty = Paragraph::new("Press [r] to load the catalog").alignment(Alignment::Center);
        f.render_widget(empty, inner);
        return;
    };

    if catalog.data.is_empty() {
        let empty = Paragraph::new("No books found matching your criteria")
            .alignment(Alignment::Center);
        f.render_widget(empty, inner);
        return;
    }

    let header = Row::new(vec![
        Cell::from("TITLE"),
        Cell::from("AUTHOR"),
        Cell::from("CATEGORY"),
        Cell::from("LAST OPENED"),
        Cell::from("PROGRESS"),
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = catalog
        .data
        .iter()
        .map(|book| {
            Row::new(vec![
                Cell::from(book.title.clone()),
                Cell::from(book.author.clone()),
                Cell::from(book.category.clone()),
                Cell::from(format_last_opened(book.last_opened)),
                Cell::from(format!(
                    "{} {:>3}%",
                    progress_bar(book.progress, 8),
                    book.progress
                )),
            ])
            .style(Style::default().fg(category_color(&book.category)))
        })
        .collect();

    let widths = vec![
        Constraint::Min(28),
        Constraint::Length(22),
        Constraint::Length(18),
        Constraint::Length(14),
        Constraint::Length(14),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let available = inner.height.saturating_sub(1) as usize;
    ensure_table_state_visible(&mut app.catalog_state, available);
    f.render_stateful_widget(table, inner, &mut app.catalog_state);
}

fn render_footer(f: &mut ratatui::Frame, app: &App, area: Rect) {
    f.render_widget(Paragraph::new(pagination_line(app)), area);

    let second = Rect::new(area.x, area.y.saturating_add(1), area.width, 1);
    if let DashInput::Search { buffer } = &app.input {
        let prompt = format!("Search: {buffer}");
        f.render_widget(Paragraph::new(prompt.clone()), second);
        let x = area
            .x
            .saturating_add(u16::try_from(prompt.width()).unwrap_or(0));
        f.set_cursor_position(Position::new(x, second.y));
    } else if let Some(status) = &app.status {
        f.render_widget(
            Paragraph::new(status.text.clone()).style(status_style(status.kind)),
            second,
        );
    } else {
        let hints = "[/] search  [c] category  [\u{2190}\u{2192}] page  [j/k] move  [r]efresh  [L]ogout  [q]uit";
        f.render_widget(
            Paragraph::new(hints).style(Style::default().add_modifier(Modifier::DIM)),
            second,
        );
    }
}

fn pagination_line(app: &App) -> Line<'static> {
    let total = app.total_pages();
    let Some(catalog) = &app.catalog else {
        return Line::from("");
    };
    let mut spans = vec![Span::raw("\u{25c0} ")];
    for item in page_window(app.page, total) {
        match item {
            PageItem::Page(page) => {
                let label = format!(" {page} ");
                if page == app.page {
                    spans.push(Span::styled(
                        label,
                        Style::default()
                            .add_modifier(Modifier::REVERSED | Modifier::BOLD),
                    ));
                } else {
                    spans.push(Span::raw(label));
                }
            }
            PageItem::Ellipsis => spans.push(Span::raw(" \u{2026} ")),
        }
    }
    spans.push(Span::raw("\u{25b6}"));
    spans.push(Span::styled(
        format!("   {} books", catalog.meta.total_items),
        Style::default().add_modifier(Modifier::DIM),
    ));
    Line::from(spans)
}

fn render_status_line(f: &mut ratatui::Frame, status: Option<&StatusMessage>, area: Rect) {
    if let Some(status) = status {
        f.render_widget(
            Paragraph::new(status.text.clone()).style(status_style(status.kind)),
            area,
        );
    }
}

fn status_style(kind: StatusKind) -> Style {
    match kind {
        StatusKind::Info => Style::default().fg(Color::Cyan),
        StatusKind::Success => Style::default().fg(Color::Green),
        StatusKind::Error => Style::default().fg(Color::Red),
    }
}

fn category_color(category: &str) -> Color {
    match category {
        "Fiction" => Color::Green,
        "Non-Fiction" => Color::Blue,
        "Self-Help" => Color::Magenta,
        "Memoir" => Color::Yellow,
        _ => Color::White,
    }
}

fn progress_bar(progress: i32, width: usize) -> String {
    let clamped = progress.clamp(0, 100);
    let filled = (clamped as usize * width) / 100;
    format!(
        "{}{}",
        "\u{2588}".repeat(filled),
        "\u{2591}".repeat(width - filled)
    )
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}\u{2026}")
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

fn ensure_table_state_visible(state: &mut TableState, height: usize) {
    let Some(selected) = state.selected() else {
        return;
    };
    let offset = state.offset();
    if selected < offset {
        *state.offset_mut() = selected;
    } else if height > 0 && selected >= offset + height {
        *state.offset_mut() = selected + 1 - height;
    }
}

#[cfg(test)]
mod tests {
    use super::{progress_bar, truncate};

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(0, 4), "\u{2591}\u{2591}\u{2591}\u{2591}");
        assert_eq!(progress_bar(100, 4), "\u{2588}\u{2588}\u{2588}\u{2588}");
        assert_eq!(progress_bar(50, 4), "\u{2588}\u{2588}\u{2591}\u{2591}");
        // Out-of-range server values are clamped for display only.
        assert_eq!(progress_bar(250, 4), "\u{2588}\u{2588}\u{2588}\u{2588}");
        assert_eq!(progress_bar(-5, 4), "\u{2591}\u{2591}\u{2591}\u{2591}");
    }

    #[test]
    fn truncate_marks_long_titles() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long title", 8), "a very \u{2026}");
    }
}
