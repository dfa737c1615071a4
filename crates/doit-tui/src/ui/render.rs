use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use doit_core::cache::age_display;
use doit_core::DataSource;

use crate::app::{App, AppState};
use crate::router::{Route, View};
use crate::utils::{format_timestamp, truncate_string};

use super::styles;
use super::views::{detail, list};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_main_content(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    // Overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::AddingTodo | AppState::EditingTodo => render_form_overlay(frame, app),
        _ => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  DoIt";
    let route = app.router.current();
    let path = format!("  {} {}", route.name(), route.path());
    let help_hint = "[?] Help";

    let used = title.len() + path.len() + help_hint.len() + 4;
    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::styled(path, styles::muted_style()),
        Span::raw(" ".repeat((area.width as usize).saturating_sub(used))),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    let route = app.router.current();
    match (route.view(), route) {
        (View::Detail, Route::TodoDetail { id }) => detail::render(frame, app, id, area),
        _ => list::render(frame, app, area),
    }
}

/// Left side of the status bar: where the data came from and how old it is
fn data_status(app: &App) -> String {
    let mode = if app.is_forced_offline() {
        "Offline"
    } else {
        match app.data_source {
            Some(DataSource::Network) => "Online",
            Some(DataSource::Cache) => "Cached",
            None => "No data",
        }
    };

    match app.captured_at {
        Some(at) => format!(
            "{} | synced {} ({})",
            mode,
            age_display(at, Utc::now()),
            format_timestamp(at)
        ),
        None => mode.to_string(),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.router.current() {
        Route::Home => "[a]dd | [u]pdate | [o]ffline | [q]uit",
        Route::TodoDetail { .. } => "[e]dit | [Esc] back | [q]uit",
    };
    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let left = match app.status_message {
        Some(ref msg) => msg.clone(),
        None => data_status(app),
    };
    let left_text = format!(
        " {} ",
        truncate_string(&left, width.saturating_sub(right_text.len() + 2))
    );

    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());
    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 24, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("  DoIt", styles::title_style())),
        Line::from(Span::styled(
            format!("  version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("↑/↓", "Move selection"),
        help_line("n/p ←/→", "Next/previous page"),
        help_line("Enter", "Open todo"),
        help_line("Esc", "Go back"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        help_line("/", "Search todos"),
        help_line("f", "Cycle status filter"),
        help_line("a", "Add todo"),
        help_line("e", "Edit todo"),
        help_line("Space", "Toggle completed"),
        help_line("u", "Refresh from server"),
        help_line("o", "Toggle offline mode"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_form_overlay(frame: &mut Frame, app: &App) {
    let height = if app.form_error.is_some() { 9 } else { 7 };
    let area = centered_rect_fixed(60, height, frame.area());
    frame.render_widget(Clear, area);

    let title = match app.editing {
        Some(ref todo) => format!(" Edit Todo #{} ", todo.id),
        None => " Add Todo ".to_string(),
    };

    // Show the tail of long input so the cursor stays visible
    let field_width = 50;
    let chars: Vec<char> = app.form.todo.chars().collect();
    let visible: String = chars[chars.len().saturating_sub(field_width)..]
        .iter()
        .collect();

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(" Todo: ", styles::muted_style()),
            Span::styled(format!("{}▌", visible), styles::selected_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(" [Enter]", styles::help_key_style()),
            Span::styled(" save   ", styles::muted_style()),
            Span::styled("[Esc]", styles::help_key_style()),
            Span::styled(" cancel", styles::muted_style()),
        ]),
    ];

    if let Some(ref error) = app.form_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(40, 6, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
