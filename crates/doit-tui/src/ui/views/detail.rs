use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

/// Detail view for `/todos/:id`; `id` comes from the route.
pub fn render(frame: &mut Frame, app: &App, id: i64, area: Rect) {
    let block = Block::default()
        .title(format!(" Todo #{} ", id))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let Some(todo) = app.detail() else {
        let line = match app.detail_error {
            Some(ref error) => Line::from(vec![
                Span::styled(format!(" Todo #{} {}", id, error), styles::error_style()),
                Span::styled("   [Esc] back", styles::muted_style()),
            ]),
            None => Line::from(Span::styled(" Loading todo...", styles::muted_style())),
        };
        let paragraph = Paragraph::new(line).block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let status_style = if todo.completed {
        styles::success_style()
    } else {
        styles::highlight_style()
    };

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Todo:    ", styles::highlight_style()),
            Span::styled(todo.todo.clone(), styles::list_item_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Status:  ", styles::highlight_style()),
            Span::styled(
                format!("{} {}", todo.checkbox(), todo.status_label()),
                status_style,
            ),
        ]),
        Line::from(vec![
            Span::styled("  Owner:   ", styles::highlight_style()),
            Span::raw(todo.owner_display()),
        ]),
        Line::from(vec![
            Span::styled("  ID:      ", styles::highlight_style()),
            Span::raw(todo.id.to_string()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  [e]", styles::help_key_style()),
            Span::styled(" edit   ", styles::muted_style()),
            Span::styled("[Space]", styles::help_key_style()),
            Span::styled(" toggle done   ", styles::muted_style()),
            Span::styled("[Esc]", styles::help_key_style()),
            Span::styled(" back", styles::muted_style()),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
