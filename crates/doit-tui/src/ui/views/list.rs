use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use doit_core::TodoStatusFilter;

use crate::app::{App, AppState};
use crate::ui::styles;
use crate::utils::truncate_string;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search filter
            Constraint::Min(5),    // Todo list
            Constraint::Length(1), // Pagination
        ])
        .split(area);

    render_search_filter(frame, app, chunks[0]);
    render_todo_list(frame, app, chunks[1]);
    render_pagination(frame, app, chunks[2]);
}

fn render_search_filter(frame: &mut Frame, app: &App, area: Rect) {
    let searching = app.state == AppState::Searching;
    let filter = &app.query.filter;

    let mut spans = vec![Span::styled(" Search: ", styles::muted_style())];
    if filter.search_todo.is_empty() && !searching {
        spans.push(Span::styled("[/] to search", styles::muted_style()));
    } else {
        spans.push(Span::styled(filter.search_todo.clone(), styles::search_style()));
        if searching {
            spans.push(Span::styled("▌", styles::search_style()));
        }
    }

    spans.push(Span::raw("    "));
    spans.push(Span::styled("[f] ", styles::muted_style()));
    for (i, status) in [
        TodoStatusFilter::All,
        TodoStatusFilter::Completed,
        TodoStatusFilter::Pending,
    ]
    .iter()
    .enumerate()
    {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        spans.push(Span::styled(
            status.title(),
            styles::filter_style(*status == filter.status_filter),
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(searching));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_todo_list(frame: &mut Frame, app: &App, area: Rect) {
    let page = app.current_page();
    let width = area.width.saturating_sub(14) as usize;

    let items: Vec<ListItem> = page
        .items
        .iter()
        .enumerate()
        .map(|(i, todo)| {
            let style = if i == app.selection {
                styles::selected_style()
            } else if todo.completed {
                styles::completed_item_style()
            } else {
                styles::list_item_style()
            };

            let line = Line::from(vec![
                Span::raw(format!(" {} ", todo.checkbox())),
                Span::styled(format!("#{:<5} ", todo.id), styles::muted_style()),
                Span::raw(truncate_string(&todo.todo, width)),
            ]);
            ListItem::new(line).style(style)
        })
        .collect();

    let title = if app.query.filter.is_active() {
        format!(" Todos ({} of {}) ", page.total_matches, app.todos.len())
    } else {
        format!(" Todos ({}) ", app.todos.len())
    };
    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(app.state == AppState::Normal));

    if items.is_empty() {
        let message = if app.loading {
            "Loading todos..."
        } else if app.todos.is_empty() {
            "No todos yet. Press [u] to refresh or [a] to add one."
        } else {
            "No todos match the current filter."
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(
            format!(" {}", message),
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let list = List::new(items).block(block);
    let mut state = ListState::default();
    state.select(Some(app.selection));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_pagination(frame: &mut Frame, app: &App, area: Rect) {
    let page = app.current_page();
    let prev = if page.has_prev() { "◀ [p]rev" } else { "        " };
    let next = if page.has_next() { "[n]ext ▶" } else { "        " };

    let line = Line::from(vec![
        Span::styled(format!(" {} ", prev), styles::help_key_style()),
        Span::styled(
            format!(" Page {} of {} ", page.current_page, page.total_pages),
            styles::muted_style(),
        ),
        Span::styled(format!(" {}", next), styles::help_key_style()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
