//! Keyboard input handling for the TUI.
//!
//! Overlays get the key first, then the search box, then the view for the
//! current route.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, ViewEvent};
use crate::router::Route;

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.state {
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            Ok(false)
        }
        AppState::ConfirmingQuit => Ok(handle_quit_confirm(app, key)),
        AppState::AddingTodo | AppState::EditingTodo => {
            handle_form_input(app, key);
            Ok(false)
        }
        AppState::Searching => {
            handle_search_input(app, key);
            Ok(false)
        }
        AppState::Quitting => Ok(true),
        AppState::Normal => {
            match app.router.current() {
                Route::Home => handle_list_input(app, key),
                Route::TodoDetail { .. } => handle_detail_input(app, key),
            }
            Ok(false)
        }
    }
}

fn handle_quit_confirm(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            app.state = AppState::Quitting;
            true
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.state = AppState::Normal;
            false
        }
        _ => false,
    }
}

fn handle_form_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.emit(ViewEvent::CloseModal),
        KeyCode::Enter => app.submit_form(),
        KeyCode::Backspace => app.pop_form_char(),
        KeyCode::Char(c) => app.push_form_char(c),
        _ => {}
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.emit(ViewEvent::UpdateSearchTodo(String::new()));
            app.state = AppState::Normal;
        }
        KeyCode::Enter | KeyCode::Down => app.state = AppState::Normal,
        KeyCode::Backspace => app.pop_search_char(),
        KeyCode::Char(c) => app.push_search_char(c),
        _ => {}
    }
}

/// Keys shared by both views
fn handle_global_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        KeyCode::Char('u') => app.refresh_background(),
        KeyCode::Char('o') => app.toggle_offline(),
        KeyCode::Char('e') => app.start_edit(),
        KeyCode::Char(' ') => app.toggle_completed(),
        _ => return false,
    }
    true
}

fn handle_list_input(app: &mut App, key: KeyEvent) {
    if handle_global_key(app, key) {
        return;
    }
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Right | KeyCode::Char('n') | KeyCode::PageDown => app.next_page(),
        KeyCode::Left | KeyCode::Char('p') | KeyCode::PageUp => app.prev_page(),
        KeyCode::Home => app.emit(ViewEvent::UpdateCurrentPage(1)),
        KeyCode::End => {
            let last = app.current_page().total_pages;
            app.emit(ViewEvent::UpdateCurrentPage(last));
        }
        KeyCode::Enter => app.open_selected(),
        KeyCode::Char('/') => app.state = AppState::Searching,
        KeyCode::Char('f') => app.cycle_status_filter(),
        KeyCode::Char('a') => app.start_add(),
        KeyCode::Esc => {
            if app.query.filter.is_active() {
                app.emit(ViewEvent::UpdateSearchTodo(String::new()));
                app.emit(ViewEvent::UpdateStatusFilter(Default::default()));
            }
        }
        _ => {}
    }
}

fn handle_detail_input(app: &mut App, key: KeyEvent) {
    if handle_global_key(app, key) {
        return;
    }
    if matches!(key.code, KeyCode::Esc | KeyCode::Backspace | KeyCode::Left) {
        app.go_back();
    }
}
