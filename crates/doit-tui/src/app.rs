//! Application state management for doit.
//!
//! This module contains the `App` struct that owns UI state, the loaded
//! todos, the router, and the channel through which background fetches and
//! mutations report back to the render loop.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use doit_core::api::ApiError;
use doit_core::cache::{init_global_store, TodoCache};
use doit_core::models::{TodoFormData, TodoListQuery, TodoPage, TodoUpdate};
use doit_core::{
    ApiClient, Config, ConnectivityMonitor, DataSource, LoadedTodos, HostCheck, StoreConfig,
    Todo, TodoRepository, TodoStatusFilter,
};

use crate::router::{Route, Router};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for a todo label typed in the form.
const MAX_TODO_LENGTH: usize = 200;

/// Maximum length for the search query.
const MAX_SEARCH_LENGTH: usize = 100;

// ============================================================================
// Services
// ============================================================================

/// Network, cache and connectivity handles shared by the UI and `--dump`.
#[derive(Clone)]
pub struct Services {
    pub api: ApiClient,
    pub repo: TodoRepository,
    pub connectivity: Arc<ConnectivityMonitor>,
}

impl Services {
    pub fn new(config: &Config, forced_offline: bool) -> Result<Self> {
        let api = ApiClient::new(config).context("Failed to create API client")?;

        let cache_dir = match config.cache_dir() {
            Ok(dir) => Some(dir),
            Err(e) => {
                warn!(error = %e, "No cache directory, cached todos will not persist");
                None
            }
        };
        let store = init_global_store(&StoreConfig::default(), cache_dir.as_deref())
            .context("Failed to open todo storage")?;
        debug!(driver = store.driver().name(), "Storage ready");

        let timeout = std::time::Duration::from_millis(config.connectivity_timeout_ms);
        let check = HostCheck::for_url(config.api_base(), timeout);
        if check.is_none() {
            // Let the request itself report the bad URL
            warn!(url = %config.api_base_url, "Cannot check API host");
        }
        let connectivity = Arc::new(ConnectivityMonitor::new(check, forced_offline));

        let repo = TodoRepository::new(
            Arc::new(api.clone()),
            TodoCache::new(store),
            connectivity.clone(),
        );

        Ok(Self {
            api,
            repo,
            connectivity,
        })
    }

    /// Check the API host, then report whether requests should be sent.
    pub async fn check_online(&self) -> bool {
        self.connectivity.refresh().await
    }
}

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    AddingTodo,
    EditingTodo,
    ConfirmingQuit,
    Quitting,
}

/// Events emitted by the list view, search box and modals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    UpdateSearchTodo(String),
    UpdateStatusFilter(TodoStatusFilter),
    UpdateCurrentPage(usize),
    CloseModal,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent from spawned tasks back to the render loop.
enum TaskResult {
    /// Result of the fetch-with-cache policy
    Loaded(Result<LoadedTodos, String>),
    /// A single todo fetched for the detail view
    Detail(i64, Result<Todo, String>),
    /// A todo was created remotely
    Added(Result<Todo, String>),
    /// A todo was updated remotely (id, local update, server result)
    Updated(i64, TodoUpdate, Result<Todo, String>),
    /// A mutation was refused before any request was sent
    Refused(String),
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    pub config: Config,
    services: Services,

    // UI State
    pub state: AppState,
    pub router: Router,
    pub query: TodoListQuery,
    /// Index into the current page
    pub selection: usize,

    // Form state (add/edit modal)
    pub form: TodoFormData,
    pub form_error: Option<String>,
    /// Todo being edited; None while adding
    pub editing: Option<Todo>,

    // Data
    pub todos: Vec<Todo>,
    /// Todo fetched for a detail route that is not in `todos`
    pub detail_todo: Option<Todo>,
    /// Why the detail route's todo could not be fetched
    pub detail_error: Option<String>,
    pub data_source: Option<DataSource>,
    pub captured_at: Option<DateTime<Utc>>,
    pub loading: bool,

    // Background task channel
    task_rx: mpsc::Receiver<TaskResult>,
    task_tx: mpsc::Sender<TaskResult>,

    pub status_message: Option<String>,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config, forced_offline: bool) -> Result<Self> {
        let services = Services::new(&config, forced_offline || config.offline_mode)?;
        Ok(Self::with_services(config, services))
    }

    pub fn with_services(config: Config, services: Services) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        Self {
            config,
            services,

            state: AppState::Normal,
            router: Router::default(),
            query: TodoListQuery::default(),
            selection: 0,

            form: TodoFormData::default(),
            form_error: None,
            editing: None,

            todos: Vec::new(),
            detail_todo: None,
            detail_error: None,
            data_source: None,
            captured_at: None,
            loading: false,

            task_rx: rx,
            task_tx: tx,

            status_message: None,
        }
    }

    // =========================================================================
    // Data Loading
    // =========================================================================

    /// Show whatever is cached right away, before the first fetch completes.
    pub async fn load_from_cache(&mut self) {
        match self.services.repo.cache().load_snapshot().await {
            Ok(Some(snapshot)) => {
                debug!(count = snapshot.todos.len(), "Loaded cached todos");
                self.todos = snapshot.todos;
                self.captured_at = snapshot.captured_at;
                self.data_source = Some(DataSource::Cache);
            }
            Ok(None) => debug!("No cached todos"),
            Err(e) => warn!(error = %e, "Failed to read cached todos"),
        }
    }

    /// Spawn a background task running the fetch-with-cache policy
    pub fn refresh_background(&mut self) {
        if self.loading {
            return;
        }
        info!("Refreshing todos");
        self.loading = true;
        self.status_message = Some("Refreshing todos...".to_string());

        let services = self.services.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            services.check_online().await;
            let result = services.repo.load().await.map_err(|e| e.to_string());
            Self::send_result(&tx, TaskResult::Loaded(result)).await;
        });
    }

    /// Helper to send task results, logging any channel errors
    async fn send_result(tx: &mpsc::Sender<TaskResult>, result: TaskResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send task result - channel closed");
        }
    }

    /// Check for completed background tasks and process results
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.task_rx.try_recv() {
            self.process_task_result(result);
        }
    }

    fn process_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::Loaded(Ok(loaded)) => {
                self.loading = false;
                self.status_message = match loaded.source {
                    DataSource::Network => None,
                    DataSource::Cache => Some("Offline - showing cached todos".to_string()),
                };
                self.todos = loaded.todos;
                self.data_source = Some(loaded.source);
                self.captured_at = loaded.captured_at;
                self.clamp_selection();
            }
            TaskResult::Loaded(Err(e)) => {
                self.loading = false;
                error!(error = %e, "Failed to load todos");
                self.status_message = Some(e);
            }
            TaskResult::Detail(id, Ok(todo)) => {
                if self.router.current() == (Route::TodoDetail { id }) {
                    self.detail_todo = Some(todo);
                }
            }
            TaskResult::Detail(id, Err(e)) => {
                debug!(id, error = %e, "Failed to fetch todo detail");
                if self.router.current() == (Route::TodoDetail { id }) {
                    self.detail_error = Some(e);
                }
            }
            TaskResult::Added(Ok(todo)) => {
                info!(id = todo.id, "Todo added");
                self.status_message = Some(format!("Added todo #{}", todo.id));
                self.todos.insert(0, todo);
                self.query.current_page = 1;
                self.selection = 0;
            }
            TaskResult::Added(Err(e)) => {
                self.status_message = Some(format!("Add failed: {}", e));
            }
            TaskResult::Updated(id, update, Ok(server)) => {
                info!(id, "Todo updated");
                for todo in self.todos.iter_mut().filter(|t| t.id == id) {
                    update.apply_to(todo);
                    if todo.user_id.is_none() {
                        todo.user_id = server.user_id;
                    }
                }
                if let Some(ref mut detail) = self.detail_todo {
                    if detail.id == id {
                        update.apply_to(detail);
                    }
                }
                self.status_message = Some(format!("Saved todo #{}", id));
            }
            TaskResult::Updated(id, _, Err(e)) => {
                self.status_message = Some(format!("Update of #{} failed: {}", id, e));
            }
            TaskResult::Refused(reason) => {
                self.status_message = Some(reason);
            }
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Mutations are online-only; check connectivity inside the task so the
    /// check never blocks the render loop.
    fn spawn_mutation<F, Fut>(&mut self, busy: &str, make_result: F)
    where
        F: FnOnce(ApiClient) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = TaskResult> + Send + 'static,
    {
        let services = self.services.clone();
        let tx = self.task_tx.clone();
        self.status_message = Some(busy.to_string());
        tokio::spawn(async move {
            if !services.check_online().await {
                warn!("Mutation attempted while offline");
                let msg = "Offline - changes need a network connection".to_string();
                Self::send_result(&tx, TaskResult::Refused(msg)).await;
                return;
            }
            let result = make_result(services.api).await;
            Self::send_result(&tx, result).await;
        });
    }

    fn add_todo(&mut self, form: TodoFormData) {
        let user_id = self.config.user_id;
        self.spawn_mutation("Adding todo...", move |api| async move {
            TaskResult::Added(api.add_todo(&form, user_id).await.map_err(|e| e.to_string()))
        });
    }

    fn update_todo(&mut self, id: i64, update: TodoUpdate) {
        self.spawn_mutation("Saving todo...", move |api| async move {
            let result = api.update_todo(id, &update).await.map_err(|e| e.to_string());
            TaskResult::Updated(id, update, result)
        });
    }

    /// Flip the completion flag of the selected (or displayed) todo
    pub fn toggle_completed(&mut self) {
        if let Some(todo) = self.focused_todo() {
            let (id, completed) = (todo.id, todo.completed);
            self.update_todo(id, TodoUpdate::completed(!completed));
        }
    }

    // =========================================================================
    // Forms
    // =========================================================================

    pub fn start_add(&mut self) {
        self.form = TodoFormData::default();
        self.form_error = None;
        self.editing = None;
        self.state = AppState::AddingTodo;
    }

    pub fn start_edit(&mut self) {
        let Some(todo) = self.focused_todo().cloned() else {
            return;
        };
        self.form = TodoFormData::new(todo.todo.clone());
        self.form_error = None;
        self.editing = Some(todo);
        self.state = AppState::EditingTodo;
    }

    pub fn push_form_char(&mut self, c: char) {
        if can_add_input_char(self.form.todo.chars().count(), MAX_TODO_LENGTH, c) {
            self.form.todo.push(c);
            self.form_error = None;
        }
    }

    pub fn pop_form_char(&mut self) {
        self.form.todo.pop();
    }

    /// Validate and send the form. The modal stays open on validation errors.
    pub fn submit_form(&mut self) {
        let Some(label) = self.form.label().map(str::to_string) else {
            self.form_error = Some("Todo text is required".to_string());
            return;
        };

        match self.editing.take() {
            Some(todo) => {
                if label != todo.todo {
                    self.update_todo(todo.id, TodoUpdate::text(label));
                }
            }
            None => self.add_todo(TodoFormData::new(label)),
        }
        self.emit(ViewEvent::CloseModal);
    }

    // =========================================================================
    // View events
    // =========================================================================

    pub fn emit(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::UpdateSearchTodo(text) => {
                self.query.filter.search_todo = text;
                self.query.current_page = 1;
                self.selection = 0;
            }
            ViewEvent::UpdateStatusFilter(filter) => {
                self.query.filter.status_filter = filter;
                self.query.current_page = 1;
                self.selection = 0;
            }
            ViewEvent::UpdateCurrentPage(page) => {
                let total = self.current_page().total_pages;
                self.query.current_page = page.clamp(1, total);
                self.selection = 0;
            }
            ViewEvent::CloseModal => {
                self.form = TodoFormData::default();
                self.form_error = None;
                self.editing = None;
                self.state = AppState::Normal;
            }
        }
    }

    pub fn push_search_char(&mut self, c: char) {
        let current = &self.query.filter.search_todo;
        if can_add_input_char(current.chars().count(), MAX_SEARCH_LENGTH, c) {
            let mut text = current.clone();
            text.push(c);
            self.emit(ViewEvent::UpdateSearchTodo(text));
        }
    }

    pub fn pop_search_char(&mut self) {
        let mut text = self.query.filter.search_todo.clone();
        if text.pop().is_some() {
            self.emit(ViewEvent::UpdateSearchTodo(text));
        }
    }

    pub fn cycle_status_filter(&mut self) {
        let next = self.query.filter.status_filter.next();
        self.emit(ViewEvent::UpdateStatusFilter(next));
    }

    // =========================================================================
    // List navigation
    // =========================================================================

    pub fn current_page(&self) -> TodoPage<'_> {
        self.query.apply(&self.todos, self.config.page_size)
    }

    pub fn selected_todo(&self) -> Option<&Todo> {
        self.current_page().items.get(self.selection).copied()
    }

    pub fn select_next(&mut self) {
        let len = self.current_page().items.len();
        if self.selection + 1 < len {
            self.selection += 1;
        } else if self.current_page().has_next() {
            self.next_page();
        }
    }

    pub fn select_prev(&mut self) {
        if self.selection > 0 {
            self.selection -= 1;
        } else if self.current_page().has_prev() {
            self.prev_page();
            self.selection = self.current_page().items.len().saturating_sub(1);
        }
    }

    pub fn next_page(&mut self) {
        let page = self.current_page().current_page;
        self.emit(ViewEvent::UpdateCurrentPage(page + 1));
    }

    pub fn prev_page(&mut self) {
        let page = self.current_page().current_page;
        self.emit(ViewEvent::UpdateCurrentPage(page.saturating_sub(1)));
    }

    fn clamp_selection(&mut self) {
        let page = self.current_page();
        let (current, len) = (page.current_page, page.items.len());
        self.query.current_page = current;
        self.selection = self.selection.min(len.saturating_sub(1));
    }

    // =========================================================================
    // Routing
    // =========================================================================

    /// Open the detail route of the selected todo
    pub fn open_selected(&mut self) {
        if let Some(id) = self.selected_todo().map(|t| t.id) {
            self.navigate(Route::TodoDetail { id });
        }
    }

    pub fn navigate(&mut self, route: Route) {
        debug!(path = %route.path(), "Navigate");
        self.router.push(route);
        self.route_changed();
    }

    /// Navigate by path, e.g. `/todos/7`. Returns false for unknown paths.
    pub fn open_path(&mut self, path: &str) -> bool {
        if !self.router.navigate(path) {
            warn!(path, "No route matches path");
            return false;
        }
        self.route_changed();
        true
    }

    fn route_changed(&mut self) {
        self.detail_todo = None;
        self.detail_error = None;
        if let Route::TodoDetail { id } = self.router.current() {
            if !self.todos.iter().any(|t| t.id == id) {
                self.fetch_detail_background(id);
            }
        }
    }

    pub fn go_back(&mut self) {
        if self.router.back() {
            self.detail_todo = None;
            self.detail_error = None;
        }
    }

    fn fetch_detail_background(&mut self, id: i64) {
        let services = self.services.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = if services.check_online().await {
                services.api.fetch_todo(id).await.map_err(|e| match e {
                    ApiError::NotFound(_) => "not found".to_string(),
                    other => other.to_string(),
                })
            } else {
                Err("not available offline".to_string())
            };
            Self::send_result(&tx, TaskResult::Detail(id, result)).await;
        });
    }

    /// Todo displayed by the detail route, if known
    pub fn detail(&self) -> Option<&Todo> {
        match self.router.current() {
            Route::TodoDetail { id } => self
                .todos
                .iter()
                .find(|t| t.id == id)
                .or(self.detail_todo.as_ref().filter(|t| t.id == id)),
            Route::Home => None,
        }
    }

    /// Todo the edit/toggle actions apply to on the current route
    fn focused_todo(&self) -> Option<&Todo> {
        match self.router.current() {
            Route::Home => self.selected_todo(),
            Route::TodoDetail { .. } => self.detail(),
        }
    }

    // =========================================================================
    // Connectivity
    // =========================================================================

    pub fn is_forced_offline(&self) -> bool {
        self.services.connectivity.is_forced_offline()
    }

    /// Toggle forced offline mode and remember it in the config
    pub fn toggle_offline(&mut self) {
        let offline = !self.is_forced_offline();
        self.services.connectivity.set_forced_offline(offline);
        self.config.offline_mode = offline;
        if let Err(e) = Config::save_offline_mode(offline) {
            warn!(error = %e, "Failed to save config");
        }
        info!(offline, "Offline mode toggled");
        if offline {
            self.status_message = Some("Offline mode - using cached todos".to_string());
        } else {
            self.refresh_background();
        }
    }
}

// ============================================================================
// Input validation helpers
// ============================================================================

/// Check if a character should be accepted into a text field
pub fn can_add_input_char(current_len: usize, max_len: usize, c: char) -> bool {
    current_len < max_len && !c.is_control()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use doit_core::cache::MemoryStore;

    fn todo(id: i64, text: &str, completed: bool) -> Todo {
        Todo {
            id,
            todo: text.to_string(),
            completed,
            user_id: None,
        }
    }

    fn test_app(todos: Vec<Todo>) -> App {
        let config = Config {
            api_base_url: "http://127.0.0.1:9".to_string(),
            page_size: 2,
            ..Config::default()
        };
        let api = ApiClient::new(&config).unwrap();
        let connectivity = Arc::new(ConnectivityMonitor::new(None, true));
        let repo = TodoRepository::new(
            Arc::new(api.clone()),
            TodoCache::new(Arc::new(MemoryStore::new())),
            connectivity.clone(),
        );
        let services = Services {
            api,
            repo,
            connectivity,
        };
        let mut app = App::with_services(config, services);
        app.todos = todos;
        app
    }

    fn sample() -> Vec<Todo> {
        vec![
            todo(1, "Buy milk", false),
            todo(2, "Walk dog", true),
            todo(3, "Buy bread", false),
            todo(4, "Call mom", true),
            todo(5, "Pay rent", false),
        ]
    }

    #[test]
    fn test_can_add_input_char() {
        assert!(can_add_input_char(0, 10, 'a'));
        assert!(!can_add_input_char(10, 10, 'a'));
        assert!(!can_add_input_char(0, 10, '\n'));
        assert!(!can_add_input_char(0, 10, '\x00'));
    }

    #[test]
    fn test_selection_moves_across_pages() {
        let mut app = test_app(sample());
        assert_eq!(app.selected_todo().map(|t| t.id), Some(1));
        app.select_next();
        app.select_next();
        assert_eq!(app.query.current_page, 2);
        assert_eq!(app.selected_todo().map(|t| t.id), Some(3));
        app.select_prev();
        assert_eq!(app.query.current_page, 1);
        assert_eq!(app.selected_todo().map(|t| t.id), Some(2));
    }

    #[test]
    fn test_page_events_clamp() {
        let mut app = test_app(sample());
        app.emit(ViewEvent::UpdateCurrentPage(99));
        assert_eq!(app.query.current_page, 3);
        app.next_page();
        assert_eq!(app.query.current_page, 3);
        app.emit(ViewEvent::UpdateCurrentPage(0));
        assert_eq!(app.query.current_page, 1);
    }

    #[test]
    fn test_search_and_filter_reset_page() {
        let mut app = test_app(sample());
        app.next_page();
        for c in "buy".chars() {
            app.push_search_char(c);
        }
        assert_eq!(app.query.current_page, 1);
        assert_eq!(app.current_page().total_matches, 2);

        app.cycle_status_filter();
        assert_eq!(app.query.filter.status_filter, TodoStatusFilter::Completed);
        assert_eq!(app.current_page().total_matches, 0);

        app.pop_search_char();
        app.pop_search_char();
        app.pop_search_char();
        assert_eq!(app.current_page().total_matches, 2);
    }

    #[test]
    fn test_open_selected_and_back() {
        let mut app = test_app(sample());
        app.select_next();
        app.open_selected();
        assert_eq!(app.router.current(), Route::TodoDetail { id: 2 });
        assert_eq!(app.detail().map(|t| t.todo.as_str()), Some("Walk dog"));
        app.go_back();
        assert_eq!(app.router.current(), Route::Home);
        assert!(app.detail().is_none());
    }

    #[test]
    fn test_open_path() {
        let mut app = test_app(sample());
        assert!(app.open_path("/todos/3"));
        assert_eq!(app.detail().map(|t| t.id), Some(3));
        assert!(!app.open_path("/todos/abc"));
        assert_eq!(app.router.current(), Route::TodoDetail { id: 3 });
        assert!(app.router.back());
        assert_eq!(app.router.current(), Route::Home);
    }

    #[test]
    fn test_start_edit_prefills_form() {
        let mut app = test_app(sample());
        app.start_edit();
        assert_eq!(app.state, AppState::EditingTodo);
        assert_eq!(app.form.todo, "Buy milk");
        assert_eq!(app.editing.as_ref().map(|t| t.id), Some(1));

        app.emit(ViewEvent::CloseModal);
        assert_eq!(app.state, AppState::Normal);
        assert!(app.editing.is_none());
        assert!(app.form.todo.is_empty());
    }

    #[test]
    fn test_submit_empty_form_keeps_modal_open() {
        let mut app = test_app(sample());
        app.start_add();
        app.push_form_char(' ');
        app.submit_form();
        assert_eq!(app.state, AppState::AddingTodo);
        assert_eq!(app.form_error.as_deref(), Some("Todo text is required"));
    }

    #[test]
    fn test_unchanged_edit_closes_without_request() {
        let mut app = test_app(sample());
        app.start_edit();
        app.submit_form();
        assert_eq!(app.state, AppState::Normal);
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_loaded_result_replaces_todos() {
        let mut app = test_app(sample());
        app.emit(ViewEvent::UpdateCurrentPage(3));
        app.process_task_result(TaskResult::Loaded(Ok(LoadedTodos {
            todos: vec![todo(9, "Only one", false)],
            source: DataSource::Cache,
            captured_at: None,
        })));
        assert_eq!(app.todos.len(), 1);
        assert_eq!(app.query.current_page, 1);
        assert_eq!(app.selected_todo().map(|t| t.id), Some(9));
        assert_eq!(app.data_source, Some(DataSource::Cache));
        assert!(!app.loading);
    }

    #[test]
    fn test_detail_fetch_error_shown_for_current_route() {
        let mut app = test_app(sample());
        app.router.push(Route::TodoDetail { id: 404 });
        app.process_task_result(TaskResult::Detail(404, Err("not found".to_string())));
        assert!(app.detail().is_none());
        assert_eq!(app.detail_error.as_deref(), Some("not found"));

        // Stale results for another route are dropped
        app.process_task_result(TaskResult::Detail(7, Err("not available offline".to_string())));
        assert_eq!(app.detail_error.as_deref(), Some("not found"));

        app.go_back();
        assert!(app.detail_error.is_none());
    }

    #[tokio::test]
    async fn test_detail_offline_reports_unavailable() {
        let mut app = test_app(sample());
        app.navigate(Route::TodoDetail { id: 99 });

        let result = app.task_rx.recv().await.unwrap();
        app.process_task_result(result);
        assert_eq!(app.detail_error.as_deref(), Some("not available offline"));
    }

    #[test]
    fn test_updated_result_applies_locally() {
        let mut app = test_app(sample());
        app.process_task_result(TaskResult::Updated(
            1,
            TodoUpdate::completed(true),
            Ok(todo(1, "Buy milk", true)),
        ));
        assert!(app.todos[0].completed);
        assert_eq!(app.status_message.as_deref(), Some("Saved todo #1"));
    }

    #[test]
    fn test_added_result_goes_first() {
        let mut app = test_app(sample());
        app.process_task_result(TaskResult::Added(Ok(todo(255, "New", false))));
        assert_eq!(app.todos[0].id, 255);
        assert_eq!(app.selected_todo().map(|t| t.id), Some(255));
    }

    #[tokio::test]
    async fn test_refresh_offline_without_cache_reports_error() {
        let mut app = test_app(Vec::new());
        app.refresh_background();
        assert!(app.loading);

        let result = app.task_rx.recv().await.unwrap();
        app.process_task_result(result);
        assert!(!app.loading);
        assert_eq!(app.status_message.as_deref(), Some("No offline data available"));
    }
}
