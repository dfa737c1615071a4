use serde::{Deserialize, Serialize};

use super::Todo;

/// Completion filter for the todo list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoStatusFilter {
    #[default]
    All,
    Completed,
    Pending,
}

impl TodoStatusFilter {
    pub fn title(&self) -> &'static str {
        match self {
            TodoStatusFilter::All => "All",
            TodoStatusFilter::Completed => "Completed",
            TodoStatusFilter::Pending => "Pending",
        }
    }

    /// Get the next filter (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            TodoStatusFilter::All => TodoStatusFilter::Completed,
            TodoStatusFilter::Completed => TodoStatusFilter::Pending,
            TodoStatusFilter::Pending => TodoStatusFilter::All,
        }
    }

    pub fn matches(&self, todo: &Todo) -> bool {
        match self {
            TodoStatusFilter::All => true,
            TodoStatusFilter::Completed => todo.completed,
            TodoStatusFilter::Pending => !todo.completed,
        }
    }
}

/// Search box state: free text plus the completion filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    pub search_todo: String,
    pub status_filter: TodoStatusFilter,
}

impl SearchFilter {
    /// Case-insensitive substring match on the label, combined with the status filter.
    pub fn matches(&self, todo: &Todo) -> bool {
        if !self.status_filter.matches(todo) {
            return false;
        }
        let query = self.search_todo.trim();
        if query.is_empty() {
            return true;
        }
        todo.todo.to_lowercase().contains(&query.to_lowercase())
    }

    pub fn is_active(&self) -> bool {
        !self.search_todo.trim().is_empty() || self.status_filter != TodoStatusFilter::All
    }
}

/// Inputs of the paginated list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoListQuery {
    pub filter: SearchFilter,
    /// 1-based page number
    pub current_page: usize,
}

impl Default for TodoListQuery {
    fn default() -> Self {
        Self {
            filter: SearchFilter::default(),
            current_page: 1,
        }
    }
}

/// One page of filtered todos.
#[derive(Debug, Clone)]
pub struct TodoPage<'a> {
    pub items: Vec<&'a Todo>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_matches: usize,
}

impl TodoPage<'_> {
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }
}

impl TodoListQuery {
    /// Filter `todos` and cut out the requested page.
    ///
    /// The page number is clamped into `1..=total_pages`; an empty result
    /// still has one (empty) page.
    pub fn apply<'a>(&self, todos: &'a [Todo], page_size: usize) -> TodoPage<'a> {
        let page_size = page_size.max(1);
        let matches: Vec<&Todo> = todos.iter().filter(|t| self.filter.matches(t)).collect();
        let total_matches = matches.len();
        let total_pages = total_matches.div_ceil(page_size).max(1);
        let current_page = self.current_page.clamp(1, total_pages);

        let items = matches
            .into_iter()
            .skip((current_page - 1) * page_size)
            .take(page_size)
            .collect();

        TodoPage {
            items,
            current_page,
            total_pages,
            total_matches,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(id: i64, text: &str, completed: bool) -> Todo {
        Todo {
            id,
            todo: text.to_string(),
            completed,
            user_id: None,
        }
    }

    fn sample() -> Vec<Todo> {
        vec![
            todo(1, "Buy milk", false),
            todo(2, "Walk the dog", true),
            todo(3, "Buy stamps", true),
            todo(4, "Call mom", false),
            todo(5, "Write report", false),
        ]
    }

    #[test]
    fn test_status_filter_next_wraps() {
        assert_eq!(TodoStatusFilter::All.next(), TodoStatusFilter::Completed);
        assert_eq!(TodoStatusFilter::Completed.next(), TodoStatusFilter::Pending);
        assert_eq!(TodoStatusFilter::Pending.next(), TodoStatusFilter::All);
    }

    #[test]
    fn test_status_filter_serde() {
        assert_eq!(
            serde_json::to_string(&TodoStatusFilter::Pending).unwrap(),
            "\"pending\""
        );
        let parsed: TodoStatusFilter = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, TodoStatusFilter::Completed);
    }

    #[test]
    fn test_search_combines_text_and_status() {
        let filter = SearchFilter {
            search_todo: "BUY".to_string(),
            status_filter: TodoStatusFilter::Completed,
        };
        let todos = sample();
        let ids: Vec<i64> = todos.iter().filter(|t| filter.matches(t)).map(|t| t.id).collect();
        assert_eq!(ids, vec![3]);
        assert!(filter.is_active());
        assert!(!SearchFilter::default().is_active());
    }

    #[test]
    fn test_apply_paginates() {
        let todos = sample();
        let query = TodoListQuery {
            current_page: 2,
            ..Default::default()
        };
        let page = query.apply(&todos, 2);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_matches, 5);
        assert_eq!(page.items.iter().map(|t| t.id).collect::<Vec<_>>(), vec![3, 4]);
        assert!(page.has_next());
        assert!(page.has_prev());
    }

    #[test]
    fn test_apply_clamps_page() {
        let todos = sample();
        let query = TodoListQuery {
            current_page: 42,
            ..Default::default()
        };
        let page = query.apply(&todos, 2);
        assert_eq!(page.current_page, 3);
        assert_eq!(page.items.len(), 1);

        let query = TodoListQuery {
            current_page: 0,
            ..Default::default()
        };
        assert_eq!(query.apply(&todos, 2).current_page, 1);
    }

    #[test]
    fn test_apply_empty_has_one_page() {
        let query = TodoListQuery::default();
        let page = query.apply(&[], 10);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 1);
        assert!(page.items.is_empty());
        assert!(!page.has_next());
        assert!(!page.has_prev());
    }
}
