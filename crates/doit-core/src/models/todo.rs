use serde::{Deserialize, Serialize};

/// A single todo as served by the remote API.
///
/// The listing request only selects `id`, `todo` and `completed`, so the
/// owner is optional and omitted from the cached JSON when unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub todo: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

impl Todo {
    pub fn status_label(&self) -> &'static str {
        if self.completed {
            "Completed"
        } else {
            "Pending"
        }
    }

    /// Checkbox marker used in list rows
    pub fn checkbox(&self) -> &'static str {
        if self.completed {
            "[x]"
        } else {
            "[ ]"
        }
    }

    pub fn owner_display(&self) -> String {
        match self.user_id {
            Some(id) => format!("User #{}", id),
            None => "Unknown".to_string(),
        }
    }
}

/// Body of `GET /todos`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FetchTodosApiResponse {
    #[serde(default)]
    pub todos: Vec<Todo>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub skip: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
}

/// Body returned by the add/update endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TodoResponse {
    pub id: i64,
    pub todo: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(rename = "userId", default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl TodoResponse {
    pub fn into_todo(self) -> Todo {
        Todo {
            id: self.id,
            todo: self.todo,
            completed: self.completed,
            user_id: self.user_id,
        }
    }
}

/// Input of the add and edit forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoFormData {
    pub todo: String,
}

impl TodoFormData {
    pub fn new(todo: impl Into<String>) -> Self {
        Self { todo: todo.into() }
    }

    /// Trimmed label, or None if there is nothing to save
    pub fn label(&self) -> Option<&str> {
        let trimmed = self.todo.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

/// Partial update sent with `PUT /todos/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TodoUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub todo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoUpdate {
    pub fn text(todo: impl Into<String>) -> Self {
        Self {
            todo: Some(todo.into()),
            completed: None,
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            todo: None,
            completed: Some(completed),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.todo.is_none() && self.completed.is_none()
    }

    /// Apply the changed fields to a local copy.
    pub fn apply_to(&self, todo: &mut Todo) {
        if let Some(ref text) = self.todo {
            todo.todo = text.clone();
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
    }
}
