use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use tracing::debug;

use crate::models::Todo;

use super::{KeyValueStore, StoreError};

/// Key holding the full cached todo list
pub const TODOS_KEY: &str = "all-todos";

/// Key holding the capture time of the list, in epoch milliseconds
pub const TIMESTAMP_KEY: &str = "todos-timestamp";

/// The cached todo list and when it was captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedSnapshot {
    pub todos: Vec<Todo>,
    /// None if the timestamp key is missing or unreadable
    pub captured_at: Option<DateTime<Utc>>,
}

/// Human readable age: "just now", "5m ago", "2h ago", "3d ago".
///
/// Hours and days are rounded to the nearest unit.
pub fn age_display(captured_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - captured_at).num_minutes();
    if minutes < 1 {
        // Also covers clock skew
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        let hours = minutes / 60;
        if minutes % 60 >= 30 {
            format!("{}h ago", hours + 1)
        } else {
            format!("{}h ago", hours)
        }
    } else {
        let days = minutes / 1440;
        if (minutes % 1440) / 60 >= 12 {
            format!("{}d ago", days + 1)
        } else {
            format!("{}d ago", days)
        }
    }
}

/// Typed access to the cached snapshot.
///
/// Cloning shares the underlying store.
#[derive(Clone)]
pub struct TodoCache {
    store: Arc<dyn KeyValueStore>,
}

impl TodoCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    pub async fn load_todos(&self) -> Result<Option<Vec<Todo>>, StoreError> {
        let Some(raw) = self.store.get_item(TODOS_KEY).await? else {
            return Ok(None);
        };
        let todos = serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
            key: TODOS_KEY.to_string(),
            source,
        })?;
        Ok(Some(todos))
    }

    pub async fn captured_at(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        let Some(raw) = self.store.get_item(TIMESTAMP_KEY).await? else {
            return Ok(None);
        };
        let millis: i64 = serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
            key: TIMESTAMP_KEY.to_string(),
            source,
        })?;
        Ok(Utc.timestamp_millis_opt(millis).single())
    }

    /// Load the list and its timestamp together.
    ///
    /// A broken timestamp does not hide the list; it is reported as unknown.
    pub async fn load_snapshot(&self) -> Result<Option<CachedSnapshot>, StoreError> {
        let Some(todos) = self.load_todos().await? else {
            return Ok(None);
        };
        let captured_at = match self.captured_at().await {
            Ok(at) => at,
            Err(e) => {
                debug!(error = %e, "Failed to read snapshot timestamp");
                None
            }
        };
        Ok(Some(CachedSnapshot { todos, captured_at }))
    }

    /// Replace the cached list and stamp it with the current time.
    pub async fn save_todos(&self, todos: &[Todo]) -> Result<(), StoreError> {
        self.save_todos_at(todos, Utc::now()).await
    }

    pub async fn save_todos_at(
        &self,
        todos: &[Todo],
        captured_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let json = serde_json::to_string(todos).map_err(|source| StoreError::Parse {
            key: TODOS_KEY.to_string(),
            source,
        })?;
        self.store.set_item(TODOS_KEY, &json).await?;
        self.store
            .set_item(TIMESTAMP_KEY, &captured_at.timestamp_millis().to_string())
            .await?;
        debug!(count = todos.len(), "Todo snapshot saved");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
