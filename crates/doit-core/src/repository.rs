//! Fetch-with-cache-fallback policy.
//!
//! `TodoRepository::fetch_cached_todos` produces the best available list
//! of todos given current connectivity:
//!
//! 1. Offline: serve the cached snapshot, or fail with `NoOfflineData`.
//! 2. Online: fetch from the API, replace the snapshot, return the result.
//! 3. If step 2 fails for any reason, serve the cached snapshot if there is
//!    one, otherwise return the original error.
//!
//! Cached data never expires. Concurrent calls race on the snapshot keys
//! and the last write wins.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

use crate::api::{ApiError, TodoSource};
use crate::cache::{CachedSnapshot, StoreError, TodoCache};
use crate::connectivity::Connectivity;
use crate::models::Todo;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch todos: {0}")]
    Network(#[from] ApiError),

    #[error("No offline data available")]
    NoOfflineData,

    #[error("Cache error: {0}")]
    Storage(#[from] StoreError),
}

/// Where a list of todos came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Network,
    Cache,
}

/// Todos plus where they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTodos {
    pub todos: Vec<Todo>,
    pub source: DataSource,
    pub captured_at: Option<DateTime<Utc>>,
}

impl LoadedTodos {
    fn from_snapshot(snapshot: CachedSnapshot) -> Self {
        Self {
            todos: snapshot.todos,
            source: DataSource::Cache,
            captured_at: snapshot.captured_at,
        }
    }
}

/// Cloning is cheap; all parts are shared.
#[derive(Clone)]
pub struct TodoRepository {
    api: Arc<dyn TodoSource>,
    cache: TodoCache,
    connectivity: Arc<dyn Connectivity>,
}

impl TodoRepository {
    pub fn new(
        api: Arc<dyn TodoSource>,
        cache: TodoCache,
        connectivity: Arc<dyn Connectivity>,
    ) -> Self {
        Self {
            api,
            cache,
            connectivity,
        }
    }

    pub fn cache(&self) -> &TodoCache {
        &self.cache
    }

    /// Fetch the todo list from the network, without touching the cache.
    pub async fn fetch_my_todos(&self) -> Result<Vec<Todo>, FetchError> {
        Ok(self.api.fetch_my_todos().await?)
    }

    /// Best available todo list for the current connectivity.
    pub async fn fetch_cached_todos(&self) -> Result<Vec<Todo>, FetchError> {
        self.load().await.map(|loaded| loaded.todos)
    }

    /// Same policy as `fetch_cached_todos`, also reporting the data source.
    pub async fn load(&self) -> Result<LoadedTodos, FetchError> {
        if !self.connectivity.is_online() {
            info!("Offline mode: loading todos from cache");
            return match self.cache.load_snapshot().await? {
                Some(snapshot) => Ok(LoadedTodos::from_snapshot(snapshot)),
                None => Err(FetchError::NoOfflineData),
            };
        }

        let err = match self.fetch_and_store().await {
            Ok(loaded) => return Ok(loaded),
            Err(e) => e,
        };

        warn!(error = %err, "Network failed, trying cache");
        match self.cache.load_snapshot().await {
            Ok(Some(snapshot)) => {
                info!(count = snapshot.todos.len(), "Returning cached todos");
                Ok(LoadedTodos::from_snapshot(snapshot))
            }
            Ok(None) => Err(err),
            Err(cache_err) => {
                warn!(error = %cache_err, "Failed to read cached todos");
                Err(err)
            }
        }
    }

    async fn fetch_and_store(&self) -> Result<LoadedTodos, FetchError> {
        let todos = self.fetch_my_todos().await?;
        let captured_at = Utc::now();
        self.cache.save_todos_at(&todos, captured_at).await?;
        info!(count = todos.len(), "Todos fetched and cached");
        Ok(LoadedTodos {
            todos,
            source: DataSource::Network,
            captured_at: Some(captured_at),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::cache::{Driver, KeyValueStore, MemoryStore};
    use crate::connectivity::FixedConnectivity;

    /// Scripted API: returns the configured todos, or a server error when None.
    struct FakeApi {
        response: Mutex<Option<Vec<Todo>>>,
        calls: AtomicUsize,
    }

    impl FakeApi {
        fn ok(todos: Vec<Todo>) -> Arc<Self> {
            Arc::new(Self {
                response: Mutex::new(Some(todos)),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                response: Mutex::new(None),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TodoSource for FakeApi {
        async fn fetch_my_todos(&self) -> Result<Vec<Todo>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.response.lock().unwrap().clone() {
                Some(todos) => Ok(todos),
                None => Err(ApiError::ServerError("boom".to_string())),
            }
        }
    }

    /// Store whose writes always fail
    struct ReadOnlyStore(MemoryStore);

    #[async_trait]
    impl KeyValueStore for ReadOnlyStore {
        fn driver(&self) -> Driver {
            Driver::Memory
        }

        async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.0.get_item(key).await
        }

        async fn set_item(&self, key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Io {
                key: key.to_string(),
                source: std::io::Error::other("read-only"),
            })
        }

        async fn remove_item(&self, key: &str) -> Result<(), StoreError> {
            self.0.remove_item(key).await
        }
    }

    fn todo(id: i64, text: &str) -> Todo {
        Todo {
            id,
            todo: text.to_string(),
            completed: false,
            user_id: None,
        }
    }

    fn repo(api: Arc<FakeApi>, cache: &TodoCache, online: bool) -> TodoRepository {
        TodoRepository::new(api, cache.clone(), Arc::new(FixedConnectivity(online)))
    }

    fn empty_cache() -> TodoCache {
        TodoCache::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_online_success_returns_and_caches_network_data() {
        let fresh = vec![todo(1, "a"), todo(2, "b")];
        let cache = empty_cache();
        cache.save_todos(&[todo(9, "stale")]).await.unwrap();
        let api = FakeApi::ok(fresh.clone());

        let loaded = repo(api.clone(), &cache, true).load().await.unwrap();
        assert_eq!(loaded.todos, fresh);
        assert_eq!(loaded.source, DataSource::Network);
        assert!(loaded.captured_at.is_some());
        assert_eq!(cache.load_todos().await.unwrap(), Some(fresh));
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn test_offline_with_cache_skips_network() {
        let cached = vec![todo(5, "cached")];
        let cache = empty_cache();
        cache.save_todos(&cached).await.unwrap();
        let api = FakeApi::ok(vec![todo(1, "network")]);

        let todos = repo(api.clone(), &cache, false)
            .fetch_cached_todos()
            .await
            .unwrap();
        assert_eq!(todos, cached);
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_offline_without_cache_is_no_data() {
        let api = FakeApi::ok(vec![todo(1, "network")]);
        let err = repo(api.clone(), &empty_cache(), false)
            .fetch_cached_todos()
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::NoOfflineData));
        assert_eq!(err.to_string(), "No offline data available");
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_network_failure_falls_back_to_cache() {
        let cached = vec![todo(5, "cached"), todo(6, "also cached")];
        let cache = empty_cache();
        cache.save_todos(&cached).await.unwrap();
        let api = FakeApi::failing();

        let loaded = repo(api.clone(), &cache, true).load().await.unwrap();
        assert_eq!(loaded.todos, cached);
        assert_eq!(loaded.source, DataSource::Cache);
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn test_network_failure_without_cache_resignals() {
        let api = FakeApi::failing();
        let err = repo(api, &empty_cache(), true)
            .fetch_cached_todos()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FetchError::Network(ApiError::ServerError(ref body)) if body == "boom"
        ));
    }

    #[tokio::test]
    async fn test_cache_write_failure_falls_back_to_previous_snapshot() {
        let old = vec![todo(1, "old")];
        let inner = MemoryStore::new();
        inner
            .set_item(crate::cache::TODOS_KEY, &serde_json::to_string(&old).unwrap())
            .await
            .unwrap();
        let cache = TodoCache::new(Arc::new(ReadOnlyStore(inner)));
        let api = FakeApi::ok(vec![todo(2, "new")]);

        let loaded = repo(api, &cache, true).load().await.unwrap();
        assert_eq!(loaded.todos, old);
        assert_eq!(loaded.source, DataSource::Cache);
        assert_eq!(loaded.captured_at, None);
    }

    #[tokio::test]
    async fn test_cache_write_failure_without_snapshot_is_storage_error() {
        let cache = TodoCache::new(Arc::new(ReadOnlyStore(MemoryStore::new())));
        let api = FakeApi::ok(vec![todo(2, "new")]);

        let err = repo(api, &cache, true).fetch_cached_todos().await.unwrap_err();
        assert!(matches!(err, FetchError::Storage(StoreError::Io { .. })));
    }

    #[tokio::test]
    async fn test_fetch_my_todos_leaves_cache_alone() {
        let cache = empty_cache();
        let api = FakeApi::ok(vec![todo(1, "a")]);
        let todos = repo(api, &cache, true).fetch_my_todos().await.unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(cache.load_todos().await.unwrap(), None);
    }
}
