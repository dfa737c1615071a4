use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Empty file written when opening a `FileStore` to verify the directory is writable
const WRITE_TEST_FILE: &str = ".write-test";

/// Process-wide store handle, initialised once at startup
static GLOBAL_STORE: OnceLock<Arc<dyn KeyValueStore>> = OnceLock::new();

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O error for '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse cached '{key}': {source}")]
    Parse {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("No storage driver available")]
    Unavailable,
}

/// Storage backends, in order of preference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    File,
    Memory,
}

impl Driver {
    pub fn name(&self) -> &'static str {
        match self {
            Driver::File => "file",
            Driver::Memory => "memory",
        }
    }
}

/// A key-value store of JSON strings.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    fn driver(&self) -> Driver;

    async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;

    async fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}

/// Where and how the store is opened.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub name: String,
    pub store_name: String,
    pub version: f64,
    pub drivers: Vec<Driver>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: "DoItApp".to_string(),
            store_name: "todos".to_string(),
            version: 1.0,
            drivers: vec![Driver::File, Driver::Memory],
        }
    }
}

impl StoreConfig {
    pub fn directory(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.name).join(&self.store_name)
    }
}

/// Open the first driver in `config.drivers` that works.
///
/// `base_dir` is the cache directory; without one the file driver is skipped.
pub fn open_store(
    config: &StoreConfig,
    base_dir: Option<&Path>,
) -> Result<Arc<dyn KeyValueStore>, StoreError> {
    for driver in &config.drivers {
        match driver {
            Driver::File => {
                let Some(base) = base_dir else {
                    debug!("No cache directory, skipping file driver");
                    continue;
                };
                match FileStore::open(config.directory(base)) {
                    Ok(store) => {
                        info!(
                            name = %config.name,
                            store = %config.store_name,
                            version = config.version,
                            dir = %store.dir().display(),
                            "Opened file store"
                        );
                        return Ok(Arc::new(store));
                    }
                    Err(e) => {
                        warn!(error = %e, "File store unavailable, falling back");
                    }
                }
            }
            Driver::Memory => {
                info!(
                    name = %config.name,
                    store = %config.store_name,
                    "Using in-memory store, cached data will not survive restart"
                );
                return Ok(Arc::new(MemoryStore::new()));
            }
        }
    }
    Err(StoreError::Unavailable)
}

/// Open the process-wide store, or return it if already open.
pub fn init_global_store(
    config: &StoreConfig,
    base_dir: Option<&Path>,
) -> Result<Arc<dyn KeyValueStore>, StoreError> {
    if let Some(store) = GLOBAL_STORE.get() {
        return Ok(Arc::clone(store));
    }
    let store = open_store(config, base_dir)?;
    // A concurrent initialiser may have won; keep whichever was set first
    let _ = GLOBAL_STORE.set(store);
    GLOBAL_STORE.get().cloned().ok_or(StoreError::Unavailable)
}

fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

// ============================================================================
// File store
// ============================================================================

/// Durable store: one `<key>.json` file per key.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: PathBuf) -> Result<Self, StoreError> {
        let io_err = |source| StoreError::Io {
            key: WRITE_TEST_FILE.to_string(),
            source,
        };
        std::fs::create_dir_all(&dir).map_err(io_err)?;
        let marker = dir.join(WRITE_TEST_FILE);
        std::fs::write(&marker, b"").map_err(io_err)?;
        std::fs::remove_file(&marker).map_err(io_err)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn item_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    fn driver(&self) -> Driver {
        Driver::File
    }

    async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        validate_key(key)?;
        match tokio::fs::read_to_string(self.item_path(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        let path = self.item_path(key);
        let tmp = path.with_extension("json.tmp");
        let io_err = |source| StoreError::Io {
            key: key.to_string(),
            source,
        };
        tokio::fs::write(&tmp, value).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &path).await.map_err(io_err)?;
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        match tokio::fs::remove_file(self.item_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

// ============================================================================
// Memory store
// ============================================================================

/// Fallback store that lives as long as the process.
#[derive(Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map
        self.items.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    fn driver(&self) -> Driver {
        Driver::Memory
    }

    async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        validate_key(key)?;
        Ok(self.items().get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        self.items().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        self.items().remove(key);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get_item("all-todos").await.unwrap(), None);
        store.set_item("all-todos", "[1,2]").await.unwrap();
        assert_eq!(store.get_item("all-todos").await.unwrap().as_deref(), Some("[1,2]"));
        store.remove_item("all-todos").await.unwrap();
        assert_eq!(store.get_item("all-todos").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_persists_across_instances() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("DoItApp").join("todos");

        let store = FileStore::open(dir.clone()).unwrap();
        store.set_item("todos-timestamp", "1700000000000").await.unwrap();
        store.set_item("todos-timestamp", "1700000000001").await.unwrap();

        let reopened = FileStore::open(dir.clone()).unwrap();
        assert_eq!(
            reopened.get_item("todos-timestamp").await.unwrap().as_deref(),
            Some("1700000000001")
        );
        assert!(!dir.join("todos-timestamp.json.tmp").exists());

        reopened.remove_item("todos-timestamp").await.unwrap();
        reopened.remove_item("todos-timestamp").await.unwrap();
        assert_eq!(reopened.get_item("todos-timestamp").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalid_keys_rejected() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.set_item("../escape", "x").await,
            Err(StoreError::InvalidKey(_))
        ));
        assert!(matches!(store.get_item("").await, Err(StoreError::InvalidKey(_))));
    }

    #[test]
    fn test_open_store_prefers_file_driver() {
        let tmp = tempfile::tempdir().unwrap();
        let config = StoreConfig::default();
        let store = open_store(&config, Some(tmp.path())).unwrap();
        assert_eq!(store.driver(), Driver::File);
        assert!(tmp.path().join("DoItApp").join("todos").is_dir());
    }

    #[test]
    fn test_open_store_falls_back_to_memory() {
        let tmp = tempfile::tempdir().unwrap();
        // A regular file where the directory should go makes the file driver fail
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();

        let store = open_store(&StoreConfig::default(), Some(&blocker)).unwrap();
        assert_eq!(store.driver(), Driver::Memory);

        let store = open_store(&StoreConfig::default(), None).unwrap();
        assert_eq!(store.driver(), Driver::Memory);
    }

    #[test]
    fn test_open_store_no_drivers() {
        let config = StoreConfig {
            drivers: vec![Driver::File],
            ..StoreConfig::default()
        };
        assert!(matches!(open_store(&config, None), Err(StoreError::Unavailable)));
    }
}
