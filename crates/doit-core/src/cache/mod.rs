//! Local caching module for offline data access.
//!
//! - `store`: a small key-value store of JSON strings. The durable
//!   `FileStore` is preferred; `MemoryStore` is used when the cache
//!   directory cannot be opened.
//! - `snapshot`: the cached todo list and its capture timestamp, stored
//!   under the `all-todos` and `todos-timestamp` keys.
//!
//! The snapshot is replaced wholesale on every successful fetch and never
//! expires.

pub mod snapshot;
pub mod store;

pub use snapshot::{age_display, CachedSnapshot, TodoCache, TIMESTAMP_KEY, TODOS_KEY};
pub use store::{
    init_global_store, open_store, Driver, FileStore, KeyValueStore, MemoryStore,
    StoreConfig, StoreError,
};
