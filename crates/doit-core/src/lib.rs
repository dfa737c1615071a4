//! Core library for doit.
//!
//! Everything that does not draw to a terminal lives here:
//!
//! - `models`: the `Todo` record and the list/search/form contracts
//! - `api`: REST client for the remote todo listing
//! - `cache`: key-value storage and the cached todo snapshot
//! - `connectivity`: the online/offline check
//! - `repository`: fetch-with-cache-fallback policy
//! - `config`: user configuration

pub mod api;
pub mod cache;
pub mod config;
pub mod connectivity;
pub mod models;
pub mod repository;

pub use api::{ApiClient, ApiError, TodoSource};
pub use cache::{KeyValueStore, StoreConfig, StoreError, TodoCache};
pub use config::Config;
pub use connectivity::{Connectivity, ConnectivityMonitor, FixedConnectivity, HostCheck};
pub use models::{Todo, TodoStatusFilter};
pub use repository::{DataSource, FetchError, LoadedTodos, TodoRepository};
