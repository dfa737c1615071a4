//! REST API client for the todo service.
//!
//! `ApiClient` talks to a dummyjson-compatible API. The fetch-with-cache
//! policy only needs the listing call, which is abstracted behind
//! `TodoSource` so it can be replaced in tests.

pub mod client;
pub mod error;

use async_trait::async_trait;

use crate::models::Todo;

pub use client::ApiClient;
pub use error::ApiError;

/// Anything that can list the current user's todos.
#[async_trait]
pub trait TodoSource: Send + Sync {
    async fn fetch_my_todos(&self) -> Result<Vec<Todo>, ApiError>;
}
