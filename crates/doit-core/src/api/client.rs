//! API client for the dummyjson todo endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};

use crate::config::Config;
use crate::models::{FetchTodosApiResponse, Todo, TodoFormData, TodoResponse, TodoUpdate};

use super::{ApiError, TodoSource};

/// Field selection for the listing call. The owner is not needed for the list.
const LIST_SELECT_FIELDS: &str = "id,todo,completed";

/// `limit=0` asks the API for the whole collection in one response.
const LIST_LIMIT_UNBOUNDED: &str = "0";

/// API client for the todo service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct NewTodoBody<'a> {
    todo: &'a str,
    completed: bool,
    #[serde(rename = "userId")]
    user_id: i64,
}

impl ApiClient {
    /// Create a client for the API configured in `config`
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn parse_json<T: DeserializeOwned>(
        response: reqwest::Response,
        url: &str,
    ) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", url, e))
        })
    }

    // ===== Data Fetching Methods =====

    /// Fetch every todo of the current user.
    ///
    /// Returns the `todos` collection of the response body, or an empty list
    /// if the body has none.
    pub async fn fetch_my_todos(&self) -> Result<Vec<Todo>, ApiError> {
        let url = format!("{}/todos", self.base_url);

        let result = async {
            let response = self
                .client
                .get(&url)
                .query(&[("limit", LIST_LIMIT_UNBOUNDED), ("select", LIST_SELECT_FIELDS)])
                .send()
                .await?;
            let response = Self::check_response(response).await?;
            let parsed: FetchTodosApiResponse = Self::parse_json(response, &url).await?;
            Ok::<_, ApiError>(parsed)
        }
        .await;

        match result {
            Ok(parsed) => {
                debug!(
                    count = parsed.todos.len(),
                    total = ?parsed.total,
                    "Todos fetched"
                );
                Ok(parsed.todos)
            }
            Err(e) => {
                error!(error = %e, "Network error while fetching todos");
                Err(e)
            }
        }
    }

    /// Fetch a single todo by id
    pub async fn fetch_todo(&self, id: i64) -> Result<Todo, ApiError> {
        let url = format!("{}/todos/{}", self.base_url, id);
        let response = self.client.get(&url).send().await?;
        let response = Self::check_response(response).await?;
        let parsed: TodoResponse = Self::parse_json(response, &url).await?;
        Ok(parsed.into_todo())
    }

    // ===== Mutations =====

    /// Create a todo owned by `user_id`
    pub async fn add_todo(&self, form: &TodoFormData, user_id: i64) -> Result<Todo, ApiError> {
        let label = form
            .label()
            .ok_or_else(|| ApiError::InvalidInput("Todo text is required".to_string()))?;
        let url = format!("{}/todos/add", self.base_url);
        let body = NewTodoBody {
            todo: label,
            completed: false,
            user_id,
        };
        self.send_json(self.client.post(&url).json(&body), &url).await
    }

    /// Send the changed fields of a todo
    pub async fn update_todo(&self, id: i64, update: &TodoUpdate) -> Result<Todo, ApiError> {
        let url = format!("{}/todos/{}", self.base_url, id);
        self.send_json(self.client.put(&url).json(update), &url).await
    }

    async fn send_json(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<Todo, ApiError> {
        let response = request.send().await?;
        let response = Self::check_response(response).await?;
        let parsed: TodoResponse = Self::parse_json(response, url).await?;
        if let Some(ref message) = parsed.message {
            debug!(url = url, message = %message, "API message");
        }
        Ok(parsed.into_todo())
    }
}

#[async_trait]
impl TodoSource for ApiClient {
    async fn fetch_my_todos(&self) -> Result<Vec<Todo>, ApiError> {
        ApiClient::fetch_my_todos(self).await
    }
}

// ============================================================================
// Tests
// ============================================================================
