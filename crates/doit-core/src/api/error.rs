use thiserror::Error;

/// Failures of calls to the todo API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    ServerError(String),

    /// Any other non-success status
    #[error("Request rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Refused before sending anything
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Error bodies are cut to this many bytes
const MAX_ERROR_BODY_LENGTH: usize = 500;

fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}

impl ApiError {
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let body = truncate_body(body);
        match status.as_u16() {
            404 => ApiError::NotFound(body),
            code @ 500..=599 => {
                if body.is_empty() {
                    ApiError::ServerError(format!("status {}", code))
                } else {
                    ApiError::ServerError(body)
                }
            }
            code => ApiError::Rejected { status: code, body },
        }
    }
}
