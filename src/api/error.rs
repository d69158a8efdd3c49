//! Error type for Conch API calls.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Not authenticated. Run 'conch login' or set CONCH_TOKEN")]
    NotAuthenticated,

    #[error("Invalid API URL '{0}': must start with http:// or https://")]
    InvalidUrl(String),
}

impl ApiError {
    /// Build a status error from a response body, preferring the server's `{"error": ...}` message.
    pub fn from_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    "no response body".to_string()
                } else {
                    trimmed.to_string()
                }
            });
        ApiError::Status { status, message }
    }
}
