use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JSON error body some backend endpoints send alongside a non-2xx status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("API error {status}: {message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

impl ApiError {
    /// Prefers the body's `message` field; falls back to the status reason.
    pub fn from_body(status: u16, reason: &str, body: &str) -> Self {
        let message = serde_json::from_str::<ApiErrorBody>(body)
            .ok()
            .and_then(|parsed| parsed.message)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| {
                if reason.is_empty() {
                    format!("Error: {status}")
                } else {
                    reason.to_string()
                }
            });
        Self { status, message }
    }
}
