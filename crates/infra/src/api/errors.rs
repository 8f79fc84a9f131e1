//! API-specific error types
//!
//! Provides error classification for remote resource calls.

use std::time::Duration;

use thiserror::Error;

/// Categories of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Authentication errors (401, 403) - session missing or expired
    Authentication,
    /// Rate limiting errors (429) - retry later
    RateLimit,
    /// Server errors (5xx) - retryable
    Server,
    /// Client errors (other 4xx, malformed responses) - non-retryable
    Client,
    /// Network/connection errors and timeouts - retryable
    Network,
    /// Configuration and local storage errors - non-retryable
    Config,
}

/// Errors surfaced by the request executor and the façades
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Non-2xx response. `body` holds the parsed JSON error payload when the
    /// server sent one.
    #[error("HTTP {status} {status_text}")]
    Status { status: u16, status_text: String, body: Option<serde_json::Value> },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Failed to decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("Failed to serialize request body: {0}")]
    Serialization(String),

    #[error("Token store error: {0}")]
    TokenStore(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Status { status, .. } => match status {
                401 | 403 => ApiErrorCategory::Authentication,
                429 => ApiErrorCategory::RateLimit,
                500..=599 => ApiErrorCategory::Server,
                _ => ApiErrorCategory::Client,
            },
            Self::Network(_) | Self::Timeout(_) => ApiErrorCategory::Network,
            Self::Decode { .. } | Self::Serialization(_) => ApiErrorCategory::Client,
            Self::TokenStore(_) | Self::Config(_) => ApiErrorCategory::Config,
        }
    }

    /// Check if a caller-level retry could plausibly succeed
    pub fn should_retry(&self) -> bool {
        matches!(
            self.category(),
            ApiErrorCategory::RateLimit | ApiErrorCategory::Server | ApiErrorCategory::Network
        )
    }

    /// HTTP status for `Status` errors
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server-provided `message` field from the error payload, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { body: Some(body), .. } => {
                body.get("message").and_then(serde_json::Value::as_str)
            }
            _ => None,
        }
    }

    pub(crate) fn decode(endpoint: &str, err: impl std::fmt::Display) -> Self {
        Self::Decode { endpoint: endpoint.to_string(), message: err.to_string() }
    }
}
