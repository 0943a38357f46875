//! Planning request error types

use thiserror::Error;

/// Errors that can occur while requesting a plan
///
/// These never reach the user verbatim: every variant collapses into the
/// single fetch-failed message. They are kept typed for logging and tests.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid endpoint: {0}")]
    Config(String),
}

impl PlanError {
    /// HTTP status when the service answered with a non-success code
    pub fn status(&self) -> Option<u16> {
        match self {
            PlanError::Api { status, .. } => Some(*status),
            PlanError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
