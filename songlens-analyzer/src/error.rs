//! Error types for songlens-analyzer
//!
//! Two severities exist. Per-item failures (an unmatched descriptor, a failed
//! artist lookup) never surface here: they are folded into the report. An
//! `AnalyzerError` aborts the whole invocation and no partial result is
//! returned.

use crate::types::ServiceError;
use thiserror::Error;

/// Fatal, per-invocation error
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Malformed or missing required input
    #[error("Invalid request: {0}")]
    InvalidInput(String),

    /// Unrecoverable collaborator fault (e.g. authentication failure)
    #[error("External service error: {0}")]
    Service(#[from] ServiceError),

    /// songlens-common error (configuration, I/O)
    #[error("Common error: {0}")]
    Common(#[from] songlens_common::Error),
}

impl AnalyzerError {
    /// Stable code for the single top-level error payload
    pub fn code(&self) -> &'static str {
        match self {
            AnalyzerError::InvalidInput(_) => "BAD_REQUEST",
            AnalyzerError::Service(ServiceError::Unauthorized(_)) => "UNAUTHORIZED",
            AnalyzerError::Service(_) => "SERVICE_ERROR",
            AnalyzerError::Common(_) => "INTERNAL_ERROR",
        }
    }

    /// JSON error payload, shaped like `{"error": {"code", "message"}}`
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type for analyzer invocations
pub type AnalyzerResult<T> = Result<T, AnalyzerError>;
