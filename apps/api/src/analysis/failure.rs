use serde::Serialize;
use thiserror::Error;

use crate::llm_client::LlmError;

/// The only text a user ever sees for a failed model call.
pub const USER_FACING_MESSAGE: &str = "We encountered an error while synthesizing the research data. \
    Please check your connection and try again.";

/// Why a model call failed. Every variant renders to the same user-facing
/// message; the kind is exposed separately so callers can branch on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisFailure {
    #[error("network failure: {0}")]
    NetworkFailure(String),

    #[error("response violated the schema: {0}")]
    SchemaViolation(String),

    #[error("authentication with the model API failed")]
    AuthFailure,

    #[error("unclassified model failure: {0}")]
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    NetworkFailure,
    SchemaViolation,
    AuthFailure,
    Unknown,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::NetworkFailure => "NETWORK_FAILURE",
            FailureKind::SchemaViolation => "SCHEMA_VIOLATION",
            FailureKind::AuthFailure => "AUTH_FAILURE",
            FailureKind::Unknown => "UNKNOWN",
        }
    }
}

impl AnalysisFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            AnalysisFailure::NetworkFailure(_) => FailureKind::NetworkFailure,
            AnalysisFailure::SchemaViolation(_) => FailureKind::SchemaViolation,
            AnalysisFailure::AuthFailure => FailureKind::AuthFailure,
            AnalysisFailure::Unknown(_) => FailureKind::Unknown,
        }
    }

    pub fn user_message(&self) -> &'static str {
        USER_FACING_MESSAGE
    }
}

impl From<LlmError> for AnalysisFailure {
    fn from(err: LlmError) -> Self {
        match err {
            // A body that is not a generateContent envelope at all.
            LlmError::Http(e) if e.is_decode() => AnalysisFailure::SchemaViolation(e.to_string()),
            LlmError::Http(e) => AnalysisFailure::NetworkFailure(e.to_string()),
            LlmError::Auth { .. } => AnalysisFailure::AuthFailure,
            // Gemini answers an invalid key with 400 rather than 401.
            LlmError::Api { status: 400, message } if message.contains("API key") => {
                AnalysisFailure::AuthFailure
            }
            LlmError::Api { status, message } if status == 429 || status >= 500 => {
                AnalysisFailure::NetworkFailure(format!("status {status}: {message}"))
            }
            LlmError::Api { status, message } => {
                AnalysisFailure::Unknown(format!("status {status}: {message}"))
            }
            LlmError::Parse(e) => AnalysisFailure::SchemaViolation(e.to_string()),
            LlmError::EmptyContent => {
                AnalysisFailure::SchemaViolation("model returned no content".to_string())
            }
            LlmError::Blocked { reason } => {
                AnalysisFailure::Unknown(format!("model refused: {reason}"))
            }
        }
    }
}
