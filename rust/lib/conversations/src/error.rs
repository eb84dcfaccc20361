use thiserror::Error;

use crate::model::ConversationId;

/// Failure reported by a `ConversationApi` implementation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("conversation {0} not found")]
    NotFound(ConversationId),

    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    #[error("network: {0}")]
    Network(String),

    #[error("decode: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

/// Invalid store configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unknown {kind} '{value}'")]
    UnknownValue { kind: &'static str, value: String },

    #[error("invalid value for --{flag}: '{value}'")]
    InvalidNumber { flag: &'static str, value: String },

    #[error("--page-size must be at least 1")]
    ZeroPageSize,
}
