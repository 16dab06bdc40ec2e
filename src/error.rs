use std::io;

use thiserror::Error;

/// Body returned to clients when the inbound message is missing or unusable.
pub const CLIENT_ERROR_BODY: &str = r#"{"error":"Message is required"}"#;

#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid knowledge base entry {entry}: {reason}")]
    InvalidKnowledgeBase { entry: usize, reason: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArg(String),
}

impl ResolverError {
    /// True for errors caused by the caller's request rather than by local state.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ResolverError::InvalidQuery(_))
    }
}

pub type Result<T> = std::result::Result<T, ResolverError>;
