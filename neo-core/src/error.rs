//! Error types for the API

use crate::provider::Provider;
use thiserror::Error;

/// Workspace-wide error type
#[derive(Error, Debug)]
pub enum NeoError {
    /// Network failure, non-2xx status, or malformed payload from an upstream
    #[error("{provider} error: {message}")]
    Upstream { provider: Provider, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    /// An id that cannot belong to any document
    #[error("Invalid id: {0}")]
    MalformedId(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl NeoError {
    pub fn upstream(provider: Provider, message: impl Into<String>) -> Self {
        NeoError::Upstream {
            provider,
            message: message.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        NeoError::NotFound(msg.into())
    }

    pub fn malformed_id(id: impl Into<String>) -> Self {
        NeoError::MalformedId(id.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        NeoError::InvalidInput(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        NeoError::Storage(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        NeoError::Config(msg.into())
    }
}

/// Result type alias for API operations
pub type NeoResult<T> = Result<T, NeoError>;
