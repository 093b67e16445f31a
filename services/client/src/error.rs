//! services/client/src/error.rs
//!
//! Defines the primary error type for the client service.

use crate::config::ConfigError;
use jobmate_core::cv_utils::ImportError;
use jobmate_core::generation::GenerationError;
use jobmate_core::ports::PortError;
use jobmate_core::validation::{summarize, FieldError};

/// The primary error type for the `client` service.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// The CV generation workflow rejected the request or the backend failed it.
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// Login or registration was refused; `message` is what the user sees.
    #[error("{message}")]
    Auth {
        message: String,
        #[source]
        source: PortError,
    },

    /// Client-side form validation failed before any request was sent.
    #[error("Invalid input: {}", summarize(.0))]
    Invalid(Vec<FieldError>),

    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Represents a standard Input/Output error (e.g., reading a draft file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl ClientError {
    /// Wraps a refused login or registration, preferring the backend's detail.
    pub fn auth_failure(source: PortError, fallback: &str) -> Self {
        let message = match &source {
            PortError::Unauthorized(detail)
                if detail.as_deref().map_or(true, |d| d.trim().is_empty()) =>
            {
                fallback.to_string()
            }
            other => other.user_message(fallback),
        };
        ClientError::Auth { message, source }
    }

    /// The message printed for the user when a command fails.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Port(PortError::Unauthorized(_)) => {
                "Session expired. Run `jobmate login` to sign in again.".to_string()
            }
            ClientError::Port(e) => e.user_message(&e.to_string()),
            ClientError::Auth { message, .. } => message.clone(),
            ClientError::Generation(GenerationError::Failed(message)) => message.clone(),
            ClientError::Generation(GenerationError::Invalid(errors))
            | ClientError::Invalid(errors)
            | ClientError::Import(ImportError::Incomplete(errors)) => errors
                .iter()
                .map(|e| format!("  - {}", e))
                .collect::<Vec<_>>()
                .join("\n"),
            other => other.to_string(),
        }
    }
}
