//! Error types for the lead desk.

use uuid::Uuid;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Dialogue error: {0}")]
    Dialogue(#[from] DialogueError),

    #[error("Relay error: {0}")]
    Relay(#[from] RelayError),

    #[error("Lead store error: {0}")]
    Store(#[from] StoreError),

    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Dialogue session errors.
#[derive(Debug, thiserror::Error)]
pub enum DialogueError {
    #[error("Session {id} not found")]
    SessionNotFound { id: Uuid },
}

/// Errors at the mail-relay boundary, on both the client and server side.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The submission failed name/email validation.
    #[error("{0}")]
    Invalid(String),

    /// The relay answered, but refused the submission.
    #[error("Relay rejected submission ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Relay transport failed: {0}")]
    Transport(String),

    #[error("Invalid response from relay: {0}")]
    InvalidResponse(String),
}

impl RelayError {
    /// The message a user-facing form should show for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::Invalid(message) | Self::Rejected { message, .. } => message.clone(),
            Self::Transport(_) | Self::InvalidResponse(_) => {
                "We could not send your message. Please try again later.".to_string()
            }
        }
    }
}

/// Lead record store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Lead file {path} is not a JSON array of records: {reason}")]
    Corrupt { path: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Outbound mail errors.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("SMTP send failed: {0}")]
    Send(String),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
