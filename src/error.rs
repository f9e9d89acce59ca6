//! Error types for pwsafe-core

use thiserror::Error;

/// Main error type for safe operations
///
/// No variant ever carries key material or password content, only the
/// stage or offset that failed.
#[derive(Error, Debug)]
pub enum SafeError {
    /// The container is malformed
    #[error("Format error: {0}")]
    Format(String),

    /// The password does not match the stored verification hash
    #[error("Invalid password")]
    Authentication,

    /// The stored integrity tag does not match the decoded content
    #[error("Integrity check failed: the file is corrupted or has been tampered with")]
    Integrity,

    /// The byte source ended before a required region was complete
    #[error("Truncated {region} at offset {offset}")]
    Truncation {
        /// Region that could not be read in full
        region: &'static str,
        /// Byte offset where the read started
        offset: usize,
    },

    /// Record not found
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SafeError {
    /// Shorthand for a [`SafeError::Format`] error
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        SafeError::Format(msg.into())
    }

    /// True for errors caused by a malformed or truncated container
    pub fn is_format(&self) -> bool {
        matches!(self, SafeError::Format(_) | SafeError::Truncation { .. })
    }
}

impl From<serde_json::Error> for SafeError {
    fn from(err: serde_json::Error) -> Self {
        SafeError::Config(err.to_string())
    }
}

/// Result type alias for safe operations
pub type Result<T> = std::result::Result<T, SafeError>;
