//! Defines common error types for the hospital management core library.

use thiserror::Error;

/// The primary error type for access-control operations.
#[derive(Error, Debug)]
pub enum HmsError {
    /// Error related to configuration loading or validation.
    #[error("Configuration Error: {0}")]
    ConfigError(String),

    /// Error during file I/O operations.
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error during serialization or deserialization (e.g., JSON parsing).
    #[error("Serialization/Deserialization Error: {0}")]
    SerdeError(#[from] serde_json::Error),

    /// An identifier that is not part of the closed enumeration it was parsed as.
    #[error("Unknown {kind}: '{value}'")]
    UnknownIdentifier {
        /// What was being parsed ("role", "resource", "action", "permission").
        kind: &'static str,
        /// The rejected input.
        value: String,
    },

    /// Error indicating a failure during data validation.
    #[error("Validation Error ({context}): {message}")]
    ValidationError {
        /// Context or field where validation failed.
        context: String,
        /// Specific validation failure message.
        message: String,
    },

    /// Error indicating a denied request.
    #[error("Policy Violation: {0}")]
    PolicyViolation(String),

    /// Represents an unexpected internal error.
    #[error("Internal Error: {0}")]
    InternalError(String),
}

impl HmsError {
    /// Shorthand for an [`HmsError::UnknownIdentifier`].
    pub fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        HmsError::UnknownIdentifier {
            kind,
            value: value.into(),
        }
    }

    /// Returns true when the error stems from an unrecognised identifier.
    pub fn is_unknown_identifier(&self) -> bool {
        matches!(self, HmsError::UnknownIdentifier { .. })
    }
}
