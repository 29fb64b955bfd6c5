//! Error types shared across the contract-test harness.

use thiserror::Error;

/// Factory misuse detected at construction time.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// An override named a field the template does not declare.
    #[error("unknown field `{field}` for template `{template}`")]
    UnknownField {
        /// Template name.
        template: &'static str,
        /// Offending override key.
        field: String,
    },
}

/// Errors raised by the client under test.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The requested resource does not exist.
    #[error("not found: {message}")]
    NotFound {
        /// Error message from the server.
        message: String,
    },

    /// The request is missing a required precondition header.
    #[error("precondition required: {message}")]
    PreconditionRequired {
        /// Error message from the server.
        message: String,
    },

    /// Server returned an error response the client has no mapping for.
    #[error("API error (status {status}): {message}")]
    Unexpected {
        /// HTTP status code.
        status: u16,
        /// Error message from the server.
        message: String,
    },
}

/// Result type for client operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Errors surfaced by the session lifecycle and verification step.
#[derive(Debug, Error)]
pub enum VerificationError {
    /// A lifecycle call arrived out of order.
    #[error("invalid session state: {0}")]
    InvalidState(String),

    /// One or more staged interactions did not play out as described.
    #[error("contract mismatch:\n{}", .mismatches.join("\n"))]
    Mismatch {
        /// Human-readable mismatch descriptions, one per failure.
        mismatches: Vec<String>,
    },

    /// Writing the contract artifact failed.
    #[error("failed to write contract file: {0}")]
    Write(#[from] std::io::Error),

    /// Publishing the contract to the broker failed.
    #[error("failed to publish contract: {0}")]
    Publish(String),
}
