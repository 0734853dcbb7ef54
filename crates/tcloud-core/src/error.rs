//! Error types for the client core.

/// Core error type for client configuration and credentials.
#[derive(Debug, thiserror::Error)]
pub enum TcloudError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A required credential environment variable is unset or empty.
    #[error("missing credential: {0} is not set")]
    MissingCredential(&'static str),
}

/// Convenience result type for core operations.
pub type TcloudResult<T> = Result<T, TcloudError>;
