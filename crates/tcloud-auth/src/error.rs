//! Error types for request signing.
//!
//! All signing failures are represented by [`AuthError`]. Every variant is raised
//! before any bytes leave the process: a request that fails to sign is never sent.

/// Errors that can occur while preparing or signing a request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The v1 signature method is neither `HmacSHA1` nor `HmacSHA256`.
    #[error("unsupported signature method: {0}")]
    UnsupportedSignatureMethod(String),

    /// The HTTP method is neither GET nor POST.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The secret key is empty; an HMAC over an empty key is never produced.
    #[error("secret key must not be empty")]
    EmptySecretKey,

    /// The request URL could not be parsed or has no host.
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    /// A multipart field holds a value that is neither a string nor a byte blob.
    #[error("multipart field `{name}` has unsupported type {kind}; convert it to a string or bytes")]
    UnsupportedMultipartField {
        /// The field name.
        name: String,
        /// The kind of value found in the field.
        kind: &'static str,
    },

    /// A multipart payload is not a map of fields.
    #[error("multipart payload must be a map of fields, got {0}")]
    InvalidMultipartPayload(&'static str),

    /// A multipart request was signed without a boundary.
    #[error("multipart request requires a boundary")]
    MissingBoundary,

    /// A byte stream reached canonicalization without being materialized.
    #[error("field `{0}` is an unread byte stream; materialize the parameters first")]
    UnmaterializedStream(String),

    /// Reading a byte stream failed.
    #[error("failed to read byte stream: {0}")]
    StreamRead(#[from] std::io::Error),

    /// A byte stream exceeded the configured buffer limit.
    #[error("byte stream exceeds the {limit} byte limit")]
    StreamTooLarge {
        /// The configured limit in bytes.
        limit: u64,
    },

    /// The timestamp cannot be represented as a UTC date.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(i64),

    /// The payload could not be serialized to JSON.
    #[error("failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Convenience result type for signing operations.
pub type AuthResult<T> = Result<T, AuthError>;
