//! Error types for request assembly and transport.

use tcloud_auth::AuthError;
use tcloud_core::TcloudError;

/// Errors that can occur while building or sending a signed request.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// Signing failed. The request was not sent.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The client configuration is invalid.
    #[error(transparent)]
    Config(#[from] TcloudError),

    /// The endpoint and path do not form a valid URL.
    #[error("invalid request URL: {0}")]
    InvalidUri(#[from] http::uri::InvalidUri),

    /// A header value contains characters not allowed in HTTP headers.
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] http::header::InvalidHeaderValue),

    /// The request could not be assembled.
    #[error("failed to build request: {0}")]
    Http(#[from] http::Error),

    /// The HTTP client failed to build, connect, or send.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Convenience result type for transport operations.
pub type HttpResult<T> = Result<T, HttpError>;
