//! Configuration, credentials, and shared error types for the Tencent Cloud
//! API client.
//!
//! Everything that reads the process environment lives here, so the signing
//! crate stays a pure function of the values it is handed.

mod config;
mod credential;
mod error;

pub use config::ClientConfig;
pub use credential::Credential;
pub use error::{TcloudError, TcloudResult};
