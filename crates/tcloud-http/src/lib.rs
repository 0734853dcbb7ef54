//! Signed request assembly and HTTP transport for Tencent Cloud APIs.
//!
//! This crate sits between the caller and the gateway:
//!
//! - **Request assembly** ([`request`]): builds complete, signed
//!   `http::Request<Bytes>` values for the v1 and v3 schemes from an
//!   [`ApiRequest`] and a fixed timestamp.
//! - **Encoding** ([`query`], [`multipart`]): query strings and form bodies,
//!   and `multipart/form-data` bodies that match the bytes the signer hashed.
//! - **Client** ([`client`]): a `reqwest` client that stamps the current time,
//!   signs, and sends.
//!
//! # Usage
//!
//! ```rust,no_run
//! use tcloud_auth::Value;
//! use tcloud_core::{ClientConfig, Credential};
//! use tcloud_http::{ApiRequest, TcloudClient};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = TcloudClient::new(ClientConfig::from_env(), Credential::from_env()?)?;
//! let request = ApiRequest::builder()
//!     .service("cvm")
//!     .action("DescribeInstances")
//!     .version("2017-03-12")
//!     .params(Value::map().with("Limit", 10_u64))
//!     .build();
//! let response = client.call_v3(request).await?;
//! println!("{}", response.text().await?);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod multipart;
pub mod query;
pub mod request;

pub use client::TcloudClient;
pub use error::{HttpError, HttpResult};
pub use multipart::{encode_multipart, generate_boundary};
pub use request::{ApiRequest, build_v1_request, build_v3_request};
