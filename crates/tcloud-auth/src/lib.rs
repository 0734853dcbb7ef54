//! Request signing for Tencent Cloud APIs.
//!
//! This crate computes the two signature schemes accepted by the Tencent Cloud
//! API gateway:
//!
//! - **v1** (`HmacSHA1` / `HmacSHA256`): the caller's parameter tree is flattened
//!   into dotted keys, merged with control fields, sorted, and signed as a query
//!   string.
//! - **v3** (`TC3-HMAC-SHA256`): a canonical request is built from the method,
//!   URL, two fixed headers, and the payload hash, then signed with a key derived
//!   from the request date and service.
//!
//! Everything here is a pure function of its inputs except [`materialize()`],
//! which drains byte streams before anything is hashed. Sending the request is
//! left to the caller.
//!
//! # Usage
//!
//! ```rust
//! use tcloud_auth::authorization::authorization_header;
//! use tcloud_auth::canonical::{SignableRequest, build_canonical_request};
//! use tcloud_auth::tc3::sign_v3;
//!
//! let uri: http::Uri = "https://cvm.tencentcloudapi.com/?Limit=10&Offset=0".parse().unwrap();
//! let canonical = build_canonical_request(&SignableRequest {
//!     method: &http::Method::GET,
//!     uri: &uri,
//!     payload: None,
//!     multipart: false,
//!     boundary: None,
//! })
//! .unwrap();
//! let signature = sign_v3(&canonical, 1_700_000_000, "cvm", "secret").unwrap();
//! let header = authorization_header("AKIDEXAMPLE", &signature);
//! assert!(header.starts_with("TC3-HMAC-SHA256 Credential=AKIDEXAMPLE/2023-11-14/cvm/tc3_request"));
//! ```
//!
//! # Modules
//!
//! - [`value`] - The parameter tree
//! - [`flatten`](mod@flatten) - Dotted-key flattening and null removal
//! - [`materialize`](mod@materialize) - Draining byte streams into buffers
//! - [`sigv1`] - v1 parameter canonicalization and signing
//! - [`payload`] - v3 payload hashing, JSON and multipart
//! - [`canonical`] - v3 canonical request construction
//! - [`tc3`] - v3 key derivation and signing
//! - [`signature`] - The signature value produced by either scheme
//! - [`authorization`] - v3 `Authorization` header assembly
//! - [`error`] - Signing error types

pub mod authorization;
pub mod canonical;
pub mod error;
pub mod flatten;
pub mod materialize;
pub mod payload;
pub mod signature;
pub mod sigv1;
pub mod tc3;
pub mod value;

pub use authorization::authorization_header;
pub use canonical::{CanonicalRequest, SignableRequest, build_canonical_request};
pub use error::{AuthError, AuthResult};
pub use flatten::{FlatParams, flatten, remove_nulls};
pub use materialize::materialize;
pub use sigv1::{SignParams, SignatureMethod, sign, sign_v1};
pub use signature::{Signature, SignatureAlgorithm};
pub use tc3::sign_v3;
pub use value::{ByteStream, Scalar, Value};
