//! `multipart/form-data` body encoding.
//!
//! The body is built from the same per-field header text that the signer
//! hashes ([`tcloud_auth::payload::multipart_parts`]), so the bytes sent always
//! match the bytes signed.

use bytes::{BufMut, Bytes, BytesMut};
use tcloud_auth::AuthResult;
use tcloud_auth::payload::multipart_parts;
use tcloud_auth::value::Value;
use uuid::Uuid;

/// Generate a fresh multipart boundary.
#[must_use]
pub fn generate_boundary() -> String {
    format!("----tcloud{}", Uuid::new_v4().simple())
}

/// Encode a materialized payload map as a multipart body.
///
/// # Errors
///
/// Returns an [`AuthError`](tcloud_auth::AuthError) if the payload is not a
/// map, or holds a field that is neither a string nor bytes.
pub fn encode_multipart(payload: &Value, boundary: &str) -> AuthResult<Bytes> {
    let parts = multipart_parts(payload)?;
    let mut body = BytesMut::new();
    for part in &parts {
        body.put_slice(format!("--{boundary}\r\n").as_bytes());
        body.put_slice(part.headers().as_bytes());
        body.put_slice(part.body());
        body.put_slice(b"\r\n");
    }
    body.put_slice(format!("--{boundary}--\r\n").as_bytes());
    Ok(body.freeze())
}
