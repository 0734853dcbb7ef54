//! Payload hashing for TC3-HMAC-SHA256.
//!
//! The canonical request carries the hex SHA-256 of the exact body bytes the
//! gateway receives. JSON bodies are hashed over their serialization. Multipart
//! bodies are rebuilt field by field from the parameter tree; the layout is:
//!
//! ```text
//! --{boundary}\r\n
//! Content-Disposition: form-data; name="{key}"\r\n
//! [Content-Type: application/octet-stream\r\n]      (byte fields only)
//! \r\n
//! {content}\r\n
//! ...
//! --{boundary}--\r\n
//! ```
//!
//! [`multipart_parts`] is the single source of the per-field header text, so the
//! hash here and the body written by the transport cannot drift apart.

use bytes::Bytes;
use sha2::{Digest, Sha256};

use crate::error::{AuthError, AuthResult};
use crate::value::{Scalar, Value};

/// SHA-256 of the empty string.
pub const EMPTY_PAYLOAD_HASH: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Content type attached to byte-blob multipart fields.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Compute the SHA-256 of `payload` as a lowercase hex string.
///
/// # Examples
///
/// ```
/// use tcloud_auth::payload::hash_payload;
///
/// assert_eq!(
///     hash_payload(b""),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
#[must_use]
pub fn hash_payload(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

/// Serialize a payload tree to the JSON bytes sent as a request body.
///
/// # Errors
///
/// Returns [`AuthError::Serialize`] if the tree still contains a byte stream.
pub fn json_body(payload: Option<&Value>) -> AuthResult<Vec<u8>> {
    match payload {
        Some(value) => Ok(serde_json::to_vec(value)?),
        None => Ok(Vec::new()),
    }
}

/// Hash the JSON serialization of `payload`, or the empty string when absent.
///
/// # Errors
///
/// Returns [`AuthError::Serialize`] if the tree still contains a byte stream.
pub fn hash_json_payload(payload: Option<&Value>) -> AuthResult<String> {
    Ok(hash_payload(&json_body(payload)?))
}

/// The content of one multipart field.
#[derive(Debug, Clone, Copy)]
pub enum PartContent<'a> {
    /// A text field.
    Text(&'a str),
    /// A binary field, sent as `application/octet-stream`.
    Binary(&'a Bytes),
}

/// One field of a multipart body.
#[derive(Debug, Clone, Copy)]
pub struct MultipartPart<'a> {
    /// The field name.
    pub name: &'a str,
    /// The field content.
    pub content: PartContent<'a>,
}

impl MultipartPart<'_> {
    /// The part headers, including the blank line that ends them.
    #[must_use]
    pub fn headers(&self) -> String {
        match self.content {
            PartContent::Text(_) => format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                self.name
            ),
            PartContent::Binary(_) => format!(
                "Content-Disposition: form-data; name=\"{}\"\r\nContent-Type: {OCTET_STREAM}\r\n\r\n",
                self.name
            ),
        }
    }

    /// The raw content bytes.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        match self.content {
            PartContent::Text(text) => text.as_bytes(),
            PartContent::Binary(bytes) => bytes.as_ref(),
        }
    }
}

/// Split a payload map into multipart fields, in insertion order.
///
/// Absent fields are skipped. Only string and byte-blob fields can be sent.
///
/// # Errors
///
/// Returns [`AuthError::InvalidMultipartPayload`] if `payload` is not a map,
/// [`AuthError::UnmaterializedStream`] for a byte stream, and
/// [`AuthError::UnsupportedMultipartField`] for any other non-string field.
pub fn multipart_parts(payload: &Value) -> AuthResult<Vec<MultipartPart<'_>>> {
    let Value::Map(fields) = payload else {
        return Err(AuthError::InvalidMultipartPayload(payload.kind()));
    };

    let mut parts = Vec::with_capacity(fields.len());
    for (name, value) in fields {
        let content = match value {
            Value::Absent => continue,
            Value::Scalar(Scalar::String(text)) => PartContent::Text(text),
            Value::Bytes(bytes) => PartContent::Binary(bytes),
            Value::Stream(_) => return Err(AuthError::UnmaterializedStream(name.clone())),
            other => {
                return Err(AuthError::UnsupportedMultipartField {
                    name: name.clone(),
                    kind: other.kind(),
                });
            }
        };
        parts.push(MultipartPart { name, content });
    }
    Ok(parts)
}

/// Hash the multipart body that [`multipart_parts`] describes for `boundary`.
///
/// # Errors
///
/// Returns the same errors as [`multipart_parts`].
pub fn hash_multipart_payload(payload: &Value, boundary: &str) -> AuthResult<String> {
    let mut hasher = Sha256::new();
    for part in multipart_parts(payload)? {
        hasher.update(format!("--{boundary}\r\n").as_bytes());
        hasher.update(part.headers().as_bytes());
        hasher.update(part.body());
        hasher.update(b"\r\n");
    }
    hasher.update(format!("--{boundary}--\r\n").as_bytes());
    Ok(hex::encode(hasher.finalize()))
}
