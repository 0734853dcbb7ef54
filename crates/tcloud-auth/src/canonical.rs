//! Canonical request construction for TC3-HMAC-SHA256.
//!
//! ```text
//! HTTPRequestMethod\n
//! CanonicalURI\n
//! CanonicalQueryString\n
//! content-type:{ContentType}\n
//! host:{Host}\n
//! \n
//! content-type;host\n
//! HashedRequestPayload
//! ```
//!
//! Exactly two headers are signed, always in this order. The path and query are
//! taken from the request URL verbatim; for GET requests the caller serializes
//! the parameters into the URL before building the canonical request.

use http::{Method, Uri};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{AuthError, AuthResult};
use crate::payload::{hash_json_payload, hash_multipart_payload};
use crate::value::Value;

/// The signed header list. Never varies.
pub const SIGNED_HEADERS: &str = "content-type;host";

/// Content type of GET requests.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Content type of non-multipart POST requests.
pub const APPLICATION_JSON: &str = "application/json";

/// The parts of an outbound request that participate in the v3 signature.
#[derive(Debug, Clone, Copy)]
pub struct SignableRequest<'a> {
    /// HTTP method; only GET and POST are signed.
    pub method: &'a Method,
    /// Full request URL, including the serialized query for GET requests.
    pub uri: &'a Uri,
    /// The cleaned, materialized POST payload. `None` hashes the empty string.
    pub payload: Option<&'a Value>,
    /// Whether the POST body is sent as `multipart/form-data`.
    pub multipart: bool,
    /// The multipart boundary. Required when `multipart` is set on a POST.
    pub boundary: Option<&'a str>,
}

/// A canonical request, ready to be hashed and signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    /// Uppercase HTTP method.
    pub method: String,
    /// URL path, verbatim.
    pub path: String,
    /// URL query without the leading `?`.
    pub query: String,
    /// Value of the signed `content-type` header.
    pub content_type: String,
    /// Value of the signed `host` header.
    pub host: String,
    /// Hex SHA-256 of the request body.
    pub payload_hash: String,
}

impl CanonicalRequest {
    /// Render the newline-joined canonical request string.
    #[must_use]
    pub fn to_canonical_string(&self) -> String {
        format!(
            "{}\n{}\n{}\ncontent-type:{}\nhost:{}\n\n{SIGNED_HEADERS}\n{}",
            self.method, self.path, self.query, self.content_type, self.host, self.payload_hash
        )
    }

    /// Hex SHA-256 of the canonical request string.
    #[must_use]
    pub fn hashed(&self) -> String {
        hex::encode(Sha256::digest(self.to_canonical_string().as_bytes()))
    }
}

/// Derive the `host` header value from a URL: the lowercase host name, plus the
/// port when it differs from the scheme's default.
///
/// # Errors
///
/// Returns [`AuthError::InvalidUrl`] if the URL has no host.
///
/// # Examples
///
/// ```
/// use tcloud_auth::canonical::host_of;
///
/// let uri: http::Uri = "https://CVM.tencentcloudapi.com:443/".parse().unwrap();
/// assert_eq!(host_of(&uri).unwrap(), "cvm.tencentcloudapi.com");
///
/// let uri: http::Uri = "http://localhost:8080/".parse().unwrap();
/// assert_eq!(host_of(&uri).unwrap(), "localhost:8080");
/// ```
pub fn host_of(uri: &Uri) -> AuthResult<String> {
    let host = uri
        .host()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| AuthError::InvalidUrl(uri.to_string()))?
        .to_ascii_lowercase();

    let default_port = match uri.scheme_str() {
        Some("http") => Some(80),
        Some("https") => Some(443),
        _ => None,
    };

    match uri.port_u16() {
        Some(port) if Some(port) != default_port => Ok(format!("{host}:{port}")),
        _ => Ok(host),
    }
}

/// The signed `content-type` value for a request.
///
/// # Errors
///
/// Returns [`AuthError::UnsupportedMethod`] for methods other than GET and POST,
/// or [`AuthError::MissingBoundary`] for a multipart POST without a boundary.
pub fn content_type(
    method: &Method,
    multipart: bool,
    boundary: Option<&str>,
) -> AuthResult<String> {
    match *method {
        Method::GET => Ok(FORM_URLENCODED.to_owned()),
        Method::POST if multipart => {
            let boundary = boundary.ok_or(AuthError::MissingBoundary)?;
            Ok(format!("multipart/form-data; boundary={boundary}"))
        }
        Method::POST => Ok(APPLICATION_JSON.to_owned()),
        _ => Err(AuthError::UnsupportedMethod(method.to_string())),
    }
}

/// Build the canonical request for `req`.
///
/// # Errors
///
/// Returns an error if the method is unsupported, the URL has no host, a
/// multipart boundary is missing, or the payload cannot be hashed (an unread
/// stream, or a multipart field that is neither a string nor bytes).
pub fn build_canonical_request(req: &SignableRequest<'_>) -> AuthResult<CanonicalRequest> {
    let content_type = content_type(req.method, req.multipart, req.boundary)?;
    let host = host_of(req.uri)?;

    let payload_hash = match (req.method, req.boundary) {
        (&Method::POST, Some(boundary)) if req.multipart => {
            let empty = Value::map();
            hash_multipart_payload(req.payload.unwrap_or(&empty), boundary)?
        }
        _ => hash_json_payload(req.payload)?,
    };

    let canonical = CanonicalRequest {
        method: req.method.as_str().to_owned(),
        path: req.uri.path().to_owned(),
        query: req.uri.query().unwrap_or_default().to_owned(),
        content_type,
        host,
        payload_hash,
    };
    debug!(canonical_request = %canonical.to_canonical_string(), "built canonical request");
    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::payload::EMPTY_PAYLOAD_HASH;

    fn plain_request<'a>(method: &'a Method, uri: &'a Uri) -> SignableRequest<'a> {
        SignableRequest {
            method,
            uri,
            payload: None,
            multipart: false,
            boundary: None,
        }
    }

    #[test]
    fn test_should_build_get_canonical_request() {
        let uri: Uri = "https://cvm.tencentcloudapi.com/?Limit=10&Offset=0"
            .parse()
            .unwrap();
        let canonical = build_canonical_request(&plain_request(&Method::GET, &uri)).unwrap();

        assert_eq!(canonical.payload_hash, EMPTY_PAYLOAD_HASH);
        assert_eq!(
            canonical.to_canonical_string(),
            "GET\n/\nLimit=10&Offset=0\n\
             content-type:application/x-www-form-urlencoded\n\
             host:cvm.tencentcloudapi.com\n\n\
             content-type;host\n\
             e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            canonical.hashed(),
            "91c9c192c14460df6c1ffc69e34e6c5e90708de2a6d282cccf957dbf1aa7f3a7"
        );
    }

    #[test]
    fn test_should_build_json_post_canonical_request() {
        let uri: Uri = "https://cvm.tencentcloudapi.com/".parse().unwrap();
        let filter = Value::map()
            .with("Values", Value::List(vec!["unnamed".into()]))
            .with("Name", "instance-name");
        let payload = Value::map()
            .with("Limit", 1_u64)
            .with("Filters", Value::List(vec![filter]));

        let canonical = build_canonical_request(&SignableRequest {
            method: &Method::POST,
            uri: &uri,
            payload: Some(&payload),
            multipart: false,
            boundary: None,
        })
        .unwrap();

        assert_eq!(canonical.content_type, APPLICATION_JSON);
        assert_eq!(canonical.query, "");
        assert_eq!(
            canonical.payload_hash,
            "cbdde9cc02491639756df5bf2d03792ce620766b94135a143df70e448357a1a3"
        );
        assert_eq!(
            canonical.hashed(),
            "b94b79c7c7048adac756e31a38a9e9c8f22a5db52eef19660d7a20c7e5c051fd"
        );
    }

    #[test]
    fn test_should_build_multipart_canonical_request() {
        let uri: Uri = "https://ocr.tencentcloudapi.com/".parse().unwrap();
        let payload = Value::map()
            .with("a", "1")
            .with("b", Bytes::from_static(b"\x01\x02\x03"));

        let canonical = build_canonical_request(&SignableRequest {
            method: &Method::POST,
            uri: &uri,
            payload: Some(&payload),
            multipart: true,
            boundary: Some("testboundary"),
        })
        .unwrap();

        assert_eq!(
            canonical.content_type,
            "multipart/form-data; boundary=testboundary"
        );
        assert_eq!(
            canonical.payload_hash,
            "483791ca8372d8fe5d2e8eb5958fe8abc87aa37ea135d3060a08e547cc25c5cc"
        );
        assert_eq!(
            canonical.hashed(),
            "8f52ce2008d6ee411cf52603ae4846d89ea909426a8785dbc229b42e36d0d344"
        );
    }

    #[test]
    fn test_should_always_sign_content_type_and_host() {
        let uri: Uri = "https://cvm.tencentcloudapi.com/".parse().unwrap();
        let payload = Value::map().with("a", "1");
        for (method, multipart) in [
            (Method::GET, false),
            (Method::GET, true),
            (Method::POST, false),
            (Method::POST, true),
        ] {
            let canonical = build_canonical_request(&SignableRequest {
                method: &method,
                uri: &uri,
                payload: Some(&payload),
                multipart,
                boundary: Some("b"),
            })
            .unwrap();
            let rendered = canonical.to_canonical_string();
            let lines: Vec<&str> = rendered.split('\n').collect();
            assert!(lines[3].starts_with("content-type:"));
            assert!(lines[4].starts_with("host:"));
            assert_eq!(lines[5], "");
            assert_eq!(lines[6], SIGNED_HEADERS);
        }
    }

    #[test]
    fn test_should_reject_multipart_post_without_boundary() {
        let uri: Uri = "https://ocr.tencentcloudapi.com/".parse().unwrap();
        let result = build_canonical_request(&SignableRequest {
            method: &Method::POST,
            uri: &uri,
            payload: None,
            multipart: true,
            boundary: None,
        });
        assert!(matches!(result, Err(AuthError::MissingBoundary)));
    }

    #[test]
    fn test_should_reject_unsupported_method() {
        let uri: Uri = "https://cvm.tencentcloudapi.com/".parse().unwrap();
        let result = build_canonical_request(&plain_request(&Method::PUT, &uri));
        assert!(matches!(result, Err(AuthError::UnsupportedMethod(m)) if m == "PUT"));
    }

    #[test]
    fn test_should_reject_url_without_host() {
        let uri: Uri = "/relative?x=1".parse().unwrap();
        let result = build_canonical_request(&plain_request(&Method::GET, &uri));
        assert!(matches!(result, Err(AuthError::InvalidUrl(_))));
    }

    #[test]
    fn test_should_keep_non_default_port_in_host() {
        let uri: Uri = "https://Example.COM:8443/v3".parse().unwrap();
        assert_eq!(host_of(&uri).unwrap(), "example.com:8443");

        let uri: Uri = "http://example.com:80/".parse().unwrap();
        assert_eq!(host_of(&uri).unwrap(), "example.com");
    }

    #[test]
    fn test_should_use_path_verbatim() {
        let uri: Uri = "https://example.com/a/../b%20c?x=1".parse().unwrap();
        let canonical = build_canonical_request(&plain_request(&Method::GET, &uri)).unwrap();
        assert_eq!(canonical.path, "/a/../b%20c");
        assert_eq!(canonical.query, "x=1");
    }
}
