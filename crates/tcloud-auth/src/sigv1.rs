//! Legacy query-string signing (`HmacSHA1` / `HmacSHA256`).
//!
//! The v1 scheme signs the full, sorted parameter set:
//!
//! ```text
//! SignSource = HTTPMethod + Endpoint + Path + "?" + Key1=Value1&Key2=Value2...
//! Signature  = Base64(HMAC(SecretKey, SignSource))
//! ```
//!
//! Keys are sorted by byte-wise ascending order and values appear unencoded.
//! The same parameters (plus `Signature`) are then sent as the query string of a
//! GET request or as the form-encoded body of a POST request.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, KeyInit, Mac};
use sha1::Sha1;
use sha2::Sha256;
use tracing::{debug, warn};

use crate::error::{AuthError, AuthResult};
use crate::flatten::FlatParams;
use crate::signature::Signature;

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

/// Parameters to sign, sorted by key.
pub type SignParams = BTreeMap<String, String>;

/// The HMAC used to sign v1 requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SignatureMethod {
    /// `HmacSHA1`.
    HmacSha1,
    /// `HmacSHA256`.
    #[default]
    HmacSha256,
}

impl SignatureMethod {
    /// The wire name sent as the `SignatureMethod` parameter.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HmacSha1 => "HmacSHA1",
            Self::HmacSha256 => "HmacSHA256",
        }
    }
}

impl FromStr for SignatureMethod {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HmacSHA1" => Ok(Self::HmacSha1),
            "HmacSHA256" => Ok(Self::HmacSha256),
            other => Err(AuthError::UnsupportedSignatureMethod(other.to_owned())),
        }
    }
}

impl fmt::Display for SignatureMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed control fields merged into every v1 request.
#[derive(Debug, Clone, Copy)]
pub struct ControlParams<'a> {
    /// API operation name (`Action`).
    pub action: &'a str,
    /// Random integer in `[0, 65535]` (`Nonce`).
    pub nonce: u16,
    /// Current Unix time in seconds (`Timestamp`).
    pub timestamp: i64,
    /// API version (`Version`).
    pub version: &'a str,
    /// Access key ID (`SecretId`), omitted when empty.
    pub secret_id: &'a str,
    /// Region (`Region`), omitted when empty.
    pub region: &'a str,
    /// Temporary credential token (`Token`), omitted when `None` or empty.
    pub token: Option<&'a str>,
    /// Response language (`Language`), omitted when empty.
    pub language: &'a str,
    /// Signature method (`SignatureMethod`).
    pub signature_method: SignatureMethod,
}

/// Merge flattened caller parameters with the control fields.
///
/// Control fields replace caller parameters of the same name.
#[must_use]
pub fn build_sign_params(flat: &FlatParams, control: &ControlParams<'_>) -> SignParams {
    let mut params: SignParams = flat
        .iter()
        .map(|(k, v)| (k.clone(), v.to_param_string()))
        .collect();

    params.insert("Action".to_owned(), control.action.to_owned());
    params.insert("Nonce".to_owned(), control.nonce.to_string());
    params.insert("Timestamp".to_owned(), control.timestamp.to_string());
    params.insert("Version".to_owned(), control.version.to_owned());

    let optional = [
        ("SecretId", Some(control.secret_id)),
        ("Region", Some(control.region)),
        ("Token", control.token),
        ("Language", Some(control.language)),
    ];
    for (key, value) in optional {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            params.insert(key.to_owned(), value.to_owned());
        }
    }
    params.insert(
        "SignatureMethod".to_owned(),
        control.signature_method.as_str().to_owned(),
    );

    params
}

/// Build the v1 sign source string.
///
/// # Examples
///
/// ```
/// use tcloud_auth::sigv1::{SignParams, format_sign_string};
///
/// let mut params = SignParams::new();
/// params.insert("Action".to_owned(), "DescribeInstances".to_owned());
/// let source = format_sign_string(&params, &http::Method::GET, "cvm.tencentcloudapi.com", "/");
/// assert_eq!(source, "GETcvm.tencentcloudapi.com/?Action=DescribeInstances");
/// ```
#[must_use]
pub fn format_sign_string(
    params: &SignParams,
    method: &http::Method,
    endpoint: &str,
    path: &str,
) -> String {
    if params.contains_key("") {
        warn!("signing a parameter with an empty key");
    }

    let query = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}{endpoint}{path}?{query}", method.as_str())
}

/// Compute the v1 signature: `Base64(HMAC(secret_key, sign_str))`.
///
/// # Errors
///
/// Returns [`AuthError::EmptySecretKey`] if `secret_key` is empty.
pub fn sign(secret_key: &str, sign_str: &str, method: SignatureMethod) -> AuthResult<String> {
    if secret_key.is_empty() {
        return Err(AuthError::EmptySecretKey);
    }

    let digest = match method {
        SignatureMethod::HmacSha1 => {
            let mut mac = HmacSha1::new_from_slice(secret_key.as_bytes())
                .expect("HMAC can accept keys of any length");
            mac.update(sign_str.as_bytes());
            mac.finalize().into_bytes().to_vec()
        }
        SignatureMethod::HmacSha256 => {
            let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
                .expect("HMAC can accept keys of any length");
            mac.update(sign_str.as_bytes());
            mac.finalize().into_bytes().to_vec()
        }
    };

    Ok(BASE64.encode(digest))
}

/// Format the sign source for `params` and sign it.
///
/// The returned [`Signature`] carries no credential scope or signed headers;
/// its value is the base64 string sent as the `Signature` parameter.
///
/// # Errors
///
/// Returns [`AuthError::EmptySecretKey`] if `secret_key` is empty.
pub fn sign_v1(
    secret_key: &str,
    params: &SignParams,
    method: &http::Method,
    endpoint: &str,
    path: &str,
    signature_method: SignatureMethod,
) -> AuthResult<Signature> {
    let sign_str = format_sign_string(params, method, endpoint, path);
    debug!(sign_str = %sign_str, %signature_method, "built v1 sign source");
    Ok(Signature {
        algorithm: signature_method.into(),
        credential_scope: None,
        signed_headers: None,
        value: sign(secret_key, &sign_str, signature_method)?,
    })
}
