//! TC3-HMAC-SHA256 key derivation and signing.
//!
//! ```text
//! StringToSign  = "TC3-HMAC-SHA256\n" + Timestamp + "\n" + CredentialScope + "\n"
//!                 + HexSHA256(CanonicalRequest)
//! SecretDate    = HMAC-SHA256("TC3" + SecretKey, Date)
//! SecretService = HMAC-SHA256(SecretDate, Service)
//! SecretSigning = HMAC-SHA256(SecretService, "tc3_request")
//! Signature     = Hex(HMAC-SHA256(SecretSigning, StringToSign))
//! ```
//!
//! `Date` is the UTC calendar date of the request timestamp, `yyyy-mm-dd`.

use chrono::DateTime;
use hmac::{Hmac, KeyInit, Mac};
use sha2::Sha256;
use tracing::debug;

use crate::canonical::{CanonicalRequest, SIGNED_HEADERS};
use crate::error::{AuthError, AuthResult};
use crate::signature::{Signature, SignatureAlgorithm};

type HmacSha256 = Hmac<Sha256>;

/// The algorithm label for v3 signatures.
pub const TC3_ALGORITHM: &str = "TC3-HMAC-SHA256";

/// Terminator of the credential scope and the key derivation chain.
const TC3_REQUEST: &str = "tc3_request";

/// Format a Unix timestamp as its UTC date, `yyyy-mm-dd`.
///
/// # Errors
///
/// Returns [`AuthError::InvalidTimestamp`] if the timestamp is out of range.
///
/// # Examples
///
/// ```
/// use tcloud_auth::tc3::format_date;
///
/// assert_eq!(format_date(1_700_000_000).unwrap(), "2023-11-14");
/// ```
pub fn format_date(timestamp: i64) -> AuthResult<String> {
    let datetime =
        DateTime::from_timestamp(timestamp, 0).ok_or(AuthError::InvalidTimestamp(timestamp))?;
    Ok(datetime.format("%Y-%m-%d").to_string())
}

/// Build the credential scope `{date}/{service}/tc3_request`.
#[must_use]
pub fn credential_scope(date: &str, service: &str) -> String {
    format!("{date}/{service}/{TC3_REQUEST}")
}

/// Build the v3 string to sign.
///
/// # Examples
///
/// ```
/// use tcloud_auth::tc3::build_string_to_sign;
///
/// let sts = build_string_to_sign(1_700_000_000, "2023-11-14/cvm/tc3_request", "abc");
/// assert_eq!(sts, "TC3-HMAC-SHA256\n1700000000\n2023-11-14/cvm/tc3_request\nabc");
/// ```
#[must_use]
pub fn build_string_to_sign(
    timestamp: i64,
    credential_scope: &str,
    hashed_canonical_request: &str,
) -> String {
    format!("{TC3_ALGORITHM}\n{timestamp}\n{credential_scope}\n{hashed_canonical_request}")
}

/// Derive the v3 signing key for a date and service.
#[must_use]
pub fn derive_signing_key(secret_key: &str, date: &str, service: &str) -> Vec<u8> {
    let secret_date = hmac_sha256(format!("TC3{secret_key}").as_bytes(), date.as_bytes());
    let secret_service = hmac_sha256(&secret_date, service.as_bytes());
    hmac_sha256(&secret_service, TC3_REQUEST.as_bytes())
}

/// Compute the hex HMAC-SHA256 of `string_to_sign` under `signing_key`.
#[must_use]
pub fn compute_signature(signing_key: &[u8], string_to_sign: &str) -> String {
    hex::encode(hmac_sha256(signing_key, string_to_sign.as_bytes()))
}

/// Sign a canonical request.
///
/// # Errors
///
/// Returns [`AuthError::EmptySecretKey`] if `secret_key` is empty, or
/// [`AuthError::InvalidTimestamp`] if `timestamp` has no UTC date.
pub fn sign_v3(
    canonical: &CanonicalRequest,
    timestamp: i64,
    service: &str,
    secret_key: &str,
) -> AuthResult<Signature> {
    if secret_key.is_empty() {
        return Err(AuthError::EmptySecretKey);
    }

    let date = format_date(timestamp)?;
    let scope = credential_scope(&date, service);
    let string_to_sign = build_string_to_sign(timestamp, &scope, &canonical.hashed());
    debug!(string_to_sign = %string_to_sign, "built v3 string to sign");

    let signing_key = derive_signing_key(secret_key, &date, service);
    let value = compute_signature(&signing_key, &string_to_sign);

    Ok(Signature {
        algorithm: SignatureAlgorithm::Tc3HmacSha256,
        credential_scope: Some(scope),
        signed_headers: Some(SIGNED_HEADERS),
        value,
    })
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}
