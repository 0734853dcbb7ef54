//! The signature produced by either scheme.

use std::fmt;

use crate::sigv1::SignatureMethod;
use crate::tc3::TC3_ALGORITHM;

/// The signing algorithm that produced a [`Signature`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureAlgorithm {
    /// v1 `HmacSHA1`.
    HmacSha1,
    /// v1 `HmacSHA256`.
    HmacSha256,
    /// v3 `TC3-HMAC-SHA256`.
    Tc3HmacSha256,
}

impl SignatureAlgorithm {
    /// The wire name of the algorithm.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HmacSha1 => "HmacSHA1",
            Self::HmacSha256 => "HmacSHA256",
            Self::Tc3HmacSha256 => TC3_ALGORITHM,
        }
    }
}

impl From<SignatureMethod> for SignatureAlgorithm {
    fn from(method: SignatureMethod) -> Self {
        match method {
            SignatureMethod::HmacSha1 => Self::HmacSha1,
            SignatureMethod::HmacSha256 => Self::HmacSha256,
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A computed signature.
///
/// v1 signatures carry only the algorithm and the base64 value. v3 signatures
/// also carry the credential scope and the signed header list, and their value
/// is lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// The algorithm that produced `value`.
    pub algorithm: SignatureAlgorithm,
    /// `{date}/{service}/tc3_request`, v3 only.
    pub credential_scope: Option<String>,
    /// Always `content-type;host`, v3 only.
    pub signed_headers: Option<&'static str>,
    /// The signature itself.
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_name_algorithms() {
        assert_eq!(SignatureAlgorithm::Tc3HmacSha256.to_string(), "TC3-HMAC-SHA256");
        assert_eq!(SignatureAlgorithm::HmacSha1.as_str(), "HmacSHA1");
        assert_eq!(
            SignatureAlgorithm::from(SignatureMethod::HmacSha256),
            SignatureAlgorithm::HmacSha256
        );
    }
}
