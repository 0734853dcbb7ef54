//! `Authorization` header assembly for v3 requests.

use crate::signature::Signature;

/// Format the `Authorization` header value for a v3 signature.
///
/// A v1 signature has no credential scope or signed headers; those parts are
/// left empty.
///
/// # Examples
///
/// ```
/// use tcloud_auth::authorization::authorization_header;
/// use tcloud_auth::signature::{Signature, SignatureAlgorithm};
///
/// let signature = Signature {
///     algorithm: SignatureAlgorithm::Tc3HmacSha256,
///     credential_scope: Some("2023-11-14/cvm/tc3_request".to_owned()),
///     signed_headers: Some("content-type;host"),
///     value: "abc123".to_owned(),
/// };
/// assert_eq!(
///     authorization_header("AKIDEXAMPLE", &signature),
///     "TC3-HMAC-SHA256 Credential=AKIDEXAMPLE/2023-11-14/cvm/tc3_request, \
///      SignedHeaders=content-type;host, Signature=abc123"
/// );
/// ```
#[must_use]
pub fn authorization_header(secret_id: &str, signature: &Signature) -> String {
    let scope = signature.credential_scope.as_deref().unwrap_or_default();
    let signed_headers = signature.signed_headers.unwrap_or_default();
    format!(
        "{} Credential={secret_id}/{scope}, SignedHeaders={signed_headers}, Signature={}",
        signature.algorithm, signature.value
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::CanonicalRequest;
    use crate::payload::EMPTY_PAYLOAD_HASH;
    use crate::tc3::sign_v3;

    #[test]
    fn test_should_assemble_authorization_header() {
        let canonical = CanonicalRequest {
            method: "GET".to_owned(),
            path: "/".to_owned(),
            query: "Limit=10&Offset=0".to_owned(),
            content_type: "application/x-www-form-urlencoded".to_owned(),
            host: "cvm.tencentcloudapi.com".to_owned(),
            payload_hash: EMPTY_PAYLOAD_HASH.to_owned(),
        };
        let signature = sign_v3(
            &canonical,
            1_700_000_000,
            "cvm",
            "Gu5t9xGARNpq86cd98joQYCN3EXAMPLE",
        )
        .unwrap();

        assert_eq!(
            authorization_header("AKIDz8krbsJ5yKBZQpn74WFkmLPx3EXAMPLE", &signature),
            "TC3-HMAC-SHA256 \
             Credential=AKIDz8krbsJ5yKBZQpn74WFkmLPx3EXAMPLE/2023-11-14/cvm/tc3_request, \
             SignedHeaders=content-type;host, \
             Signature=7b6482b68b0d665fb6d56ac6b6eb17ec0cc6a9f685b21bad6fcaebd46064c7e9"
        );
    }
}
