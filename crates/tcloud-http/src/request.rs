//! Signed request assembly.
//!
//! [`build_v1_request`] and [`build_v3_request`] turn an [`ApiRequest`] into a
//! complete `http::Request<Bytes>`: URL, headers, and body, signed for the given
//! timestamp. They take the time (and nonce) as arguments so the output is
//! reproducible; [`TcloudClient`](crate::client::TcloudClient) stamps the
//! current values.

use std::str::FromStr;

use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE, HOST, HeaderMap, HeaderValue};
use http::{Method, Request, Uri};
use tcloud_auth::canonical::{FORM_URLENCODED, SignableRequest, build_canonical_request};
use tcloud_auth::payload::json_body;
use tcloud_auth::sigv1::{ControlParams, build_sign_params};
use tcloud_auth::{
    AuthError, SignatureMethod, Value, authorization_header, flatten, materialize, remove_nulls,
    sign_v1, sign_v3,
};
use tcloud_core::{ClientConfig, Credential};
use tracing::debug;
use typed_builder::TypedBuilder;

use crate::error::HttpResult;
use crate::multipart::encode_multipart;
use crate::query::encode_query;

const X_TC_ACTION: &str = "x-tc-action";
const X_TC_TIMESTAMP: &str = "x-tc-timestamp";
const X_TC_VERSION: &str = "x-tc-version";
const X_TC_TOKEN: &str = "x-tc-token";
const X_TC_REGION: &str = "x-tc-region";
const X_TC_LANGUAGE: &str = "x-tc-language";

/// One API call: which action to invoke, and with what parameters.
///
/// # Examples
///
/// ```
/// use tcloud_auth::Value;
/// use tcloud_http::ApiRequest;
///
/// let request = ApiRequest::builder()
///     .service("cvm")
///     .action("DescribeInstances")
///     .version("2017-03-12")
///     .params(Value::map().with("Limit", 10_u64))
///     .build();
/// assert_eq!(request.method, http::Method::POST);
/// ```
#[derive(Debug, TypedBuilder)]
pub struct ApiRequest {
    /// Service name, e.g. `cvm`. Selects the default endpoint and the v3
    /// credential scope.
    #[builder(setter(into))]
    pub service: String,

    /// API operation name.
    #[builder(setter(into))]
    pub action: String,

    /// API version, e.g. `2017-03-12`.
    #[builder(setter(into))]
    pub version: String,

    /// HTTP method, GET or POST.
    #[builder(default = Method::POST)]
    pub method: Method,

    /// Caller parameters.
    #[builder(default = Value::map())]
    pub params: Value,

    /// Send a v3 POST body as `multipart/form-data` instead of JSON.
    #[builder(default = false)]
    pub multipart: bool,

    /// Extra headers. Never signed; signing headers of the same name win.
    #[builder(default)]
    pub headers: HeaderMap,
}

/// Build a v1 (`HmacSHA1` / `HmacSHA256`) signed request.
///
/// The signature method is parsed from the configuration before anything else
/// happens. GET requests carry the signed parameters as the query string; POST
/// requests carry them as a form-encoded body.
///
/// # Errors
///
/// Returns an error for an unknown signature method, a method other than GET
/// or POST, an empty secret key, a stream that cannot be read, or an endpoint
/// that does not form a valid URL.
pub async fn build_v1_request(
    config: &ClientConfig,
    credential: &Credential,
    request: ApiRequest,
    nonce: u16,
    timestamp: i64,
) -> HttpResult<Request<Bytes>> {
    let signature_method = SignatureMethod::from_str(&config.sign_method)?;
    ensure_supported(&request.method)?;

    let params = materialize(request.params, config.max_stream_bytes).await?;
    let endpoint = config.endpoint_for(&request.service);
    let control = ControlParams {
        action: &request.action,
        nonce,
        timestamp,
        version: &request.version,
        secret_id: credential.secret_id(),
        region: &config.region,
        token: credential.token(),
        language: &config.language,
        signature_method,
    };
    let mut sign_params = build_sign_params(&flatten(&params), &control);
    let signature = sign_v1(
        credential.secret_key(),
        &sign_params,
        &request.method,
        &endpoint,
        &config.path,
        signature_method,
    )?;
    sign_params.insert("Signature".to_owned(), signature.value);
    let encoded = encode_query(&sign_params);

    let base_url = config.base_url(&request.service);
    let mut headers = request.headers;
    let (uri, body) = if request.method == Method::GET {
        (format!("{base_url}?{encoded}"), Bytes::new())
    } else {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_URLENCODED));
        (base_url, Bytes::from(encoded))
    };
    let uri: Uri = uri.parse()?;

    debug!(
        action = %request.action,
        method = %request.method,
        %signature_method,
        "built v1 request"
    );
    assemble(request.method, uri, headers, body)
}

/// Build a v3 (`TC3-HMAC-SHA256`) signed request.
///
/// Streams are materialized and explicit nulls removed before anything is
/// hashed. GET requests carry the flattened parameters as the query string;
/// POST requests carry them as JSON, or as `multipart/form-data` with
/// `boundary` when [`ApiRequest::multipart`] is set.
///
/// # Errors
///
/// Returns an error for a method other than GET or POST, a multipart request
/// without a boundary, a multipart field that is neither a string nor bytes,
/// an empty secret key, a stream that cannot be read, or an endpoint that does
/// not form a valid URL.
pub async fn build_v3_request(
    config: &ClientConfig,
    credential: &Credential,
    request: ApiRequest,
    timestamp: i64,
    boundary: Option<&str>,
) -> HttpResult<Request<Bytes>> {
    ensure_supported(&request.method)?;
    let multipart = request.multipart && request.method == Method::POST;
    let boundary = if multipart {
        Some(boundary.ok_or(AuthError::MissingBoundary)?)
    } else {
        None
    };

    let params = remove_nulls(materialize(request.params, config.max_stream_bytes).await?);

    let base_url = config.base_url(&request.service);
    let (uri, body, payload) = if request.method == Method::GET {
        let flat = flatten(&params);
        let query = encode_query(flat.iter().map(|(k, v)| (k, v.to_param_string())));
        let uri = if query.is_empty() {
            base_url
        } else {
            format!("{base_url}?{query}")
        };
        (uri, Bytes::new(), None)
    } else {
        let body = match boundary {
            Some(boundary) => encode_multipart(&params, boundary)?,
            None => Bytes::from(json_body(Some(&params))?),
        };
        (base_url, body, Some(&params))
    };
    let uri: Uri = uri.parse()?;

    let canonical = build_canonical_request(&SignableRequest {
        method: &request.method,
        uri: &uri,
        payload,
        multipart,
        boundary,
    })?;
    let signature = sign_v3(
        &canonical,
        timestamp,
        &request.service,
        credential.secret_key(),
    )?;

    let mut headers = request.headers;
    headers.insert(HOST, HeaderValue::from_str(&canonical.host)?);
    headers.insert(CONTENT_TYPE, HeaderValue::from_str(&canonical.content_type)?);
    headers.insert(X_TC_ACTION, HeaderValue::from_str(&request.action)?);
    headers.insert(X_TC_TIMESTAMP, HeaderValue::from(timestamp));
    headers.insert(X_TC_VERSION, HeaderValue::from_str(&request.version)?);
    let optional = [
        (X_TC_TOKEN, credential.token().unwrap_or_default()),
        (X_TC_REGION, config.region.as_str()),
        (X_TC_LANGUAGE, config.language.as_str()),
    ];
    for (name, value) in optional {
        if !value.is_empty() {
            headers.insert(name, HeaderValue::from_str(value)?);
        }
    }
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&authorization_header(credential.secret_id(), &signature))?,
    );

    debug!(
        action = %request.action,
        method = %request.method,
        multipart,
        credential_scope = signature.credential_scope.as_deref().unwrap_or_default(),
        "built v3 request"
    );
    assemble(request.method, uri, headers, body)
}

fn ensure_supported(method: &Method) -> Result<(), AuthError> {
    if *method == Method::GET || *method == Method::POST {
        Ok(())
    } else {
        Err(AuthError::UnsupportedMethod(method.to_string()))
    }
}

fn assemble(
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> HttpResult<Request<Bytes>> {
    let mut request = Request::builder().method(method).uri(uri).body(body)?;
    *request.headers_mut() = headers;
    Ok(request)
}
