//! The HTTP client.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::Utc;
use tcloud_core::{ClientConfig, Credential};
use tracing::{debug, info};

use crate::error::HttpResult;
use crate::multipart::generate_boundary;
use crate::request::{ApiRequest, build_v1_request, build_v3_request};

/// Signs and sends API calls.
///
/// Every call is stamped with the current time (and, for v1, a fresh nonce)
/// and signed again, so retrying a call means calling it again. Responses are
/// returned unparsed.
///
/// Cloning is cheap; clones share the connection pool, configuration, and
/// credential.
#[derive(Debug, Clone)]
pub struct TcloudClient {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
    credential: Arc<Credential>,
}

impl TcloudClient {
    /// Create a client.
    ///
    /// The proxy is the configured one, falling back to the `http_proxy` value
    /// captured in the configuration. The system proxy settings are not read.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the proxy URL
    /// cannot be parsed.
    pub fn new(config: ClientConfig, credential: Credential) -> HttpResult<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(config.timeout_secs));
        if let Some(proxy) = config.effective_proxy() {
            debug!(proxy, "routing requests through proxy");
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }

        Ok(Self {
            http: builder.build()?,
            config: Arc::new(config),
            credential: Arc::new(credential),
        })
    }

    /// The client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sign `request` with `HmacSHA1` / `HmacSHA256` and send it.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails or the request cannot be sent.
    pub async fn call_v1(&self, request: ApiRequest) -> HttpResult<reqwest::Response> {
        let nonce = rand::random::<u16>();
        let timestamp = Utc::now().timestamp();
        let signed =
            build_v1_request(&self.config, &self.credential, request, nonce, timestamp).await?;
        self.send(signed).await
    }

    /// Sign `request` with `TC3-HMAC-SHA256` and send it.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails or the request cannot be sent.
    pub async fn call_v3(&self, request: ApiRequest) -> HttpResult<reqwest::Response> {
        let boundary = request.multipart.then(generate_boundary);
        let timestamp = Utc::now().timestamp();
        let signed = build_v3_request(
            &self.config,
            &self.credential,
            request,
            timestamp,
            boundary.as_deref(),
        )
        .await?;
        self.send(signed).await
    }

    async fn send(&self, request: http::Request<Bytes>) -> HttpResult<reqwest::Response> {
        let request = reqwest::Request::try_from(request)?;
        info!(method = %request.method(), url = %request.url(), "sending request");
        let response = self.http.execute(request).await?;
        debug!(status = %response.status(), "received response");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HttpError;

    #[test]
    fn test_should_create_client_with_default_config() {
        let client = TcloudClient::new(ClientConfig::default(), Credential::new("id", "key"));
        assert!(client.is_ok());
    }

    #[test]
    fn test_should_create_client_with_proxy() {
        let config = ClientConfig::builder()
            .proxy("http://127.0.0.1:3128".into())
            .build();
        let client = TcloudClient::new(config, Credential::new("id", "key")).unwrap();
        assert_eq!(client.config().effective_proxy(), Some("http://127.0.0.1:3128"));
    }

    #[test]
    fn test_should_reject_invalid_config() {
        let config = ClientConfig::builder().scheme("ftp".into()).build();
        let result = TcloudClient::new(config, Credential::new("id", "key"));
        assert!(matches!(result, Err(HttpError::Config(_))));
    }
}
