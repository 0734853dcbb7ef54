//! Client configuration.
//!
//! Provides [`ClientConfig`] for the transport and CLI. Values are loaded from
//! environment variables once, up front; the signing code only ever sees the
//! resolved values.

use serde::{Deserialize, Serialize};
use tracing::warn;
use typed_builder::TypedBuilder;

use crate::error::{TcloudError, TcloudResult};

/// Domain suffix of the public API gateway.
const GATEWAY_DOMAIN: &str = "tencentcloudapi.com";

/// Client configuration.
///
/// # Examples
///
/// ```
/// use tcloud_core::ClientConfig;
///
/// let config = ClientConfig::default();
/// assert_eq!(config.sign_method, "HmacSHA256");
/// assert_eq!(config.endpoint_for("cvm"), "cvm.tencentcloudapi.com");
/// assert_eq!(config.base_url("cvm"), "https://cvm.tencentcloudapi.com/");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Gateway host. Derived from the service name when unset.
    #[builder(default, setter(strip_option))]
    pub endpoint: Option<String>,

    /// URL scheme, `https` or `http`.
    #[builder(default = String::from("https"))]
    pub scheme: String,

    /// Request path.
    #[builder(default = String::from("/"))]
    pub path: String,

    /// Region sent with every request. Empty means none.
    #[builder(default)]
    pub region: String,

    /// Response language (e.g. `en-US`). Empty means the gateway default.
    #[builder(default)]
    pub language: String,

    /// v1 signature method name, `HmacSHA1` or `HmacSHA256`.
    #[builder(default = String::from("HmacSHA256"))]
    pub sign_method: String,

    /// Request timeout in seconds.
    #[builder(default = 60)]
    pub timeout_secs: u64,

    /// Explicit proxy URL. Takes precedence over `env_proxy`.
    #[builder(default, setter(strip_option))]
    pub proxy: Option<String>,

    /// Proxy URL captured from `http_proxy` when the configuration was loaded.
    #[builder(default, setter(strip_option))]
    pub env_proxy: Option<String>,

    /// Per-stream cap, in bytes, when buffering streamed parameters.
    #[builder(default, setter(strip_option))]
    pub max_stream_bytes: Option<u64>,

    /// Log level filter string (e.g. `"warn"`, `"debug"`).
    #[builder(default = String::from("warn"))]
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            scheme: String::from("https"),
            path: String::from("/"),
            region: String::new(),
            language: String::new(),
            sign_method: String::from("HmacSHA256"),
            timeout_secs: 60,
            proxy: None,
            env_proxy: None,
            max_stream_bytes: None,
            log_level: String::from("warn"),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables (falling back to defaults):
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `TENCENTCLOUD_ENDPOINT` | `{service}.tencentcloudapi.com` |
    /// | `TENCENTCLOUD_REGION` | (none) |
    /// | `TENCENTCLOUD_LANGUAGE` | (none) |
    /// | `TENCENTCLOUD_SIGN_METHOD` | `HmacSHA256` |
    /// | `TENCENTCLOUD_TIMEOUT` | `60` |
    /// | `TENCENTCLOUD_PROXY` | (none) |
    /// | `http_proxy` / `HTTP_PROXY` | (none) |
    /// | `TENCENTCLOUD_MAX_STREAM_BYTES` | (unlimited) |
    /// | `LOG_LEVEL` | `warn` |
    ///
    /// # Examples
    ///
    /// ```
    /// use tcloud_core::ClientConfig;
    ///
    /// let config = ClientConfig::from_env();
    /// assert!(!config.scheme.is_empty());
    /// ```
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("TENCENTCLOUD_ENDPOINT").filter(|v| !v.is_empty()) {
            config.endpoint = Some(v);
        }
        if let Some(v) = lookup("TENCENTCLOUD_REGION") {
            config.region = v;
        }
        if let Some(v) = lookup("TENCENTCLOUD_LANGUAGE") {
            config.language = v;
        }
        if let Some(v) = lookup("TENCENTCLOUD_SIGN_METHOD") {
            config.sign_method = v;
        }
        if let Some(v) = lookup("TENCENTCLOUD_TIMEOUT") {
            match v.parse::<u64>() {
                Ok(n) => config.timeout_secs = n,
                Err(_) => warn!(value = %v, "ignoring malformed TENCENTCLOUD_TIMEOUT"),
            }
        }
        if let Some(v) = lookup("TENCENTCLOUD_PROXY").filter(|v| !v.is_empty()) {
            config.proxy = Some(v);
        }
        config.env_proxy = lookup("http_proxy")
            .or_else(|| lookup("HTTP_PROXY"))
            .filter(|v| !v.is_empty());
        if let Some(v) = lookup("TENCENTCLOUD_MAX_STREAM_BYTES") {
            match v.parse::<u64>() {
                Ok(n) => config.max_stream_bytes = Some(n),
                Err(_) => warn!(value = %v, "ignoring malformed TENCENTCLOUD_MAX_STREAM_BYTES"),
            }
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// Check the values the transport depends on.
    ///
    /// # Errors
    ///
    /// Returns [`TcloudError::Config`] for an unknown scheme, a path that does
    /// not start with `/`, or a zero timeout.
    pub fn validate(&self) -> TcloudResult<()> {
        if self.scheme != "https" && self.scheme != "http" {
            return Err(TcloudError::Config(format!(
                "scheme must be http or https, got {:?}",
                self.scheme
            )));
        }
        if !self.path.starts_with('/') {
            return Err(TcloudError::Config(format!(
                "path must start with '/', got {:?}",
                self.path
            )));
        }
        if self.timeout_secs == 0 {
            return Err(TcloudError::Config("timeout must be positive".to_owned()));
        }
        Ok(())
    }

    /// The gateway host for `service`.
    #[must_use]
    pub fn endpoint_for(&self, service: &str) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!("{service}.{GATEWAY_DOMAIN}"),
        }
    }

    /// `{scheme}://{endpoint}{path}` for `service`, without a query.
    #[must_use]
    pub fn base_url(&self, service: &str) -> String {
        format!("{}://{}{}", self.scheme, self.endpoint_for(service), self.path)
    }

    /// The proxy to use: the explicit one, else the captured `http_proxy`.
    #[must_use]
    pub fn effective_proxy(&self) -> Option<&str> {
        self.proxy.as_deref().or(self.env_proxy.as_deref())
    }
}
