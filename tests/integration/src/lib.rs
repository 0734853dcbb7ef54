//! Live integration tests against the Tencent Cloud API gateway.
//!
//! These tests need real credentials in `TENCENTCLOUD_SECRET_ID` and
//! `TENCENTCLOUD_SECRET_KEY`. They are marked `#[ignore]` so they don't run
//! during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p tcloud-integration -- --ignored
//! ```

use std::sync::Once;

use serde_json::Value as Json;
use tcloud_core::{ClientConfig, Credential};
use tcloud_http::TcloudClient;

static INIT: Once = Once::new();

/// Default region for the live calls.
const DEFAULT_REGION: &str = "ap-guangzhou";

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Configuration from the environment, with a region filled in.
#[must_use]
pub fn test_config() -> ClientConfig {
    let mut config = ClientConfig::from_env();
    if config.region.is_empty() {
        config.region = DEFAULT_REGION.to_owned();
    }
    config
}

/// Create a client from environment credentials.
#[must_use]
pub fn tcloud_client() -> TcloudClient {
    init_tracing();

    let credential = Credential::from_env().expect("TENCENTCLOUD_SECRET_ID/KEY must be set");
    TcloudClient::new(test_config(), credential).expect("valid client configuration")
}

/// Create a client whose secret key is wrong, to provoke a signature failure.
#[must_use]
pub fn bad_key_client() -> TcloudClient {
    init_tracing();

    let credential = Credential::from_env().expect("TENCENTCLOUD_SECRET_ID/KEY must be set");
    let credential = Credential::new(credential.secret_id(), "not-the-secret-key");
    TcloudClient::new(test_config(), credential).expect("valid client configuration")
}

/// Read a response body as JSON and return its `Response` object.
pub async fn response_json(response: reqwest::Response) -> Json {
    let body: Json = response.json().await.expect("response body is JSON");
    body.get("Response")
        .cloned()
        .unwrap_or_else(|| panic!("missing Response envelope: {body}"))
}

/// The `Error.Code` of an API response, if it carries one.
#[must_use]
pub fn error_code(response: &Json) -> Option<&str> {
    response.get("Error")?.get("Code")?.as_str()
}

#[cfg(test)]
mod test_v1;
#[cfg(test)]
mod test_v3;
