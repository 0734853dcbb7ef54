//! tcloud - sign and send one Tencent Cloud API call.
//!
//! # Usage
//!
//! ```text
//! TENCENTCLOUD_SECRET_ID=... TENCENTCLOUD_SECRET_KEY=... \
//!   tcloud --service cvm --action DescribeInstances --version 2017-03-12 \
//!          --region ap-guangzhou --params '{"Limit": 10}'
//! ```
//!
//! `--file name=path` streams a local file into the parameter `name`;
//! combine it with `--multipart` to upload it as a form field. `--dry-run`
//! prints the signed request instead of sending it.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TENCENTCLOUD_SECRET_ID` | *(required)* | Secret id |
//! | `TENCENTCLOUD_SECRET_KEY` | *(required)* | Secret key |
//! | `TENCENTCLOUD_SESSION_TOKEN` | *(unset)* | Temporary credential token |
//! | `TENCENTCLOUD_REGION` | *(unset)* | Region, overridden by `--region` |
//! | `TENCENTCLOUD_SIGN_METHOD` | `HmacSHA256` | v1 signature method |
//! | `TENCENTCLOUD_PROXY` | *(unset)* | Proxy URL, preferred over `http_proxy` |
//! | `LOG_LEVEL` | `warn` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use http::Method;
use tcloud_auth::{ByteStream, Value};
use tcloud_core::{ClientConfig, Credential};
use tcloud_http::{ApiRequest, TcloudClient, build_v1_request, build_v3_request, generate_boundary};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scheme {
    /// `HmacSHA1` / `HmacSHA256` query-string signing.
    V1,
    /// `TC3-HMAC-SHA256` signing.
    V3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum HttpMethod {
    Get,
    Post,
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "tcloud")]
#[command(about = "Sign and send a Tencent Cloud API call", long_about = None)]
struct Args {
    /// Service name, e.g. `cvm`
    #[arg(long)]
    service: String,

    /// API action, e.g. `DescribeInstances`
    #[arg(long)]
    action: String,

    /// API version, e.g. `2017-03-12`
    #[arg(long)]
    version: String,

    /// Region; overrides `TENCENTCLOUD_REGION`
    #[arg(long)]
    region: Option<String>,

    /// HTTP method
    #[arg(long, value_enum, ignore_case = true, default_value_t = HttpMethod::Post)]
    method: HttpMethod,

    /// Signature scheme
    #[arg(long, value_enum, default_value_t = Scheme::V3)]
    scheme: Scheme,

    /// Parameters as a JSON object
    #[arg(long)]
    params: Option<String>,

    /// Stream a file into a parameter, as `name=path`; repeatable
    #[arg(long = "file", value_name = "NAME=PATH")]
    files: Vec<String>,

    /// Send the POST body as multipart/form-data (v3 only)
    #[arg(long)]
    multipart: bool,

    /// Print the signed request instead of sending it
    #[arg(long)]
    dry_run: bool,
}

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    Ok(())
}

/// Parse `--params` into a parameter map.
fn parse_params(raw: Option<&str>) -> Result<Value> {
    let Some(raw) = raw else {
        return Ok(Value::map());
    };
    let json: serde_json::Value =
        serde_json::from_str(raw).context("--params is not valid JSON")?;
    if !json.is_object() {
        bail!("--params must be a JSON object");
    }
    Ok(json.into())
}

/// Open each `--file name=path` as a byte stream in `params`.
async fn attach_files(mut params: Value, files: &[String]) -> Result<Value> {
    for entry in files {
        let (name, path) = entry
            .split_once('=')
            .with_context(|| format!("--file expects name=path, got {entry:?}"))?;
        let file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("failed to open {path}"))?;
        params = params.with(name, ByteStream::new(file));
    }
    Ok(params)
}

async fn dry_run(
    config: &ClientConfig,
    credential: &Credential,
    scheme: Scheme,
    request: ApiRequest,
) -> Result<()> {
    let timestamp = Utc::now().timestamp();
    let signed = match scheme {
        Scheme::V1 => {
            build_v1_request(config, credential, request, rand::random::<u16>(), timestamp).await?
        }
        Scheme::V3 => {
            let boundary = request.multipart.then(generate_boundary);
            build_v3_request(config, credential, request, timestamp, boundary.as_deref()).await?
        }
    };

    println!("{} {}", signed.method(), signed.uri());
    for (name, value) in signed.headers() {
        println!("{name}: {}", value.to_str().unwrap_or("<binary>"));
    }
    println!();
    println!("({} byte body)", signed.body().len());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ClientConfig::from_env();
    if let Some(region) = args.region {
        config.region = region;
    }
    init_tracing(&config.log_level)?;

    let credential = Credential::from_env().context("failed to load credentials")?;
    let params = parse_params(args.params.as_deref())?;
    let params = attach_files(params, &args.files).await?;

    if args.multipart && args.scheme == Scheme::V1 {
        bail!("--multipart requires --scheme v3");
    }

    let request = ApiRequest::builder()
        .service(args.service)
        .action(args.action)
        .version(args.version)
        .method(Method::from(args.method))
        .params(params)
        .multipart(args.multipart)
        .build();

    if args.dry_run {
        return dry_run(&config, &credential, args.scheme, request).await;
    }

    let client = TcloudClient::new(config, credential)?;
    let response = match args.scheme {
        Scheme::V1 => client.call_v1(request).await?,
        Scheme::V3 => client.call_v3(request).await?,
    };

    let status = response.status();
    let body = response.text().await.context("failed to read response body")?;
    info!(%status, "request completed");
    println!("{body}");

    if !status.is_success() {
        bail!("request failed with status {status}");
    }
    Ok(())
}
