//! CLI entry point for inspecting and seeding the credential record.
//!
//! `check` loads the record through the same cache request handlers use;
//! `seed` writes the singleton document to the store.

use anyhow::{Context, Result};
use base64::prelude::*;
use clap::{Parser, Subcommand};
use credcache::fetch::auth::CachedBearer;
use credcache::fetch::{BasicClient, fetch_bytes};
use credcache::{CredentialCache, Credentials, RequestContext, S3CredentialStore, StoreConfig};
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "credcache")]
#[command(about = "Inspect and seed the cached credential record", long_about = None)]
struct Cli {
    /// S3 bucket holding the credential document (defaults to CREDENTIALS_BUCKET)
    #[arg(long, global = true)]
    bucket: Option<String>,

    /// Object key prefix (defaults to CREDENTIALS_PREFIX)
    #[arg(long, global = true)]
    prefix: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the credential record and report what was found
    Check {
        /// Give up on the store lookup after this many seconds
        #[arg(short, long, default_value_t = 10)]
        timeout: u64,

        /// Optional: GET this URL with the access token as a bearer credential
        #[arg(long)]
        probe_url: Option<String>,
    },
    /// Write the singleton credential record to the store
    Seed {
        /// Access token sent as a bearer credential
        #[arg(long)]
        access_token: String,

        /// HMAC secret key, standard base64
        #[arg(long)]
        secret_key_base64: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/credcache.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("credcache.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let config = store_config(cli.bucket, cli.prefix)?;
    let sdk_config = aws_config::load_from_env().await;
    let store = S3CredentialStore::new(&sdk_config, config);

    match cli.command {
        Commands::Check { timeout, probe_url } => {
            check(store, Duration::from_secs(timeout), probe_url).await?;
        }
        Commands::Seed {
            access_token,
            secret_key_base64,
        } => {
            let secret_key = BASE64_STANDARD
                .decode(secret_key_base64.trim())
                .context("--secret-key-base64 is not valid base64")?;
            let creds = Credentials::new(secret_key, access_token);

            store
                .put_singleton(&creds)
                .await
                .context("failed to write credential record")?;

            info!(
                bucket = %store.config().bucket,
                key = %store.config().object_key(),
                ?creds,
                "Credential record written"
            );
        }
    }

    Ok(())
}

/// Environment first, then any flags given on the command line.
fn store_config(bucket: Option<String>, prefix: Option<String>) -> Result<StoreConfig> {
    let mut config = StoreConfig::from_env_with_bucket(bucket)?;
    if let Some(prefix) = prefix {
        config.prefix = prefix;
    }
    Ok(config)
}

#[tracing::instrument(skip(store), fields(bucket = %store.config().bucket))]
async fn check(store: S3CredentialStore, timeout: Duration, probe_url: Option<String>) -> Result<()> {
    let cache = Arc::new(CredentialCache::new(store));
    let ctx = RequestContext::with_timeout(timeout);

    let secret_key = cache
        .secret_key(&ctx)
        .await
        .context("failed to load credential record")?;
    let access_token = cache.access_token(&ctx).await?;

    info!(
        secret_key_len = secret_key.len(),
        access_token_len = access_token.len(),
        "Credential record loaded"
    );

    if let Some(url) = probe_url {
        let client = CachedBearer::new(BasicClient::new()?, cache).with_fetch_timeout(timeout);
        let body = fetch_bytes(&client, &url).await?;
        info!(url = %url, bytes = body.len(), "Probe request succeeded");
    }

    Ok(())
}
