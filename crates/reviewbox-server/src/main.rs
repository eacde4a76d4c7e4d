//! reviewbox server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) plus the
//! environment, connects to the review store with bounded retry, and serves
//! the JSON API over HTTP. If the store cannot be reached the process exits
//! non-zero without binding a listener.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use reviewbox_core::ReviewService;
use reviewbox_server::{ServerConfig, TokioDelay};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "reviewbox review collection server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  tracing::info!(
    store_uri = %cfg.store_uri,
    max_attempts = cfg.connect.max_attempts,
    "connecting to review store"
  );
  let store = reviewbox_server::connect_store(&cfg, &TokioDelay)
    .await
    .context("review store unavailable; refusing to serve")?;

  let service =
    ReviewService::new(Arc::new(store)).with_approved_only(cfg.list_approved_only);
  let app = reviewbox_server::router(service, &cfg)?;
  let address = format!("{}:{}", cfg.host, cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
