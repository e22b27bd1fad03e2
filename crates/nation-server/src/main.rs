//! nation-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! configured nation store, and serves the JSON API over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use nation_api::ApiState;
use nation_core::store::NationStore;
use nation_server::{Backend, ServerConfig, app, expand_tilde};
use nation_store_json::JsonFileStore;
use nation_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Nation presence & trade server")]
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

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let store_path = expand_tilde(&server_cfg.store_path);
  tracing::info!(backend = ?server_cfg.backend, store = ?store_path, "opening nation store");

  match server_cfg.backend {
    Backend::Json => serve(JsonFileStore::new(store_path), &server_cfg).await,
    Backend::Sqlite => {
      let store = SqliteStore::open(&store_path)
        .await
        .with_context(|| format!("failed to open store at {store_path:?}"))?;
      serve(store, &server_cfg).await
    }
  }
}

async fn serve<S>(store: S, server_cfg: &ServerConfig) -> anyhow::Result<()>
where
  S: NationStore + 'static,
{
  let state = ApiState::new(Arc::new(store), server_cfg.window());
  let app = app(state, &expand_tilde(&server_cfg.index_path));
  let address = server_cfg.address();

  tracing::info!("Nation trading server listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
