//! HTTP server wiring for the nation presence & trade service.
//!
//! Wraps the [`nation_api`] router with the landing page, CORS and request
//! tracing, and holds the deserialised server configuration.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use axum::Router;
use nation_api::ApiState;
use nation_core::{presence::PresenceWindow, store::NationStore};
use serde::Deserialize;
use tower_http::{cors::CorsLayer, services::ServeFile, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Which [`NationStore`] implementation backs the server.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
  /// A single JSON document rewritten on every change.
  #[default]
  Json,
  /// An embedded SQLite database.
  Sqlite,
}

/// Runtime server configuration, deserialised from `config.toml` and
/// `NATIONS_*` environment variables.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub backend:            Backend,
  pub store_path:         PathBuf,
  pub index_path:         PathBuf,
  pub online_window_secs: u64,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:               "127.0.0.1".to_string(),
      port:               8080,
      backend:            Backend::Json,
      store_path:         PathBuf::from("users.json"),
      index_path:         PathBuf::from("static/index.html"),
      online_window_secs: 300,
    }
  }
}

impl ServerConfig {
  /// Layer the optional TOML file at `path` under `NATIONS_`-prefixed
  /// environment variables. Missing keys fall back to [`Default`].
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("NATIONS"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }

  pub fn window(&self) -> PresenceWindow {
    PresenceWindow::from_duration(Duration::from_secs(self.online_window_secs))
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The complete application: API routes, `GET /` landing page, permissive
/// CORS and per-request tracing.
pub fn app<S>(state: ApiState<S>, index_path: &Path) -> Router
where
  S: NationStore + 'static,
{
  nation_api::api_router(state)
    .route_service("/", ServeFile::new(index_path))
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Tests ────────────────────────────────────────────────────────────────────
