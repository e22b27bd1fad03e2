//! JSON HTTP API for the nation presence & trade service.
//!
//! Exposes an axum [`Router`] backed by any [`NationStore`]. Static files,
//! CORS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = nation_api::api_router(ApiState::new(store, PresenceWindow::default()));
//! ```

pub mod error;
pub mod inbox;
pub mod presence;
pub mod trade;

use std::sync::Arc;

use axum::{
  Json, Router,
  extract::rejection::JsonRejection,
  routing::{get, post},
};
use nation_core::{
  presence::{PresenceWindow, now_millis},
  store::NationStore,
};
use serde_json::{Map, Value};

pub use error::ApiError;

/// Source of the current time in epoch milliseconds.
pub type Clock = fn() -> i64;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store:  Arc<S>,
  pub window: PresenceWindow,
  pub clock:  Clock,
}

impl<S> ApiState<S> {
  pub fn new(store: Arc<S>, window: PresenceWindow) -> Self {
    Self { store, window, clock: now_millis }
  }

  /// Replace the wall clock, e.g. with a fixed instant in tests.
  pub fn with_clock(mut self, clock: Clock) -> Self {
    self.clock = clock;
    self
  }

  pub(crate) fn now(&self) -> i64 {
    (self.clock)()
  }
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:  Arc::clone(&self.store),
      window: self.window,
      clock:  self.clock,
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be merged into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: NationStore + 'static,
{
  Router::new()
    .route("/online", get(presence::list::<S>).post(presence::register::<S>))
    .route("/offline", post(presence::logoff::<S>))
    .route("/inbox/{name}", get(inbox::get_one::<S>))
    .route("/trade", post(trade::create::<S>))
    .route("/health", get(health))
    .with_state(state)
}

/// `GET /health`
async fn health() -> Json<Value> {
  Json(serde_json::json!({ "status": "ok" }))
}

/// Unwrap a JSON request body into an object.
///
/// Bodies that are missing, malformed or not an object are treated as `{}`
/// so each endpoint reports its own missing-parameter error.
pub(crate) fn payload(body: Result<Json<Value>, JsonRejection>) -> Map<String, Value> {
  match body {
    Ok(Json(Value::Object(map))) => map,
    Ok(Json(other)) => {
      tracing::debug!(body = %other, "ignoring non-object request body");
      Map::new()
    }
    Err(rejection) => {
      tracing::debug!(%rejection, "ignoring unreadable request body");
      Map::new()
    }
  }
}
