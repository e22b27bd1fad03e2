//! Handlers for presence endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/online` | Body: `{"name": "...", ...}`; stores the payload and returns who is online |
//! | `GET`  | `/online` | Names seen within the presence window |
//! | `POST` | `/offline` | Body: `{"name": "..."}`; resets `lastSeen` to `0` |

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use nation_core::{
  presence::{self, Registration},
  store::NationStore,
};
use serde::Serialize;
use serde_json::Value;

use crate::{ApiState, error::ApiError, payload};

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
  pub success: bool,
  pub online:  Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct OnlineResponse {
  pub online: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct Ack {
  pub success: bool,
}

// ─── Register ─────────────────────────────────────────────────────────────────

/// `POST /online`
pub async fn register<S>(
  State(state): State<ApiState<S>>,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<RegisterResponse>, ApiError>
where
  S: NationStore + 'static,
{
  let registration = Registration::from_payload(payload(body))?;
  let window = state.window;
  let clock = state.clock;

  let (name, online) = state
    .store
    .update(move |nations| {
      let name = presence::register(nations, registration, clock());
      Ok((name, window.online(nations, clock())))
    })
    .await
    .map_err(ApiError::from_store)?;

  tracing::debug!(nation = %name, online = online.len(), "presence registered");
  Ok(Json(RegisterResponse { success: true, online }))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /online`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<OnlineResponse>, ApiError>
where
  S: NationStore + 'static,
{
  let nations = state.store.load().await.map_err(ApiError::from_store)?;
  let online = state.window.online(&nations, state.now());
  Ok(Json(OnlineResponse { online }))
}

// ─── Logoff ───────────────────────────────────────────────────────────────────

/// `POST /offline`
pub async fn logoff<S>(
  State(state): State<ApiState<S>>,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Ack>, ApiError>
where
  S: NationStore + 'static,
{
  let payload = payload(body);
  let name = presence::payload_name(&payload)?.to_owned();

  let logged_off = name.clone();
  state
    .store
    .update(move |nations| presence::log_off(nations, &logged_off))
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(nation = %name, "nation logged off");
  Ok(Json(Ack { success: true }))
}
