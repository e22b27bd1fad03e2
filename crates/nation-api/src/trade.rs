//! Handler for `POST /trade`.

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use nation_core::{
  NationRecord,
  store::NationStore,
  trade::{TradeRequest, apply_trade},
};
use serde::Serialize;
use serde_json::Value;

use crate::{ApiState, error::ApiError, payload};

#[derive(Debug, Serialize)]
pub struct TradeResponse {
  pub success:       bool,
  #[serde(rename = "updatedState")]
  pub updated_state: NationRecord,
}

/// `POST /trade` — body: `{"nation": "...", "target": "...", "tradeData": {...}}`.
///
/// Returns the sender's record after the trade. The target's record is
/// updated but not returned.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<TradeResponse>, ApiError>
where
  S: NationStore + 'static,
{
  let request = TradeRequest::from_payload(&payload(body))?;
  let clock = state.clock;

  tracing::info!(sender = %request.sender, target = %request.target, "applying trade");
  let updated_state = state
    .store
    .update(move |nations| apply_trade(nations, &request, clock()))
    .await
    .map_err(ApiError::from_store)?;

  Ok(Json(TradeResponse { success: true, updated_state }))
}
