//! Handler for `GET /inbox/{name}`.

use axum::{
  Json,
  extract::{Path, State},
};
use nation_core::{NationRecord, store::NationStore};

use crate::{ApiState, error::ApiError};

/// `GET /inbox/{name}` — the nation's full record, verbatim.
///
/// Logged-off nations still have a record and are returned normally.
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(name): Path<String>,
) -> Result<Json<NationRecord>, ApiError>
where
  S: NationStore + 'static,
{
  let record = state
    .store
    .get(&name)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| nation_core::Error::NationNotFound(name.clone()))?;
  Ok(Json(record))
}
