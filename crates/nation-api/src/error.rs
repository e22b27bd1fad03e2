//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use nation_core::store::StoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
///
/// Rendered as `{"error": "<message>"}` with the matching status code.
/// Storage failures render as `"Storage error"` so backend details such as
/// file paths stay in the server log.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Split a backend error into the domain rejection it carries, if any,
  /// or an opaque storage failure.
  pub fn from_store<E: StoreError>(err: E) -> Self {
    match err.into_domain() {
      Ok(domain) => domain.into(),
      Err(err) => {
        tracing::error!(error = %err, "store operation failed");
        ApiError::Store(Box::new(err))
      }
    }
  }
}

impl From<nation_core::Error> for ApiError {
  fn from(err: nation_core::Error) -> Self {
    use nation_core::Error as E;
    match err {
      E::NationNotFound(_) | E::TradeParticipantNotFound => ApiError::NotFound(err.to_string()),
      E::MissingName | E::MissingTradeParameters | E::InvalidQuantity { .. } => {
        ApiError::BadRequest(err.to_string())
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      // Details are logged in `from_store`; clients get a fixed message.
      ApiError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_owned()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
