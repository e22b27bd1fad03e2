//! Error types for `nation-core`.

use thiserror::Error;

/// A domain-level rejection of a request.
///
/// The `Display` strings are the client-facing messages returned by the
/// HTTP layer, so changing them is a wire-compatibility break.
#[derive(Debug, Error)]
pub enum Error {
  #[error("Missing nation name")]
  MissingName,

  #[error("Missing trade parameters")]
  MissingTradeParameters,

  #[error("Nation not found")]
  NationNotFound(String),

  #[error("Sender or target nation not found")]
  TradeParticipantNotFound,

  #[error("Invalid quantity for '{key}'")]
  InvalidQuantity { key: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
