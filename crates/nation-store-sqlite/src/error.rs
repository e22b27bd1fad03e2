//! Error type for `nation-store-sqlite`.

use nation_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] nation_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// A stored row whose record column is not a JSON object.
  #[error("record for nation {name:?} is corrupt: {source}")]
  Corrupt {
    name:   String,
    #[source]
    source: serde_json::Error,
  },
}

impl StoreError for Error {
  fn into_domain(self) -> std::result::Result<nation_core::Error, Self> {
    match self {
      Error::Core(e) => Ok(e),
      other => Err(other),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
