//! Error type for `nation-store-json`.

use std::path::PathBuf;

use nation_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] nation_core::Error),

  #[error("i/o error on {}: {source}", path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("store file {} is corrupt: {source}", path.display())]
  Corrupt {
    path:   PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
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
