//! The `NationStore` trait.
//!
//! The trait is implemented by storage backends (`nation-store-json`,
//! `nation-store-sqlite`). The HTTP layer depends on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::{Error, NationRecord, Nations};

/// Error type of a [`NationStore`] backend.
///
/// Domain rejections raised inside [`NationStore::update`] travel through
/// the backend's error type; [`StoreError::into_domain`] recovers them so
/// callers can tell a bad request apart from a storage failure.
pub trait StoreError: std::error::Error + From<Error> + Send + Sync + Sized + 'static {
  /// `Ok` with the domain error if this wraps one, otherwise `Err(self)`.
  fn into_domain(self) -> Result<Error, Self>;
}

/// Abstraction over the whole-document nation store.
///
/// The model is load-everything, mutate in memory, save-everything. Backends
/// serialise [`update`](NationStore::update) calls so two mutations never
/// interleave within a process; plain reads are not serialised.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait NationStore: Send + Sync {
  type Error: StoreError;

  /// Read every nation. An absent backing resource is an empty store; a
  /// present but unreadable one is an error.
  fn load(&self) -> impl Future<Output = Result<Nations, Self::Error>> + Send + '_;

  /// Read one nation's record. Returns `None` if not found.
  fn get<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<NationRecord>, Self::Error>> + Send + 'a {
    async move {
      let mut nations = self.load().await?;
      Ok::<_, Self::Error>(nations.remove(name))
    }
  }

  /// Load, apply `f`, and save the full store as one serialised unit.
  ///
  /// If `f` fails nothing is written and its error is returned through
  /// `Self::Error`.
  fn update<F, T>(&self, f: F) -> impl Future<Output = Result<T, Self::Error>> + Send + '_
  where
    F: FnOnce(&mut Nations) -> crate::Result<T> + Send + 'static,
    T: Send + 'static;
}
