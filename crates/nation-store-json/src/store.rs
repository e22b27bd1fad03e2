//! [`JsonFileStore`] — the JSON-document implementation of [`NationStore`].

use std::{
  io::ErrorKind,
  path::{Path, PathBuf},
  sync::Arc,
};

use nation_core::{Nations, store::NationStore};
use tokio::{io::AsyncWriteExt, sync::Mutex};

use crate::{Error, Result};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A nation store backed by a single JSON file.
///
/// Cloning is cheap — clones share the path and the write lock.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
  path:  Arc<PathBuf>,
  write: Arc<Mutex<()>>,
}

impl JsonFileStore {
  /// Use the document at `path`. The file does not need to exist yet; it is
  /// created (with any missing parent directories) on the first write.
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self {
      path:  Arc::new(path.into()),
      write: Arc::new(Mutex::new(())),
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  async fn read(&self) -> Result<Nations> {
    let bytes = match tokio::fs::read(self.path.as_path()).await {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Nations::new()),
      Err(source) => {
        tracing::error!(path = %self.path.display(), error = %source, "failed to read store");
        return Err(Error::Io { path: self.path.to_path_buf(), source });
      }
    };

    // A freshly created, empty file holds no nations yet.
    if bytes.iter().all(u8::is_ascii_whitespace) {
      return Ok(Nations::new());
    }

    serde_json::from_slice(&bytes).map_err(|source| {
      tracing::error!(path = %self.path.display(), error = %source, "store file is corrupt");
      Error::Corrupt { path: self.path.to_path_buf(), source }
    })
  }

  /// Write `nations` to a sibling temp file, flush it to disk, then rename
  /// it over the store so neither readers nor a crash ever observe a
  /// half-written document.
  async fn write(&self, nations: &Nations) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(nations)?;
    let tmp = temp_path(&self.path);

    let result = async {
      if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
      }
      let mut file = tokio::fs::File::create(&tmp).await?;
      file.write_all(&bytes).await?;
      // The rename must not reach disk before the contents do.
      file.sync_all().await?;
      drop(file);
      tokio::fs::rename(&tmp, self.path.as_path()).await
    }
    .await;

    result.map_err(|source| {
      tracing::error!(path = %self.path.display(), error = %source, "failed to write store");
      Error::Io { path: self.path.to_path_buf(), source }
    })
  }
}

fn temp_path(path: &Path) -> PathBuf {
  let mut name = path.file_name().unwrap_or_default().to_os_string();
  name.push(".tmp");
  path.with_file_name(name)
}

// ─── NationStore impl ────────────────────────────────────────────────────────

impl NationStore for JsonFileStore {
  type Error = Error;

  async fn load(&self) -> Result<Nations> {
    self.read().await
  }

  async fn update<F, T>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&mut Nations) -> nation_core::Result<T> + Send + 'static,
    T: Send + 'static,
  {
    let _guard = self.write.lock().await;
    let mut nations = self.read().await?;
    let out = f(&mut nations)?;
    self.write(&nations).await?;
    Ok(out)
  }
}
