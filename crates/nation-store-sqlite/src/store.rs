//! [`SqliteStore`] — the SQLite implementation of [`NationStore`].

use std::{path::Path, sync::Arc};

use nation_core::{NationRecord, Nations, store::NationStore};
use rusqlite::OptionalExtension as _;
use tokio::sync::Mutex;

use crate::{Error, Result, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A nation store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection and the write lock are shared.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
  write:           Arc<Mutex<()>>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn).await
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn).await
  }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(Self { conn, write: Arc::new(Mutex::new(())) })
  }

  async fn read_all(&self) -> Result<Nations> {
    let rows: Vec<(String, String)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT name, record_json FROM nations")?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows
      .into_iter()
      .map(|(name, json)| {
        let record = decode(&name, &json)?;
        Ok((name, record))
      })
      .collect()
  }

  /// Upsert every record in one transaction.
  async fn write_all(&self, nations: &Nations) -> Result<()> {
    let rows = nations
      .iter()
      .map(|(name, record)| Ok((name.clone(), serde_json::to_string(record)?)))
      .collect::<Result<Vec<(String, String)>>>()?;

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO nations (name, record_json) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET record_json = excluded.record_json",
          )?;
          for (name, json) in &rows {
            stmt.execute(rusqlite::params![name, json])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

fn decode(name: &str, json: &str) -> Result<NationRecord> {
  serde_json::from_str(json).map_err(|source| {
    tracing::error!(nation = %name, error = %source, "stored record is corrupt");
    Error::Corrupt { name: name.to_owned(), source }
  })
}

// ─── NationStore impl ────────────────────────────────────────────────────────

impl NationStore for SqliteStore {
  type Error = Error;

  async fn load(&self) -> Result<Nations> {
    self.read_all().await.inspect_err(|e| {
      tracing::error!(error = %e, "failed to load nations");
    })
  }

  async fn get<'a>(&'a self, name: &'a str) -> Result<Option<NationRecord>> {
    let key = name.to_owned();
    let json: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT record_json FROM nations WHERE name = ?1",
              rusqlite::params![key],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    json.map(|json| decode(name, &json)).transpose()
  }

  async fn update<F, T>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&mut Nations) -> nation_core::Result<T> + Send + 'static,
    T: Send + 'static,
  {
    let _guard = self.write.lock().await;
    let mut nations = self.read_all().await?;
    let out = f(&mut nations)?;
    self.write_all(&nations).await.inspect_err(|e| {
      tracing::error!(error = %e, "failed to save nations");
    })?;
    Ok(out)
  }
}
