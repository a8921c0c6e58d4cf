//! [`SqliteStore`]: the SQLite implementation of [`CollectionStore`].

use std::{path::Path, sync::Arc};

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use tracing::{debug, info};

use fleet_core::{
  clock::{Clock, SystemClock},
  store::{Collection, CollectionStore},
};

use crate::{
  Error, Result,
  encode::{decode_dt, encode_dt},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A collection store backed by a single SQLite file.
///
/// Clones share one reference-counted connection.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
  /// Stamps `saved_at`.
  clock:           Arc<dyn Clock>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  /// Missing parent directories are created.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      tokio::fs::create_dir_all(parent)
        .await
        .map_err(|source| Error::CreateDir {
          path: parent.to_path_buf(),
          source,
        })?;
    }

    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self::from_conn(conn);
    store.init_schema().await?;
    info!(path = %path.display(), "opened sqlite store");
    Ok(store)
  }

  /// Open a fresh in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self::from_conn(conn);
    store.init_schema().await?;
    Ok(store)
  }

  /// Use `clock` for `saved_at` stamps instead of wall-clock time.
  pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
    self.clock = clock;
    self
  }

  fn from_conn(conn: tokio_rusqlite::Connection) -> Self {
    Self {
      conn,
      clock: Arc::new(SystemClock),
    }
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// When `collection` was last written, or `None` if it is not stored.
  pub async fn saved_at(&self, collection: Collection) -> Result<Option<DateTime<Utc>>> {
    let name = collection.name();

    let raw: Option<String> = self
      .conn
      .call(move |conn| {
        let raw = conn
          .query_row(
            "SELECT saved_at FROM collections WHERE name = ?1",
            rusqlite::params![name],
            |r| r.get(0),
          )
          .optional()?;
        Ok(raw)
      })
      .await?;

    raw.as_deref().map(decode_dt).transpose()
  }
}

// ─── CollectionStore impl ────────────────────────────────────────────────────

impl CollectionStore for SqliteStore {
  type Error = Error;

  async fn load(&self, collection: Collection) -> Result<Option<String>> {
    let name = collection.name();

    let body: Option<String> = self
      .conn
      .call(move |conn| {
        let body = conn
          .query_row(
            "SELECT body FROM collections WHERE name = ?1",
            rusqlite::params![name],
            |r| r.get(0),
          )
          .optional()?;
        Ok(body)
      })
      .await?;

    debug!(%collection, found = body.is_some(), "loaded collection");
    Ok(body)
  }

  async fn save(&self, collection: Collection, body: String) -> Result<()> {
    let name = collection.name();
    let at_str = encode_dt(self.clock.now());
    let len = body.len();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO collections (name, body, saved_at) VALUES (?1, ?2, ?3)
           ON CONFLICT(name) DO UPDATE SET body = excluded.body, saved_at = excluded.saved_at",
          rusqlite::params![name, body, at_str],
        )?;
        Ok(())
      })
      .await?;

    debug!(%collection, bytes = len, "saved collection");
    Ok(())
  }

  async fn remove(&self, collection: Collection) -> Result<()> {
    let name = collection.name();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM collections WHERE name = ?1",
          rusqlite::params![name],
        )?;
        Ok(())
      })
      .await?;

    debug!(%collection, "removed collection");
    Ok(())
  }
}
