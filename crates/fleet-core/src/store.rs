//! The `CollectionStore` trait and the helpers every component uses to read
//! and write whole collections through it.
//!
//! The trait is implemented by storage backends (e.g. `fleet-store-sqlite`).
//! Components in this crate depend on the abstraction, never on a concrete
//! backend.

use std::{
  collections::HashMap,
  convert::Infallible,
  future::Future,
  sync::{Arc, Mutex},
};

use serde::{Serialize, de::DeserializeOwned};
use strum::{Display, EnumIter, IntoStaticStr};
use tracing::warn;

use crate::{Error, Result};

// ─── Collection names ────────────────────────────────────────────────────────

/// The named collections persisted by a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Collection {
  Drivers,
  Vehicles,
  Assignments,
  Logs,
  Notifications,
  ActivityHistory,
}

impl Collection {
  /// The key the collection is stored under.
  pub fn name(self) -> &'static str { self.into() }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// A durable key-value store of named collections.
///
/// Each collection is stored as one opaque body (a JSON array). A save fully
/// overwrites the previous body; there are no partial merges.
pub trait CollectionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Return the stored body of `collection`, or `None` if it was never saved
  /// (or has been removed).
  fn load(
    &self,
    collection: Collection,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + '_;

  /// Replace the stored body of `collection`.
  fn save(
    &self,
    collection: Collection,
    body: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete `collection` entirely. Removing an absent collection is not an
  /// error.
  fn remove(
    &self,
    collection: Collection,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── In-memory backend ───────────────────────────────────────────────────────

/// A process-local store. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  bodies: Arc<Mutex<HashMap<Collection, String>>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// The raw body currently stored for `collection`.
  pub fn raw(&self, collection: Collection) -> Option<String> {
    self.lock().get(&collection).cloned()
  }

  /// Overwrite a body directly, bypassing serialisation.
  pub fn put_raw(&self, collection: Collection, body: impl Into<String>) {
    self.lock().insert(collection, body.into());
  }

  fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Collection, String>> {
    self.bodies.lock().unwrap_or_else(|e| e.into_inner())
  }
}

impl CollectionStore for MemoryStore {
  type Error = Infallible;

  async fn load(&self, collection: Collection) -> Result<Option<String>, Infallible> {
    Ok(self.raw(collection))
  }

  async fn save(&self, collection: Collection, body: String) -> Result<(), Infallible> {
    self.put_raw(collection, body);
    Ok(())
  }

  async fn remove(&self, collection: Collection) -> Result<(), Infallible> {
    self.lock().remove(&collection);
    Ok(())
  }
}

// ─── Whole-collection helpers ────────────────────────────────────────────────

/// Load and decode a collection.
///
/// An absent collection is empty. A body that fails to decode is logged and
/// also treated as empty, so one corrupt collection never blocks the others.
/// Only a backend failure is returned as an error.
pub(crate) async fn load_collection<S, T>(store: &S, collection: Collection) -> Result<Vec<T>>
where
  S: CollectionStore,
  T: DeserializeOwned,
{
  let raw = store.load(collection).await.map_err(|e| Error::Load {
    collection,
    source: Box::new(e),
  })?;

  let Some(raw) = raw else {
    return Ok(Vec::new());
  };

  match serde_json::from_str(&raw) {
    Ok(records) => Ok(records),
    Err(e) => {
      warn!(%collection, error = %e, "discarding malformed collection");
      Ok(Vec::new())
    }
  }
}

/// Encode `records` and overwrite the stored collection.
pub(crate) async fn save_collection<S, T>(
  store: &S,
  collection: Collection,
  records: &[T],
) -> Result<()>
where
  S: CollectionStore,
  T: Serialize,
{
  let body = serde_json::to_string(records)?;
  store.save(collection, body).await.map_err(|e| Error::Persist {
    collection,
    source: Box::new(e),
  })
}

/// Remove a collection from the store.
pub(crate) async fn remove_collection<S>(store: &S, collection: Collection) -> Result<()>
where
  S: CollectionStore,
{
  store.remove(collection).await.map_err(|e| Error::Persist {
    collection,
    source: Box::new(e),
  })
}
