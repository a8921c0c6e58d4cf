//! The activity log: an append-only record of what happened, newest first.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
  Result,
  clock::Env,
  committed::Committed,
  retention::RetentionPolicy,
  store::{Collection, CollectionStore, load_collection, remove_collection, save_collection},
};

/// The area of the application an activity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ActivityKind {
  Driver,
  Vehicle,
  Log,
  System,
  Report,
  Assignment,
  Search,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
  pub id:      Uuid,
  pub message: String,
  #[serde(rename = "type")]
  pub kind:    ActivityKind,
  pub date:    DateTime<Utc>,
}

pub struct ActivityLog<S> {
  store:     Arc<S>,
  env:       Env,
  retention: RetentionPolicy,
  /// Newest first.
  records:   Vec<ActivityRecord>,
}

impl<S: CollectionStore> ActivityLog<S> {
  pub async fn load(store: Arc<S>, env: Env, retention: RetentionPolicy) -> Result<Self> {
    let records = load_collection(&*store, Collection::ActivityHistory).await?;
    Ok(Self {
      store,
      env,
      retention,
      records,
    })
  }

  async fn save(&self) -> Result<()> {
    save_collection(&*self.store, Collection::ActivityHistory, &self.records).await
  }

  /// Append a record, unless the most recent record carries exactly the same
  /// message. Returns the new record, or `None` when suppressed.
  pub async fn record(
    &mut self,
    message: impl Into<String>,
    kind: ActivityKind,
  ) -> Committed<Option<ActivityRecord>> {
    let message = message.into();
    if self.records.first().is_some_and(|last| last.message == message) {
      debug!(%message, "suppressed repeated activity");
      return Committed::new(None);
    }

    let record = ActivityRecord {
      id: self.env.next_id(),
      message,
      kind,
      date: self.env.now(),
    };
    self.records.insert(0, record.clone());

    let mut out = Committed::new(Some(record));
    out.note(self.save().await);
    out
  }

  /// The newest records, capped for dashboard display.
  pub fn recent(&self) -> &[ActivityRecord] {
    let end = self.records.len().min(self.retention.recent_limit);
    &self.records[..end]
  }

  /// The full retained history, newest first.
  pub fn all(&self) -> &[ActivityRecord] { &self.records }

  /// Drop records older than the retention window. Meant to run once per
  /// session; returns how many records were removed.
  pub async fn prune(&mut self) -> Committed<usize> {
    let now = self.env.now();
    let before = self.records.len();
    self.records.retain(|r| self.retention.retains(r.date, now));
    let removed = before - self.records.len();

    let mut out = Committed::new(removed);
    if removed > 0 {
      info!(removed, "pruned expired activity");
      out.note(self.save().await);
    }
    out
  }

  /// Empty the log and delete it from the store.
  pub async fn clear(&mut self) -> Committed<usize> {
    let removed = self.records.len();
    self.records.clear();

    let mut out = Committed::new(removed);
    out.note(remove_collection(&*self.store, Collection::ActivityHistory).await);
    out
  }
}
