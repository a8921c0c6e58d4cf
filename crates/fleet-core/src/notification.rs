//! Persisted notifications and the [`NotificationCenter`] that deduplicates
//! them.
//!
//! A notification is identified for deduplication by `kind:source_id`; for
//! licence alerts the source is the vehicle id. Once stored, a notification
//! is never rewritten by later evaluations. It keeps the priority it was
//! raised with until it is read, pruned or cleared.

use std::{collections::HashSet, sync::Arc};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
  Result,
  alert::{AlertPolicy, license_alerts},
  clock::Env,
  committed::Committed,
  retention::RetentionPolicy,
  store::{Collection, CollectionStore, load_collection, remove_collection, save_collection},
  vehicle::Vehicle,
};

// ─── Types ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationKind {
  License,
  Maintenance,
  Remittance,
  General,
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
  Low,
  Medium,
  High,
}

impl Priority {
  /// Within a week is high, within a month medium, anything later low.
  pub fn for_days_until_expiry(days: i64) -> Self {
    match days {
      d if d <= 7 => Self::High,
      d if d <= 30 => Self::Medium,
      _ => Self::Low,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
  pub id:         Uuid,
  #[serde(rename = "type")]
  pub kind:       NotificationKind,
  /// Identity of the condition that raised this notification, e.g. the
  /// vehicle id for a licence alert.
  pub source_id:  String,
  pub title:      String,
  pub message:    String,
  pub priority:   Priority,
  pub created_at: DateTime<Utc>,
  #[serde(default)]
  pub read:       bool,
}

impl Notification {
  /// The deduplication key.
  pub fn key(&self) -> String { dedup_key(self.kind, &self.source_id) }
}

pub fn dedup_key(kind: NotificationKind, source_id: &str) -> String { format!("{kind}:{source_id}") }

/// Input to [`NotificationCenter::push`].
#[derive(Debug, Clone)]
pub struct NewNotification {
  pub kind:      NotificationKind,
  pub source_id: String,
  pub title:     String,
  pub message:   String,
  pub priority:  Priority,
}

// ─── NotificationCenter ──────────────────────────────────────────────────────

pub struct NotificationCenter<S> {
  store:     Arc<S>,
  env:       Env,
  policy:    AlertPolicy,
  retention: RetentionPolicy,
  /// Newest first.
  items:     Vec<Notification>,
}

impl<S: CollectionStore> NotificationCenter<S> {
  pub async fn load(
    store: Arc<S>,
    env: Env,
    policy: AlertPolicy,
    retention: RetentionPolicy,
  ) -> Result<Self> {
    let items = load_collection(&*store, Collection::Notifications).await?;
    Ok(Self {
      store,
      env,
      policy,
      retention,
      items,
    })
  }

  /// All stored notifications, newest first.
  pub fn items(&self) -> &[Notification] { &self.items }

  pub fn unread(&self) -> impl Iterator<Item = &Notification> { self.items.iter().filter(|n| !n.read) }

  pub fn unread_count(&self) -> usize { self.unread().count() }

  pub fn policy(&self) -> &AlertPolicy { &self.policy }

  fn has_key(&self, key: &str) -> bool { self.items.iter().any(|n| n.key() == key) }

  async fn save(&self) -> Result<()> {
    save_collection(&*self.store, Collection::Notifications, &self.items).await
  }

  /// Evaluate licence alerts for `vehicles` and store a notification for
  /// each one whose key is not already present. Returns the notifications
  /// that were added; calling again with unchanged vehicles adds nothing.
  pub async fn sync_license_alerts(&mut self, vehicles: &[Vehicle]) -> Committed<Vec<Notification>> {
    let now = self.env.now();
    let mut seen: HashSet<String> = self.items.iter().map(Notification::key).collect();

    let fresh: Vec<Notification> = license_alerts(vehicles, now, &self.policy)
      .into_iter()
      .filter(|alert| alert.days_until_expiry <= self.policy.notify_within_days)
      .filter(|alert| seen.insert(dedup_key(NotificationKind::License, &alert.vehicle_id.to_string())))
      .map(|alert| Notification {
        id:         self.env.next_id(),
        kind:       NotificationKind::License,
        source_id:  alert.vehicle_id.to_string(),
        title:      "License Expiry Alert".into(),
        message:    alert.message(),
        priority:   alert.priority(),
        created_at: now,
        read:       false,
      })
      .collect();

    if fresh.is_empty() {
      return Committed::new(fresh);
    }

    info!(count = fresh.len(), "new licence expiry notifications");
    self.items.splice(0..0, fresh.iter().cloned());

    let mut out = Committed::new(fresh);
    out.note(self.save().await);
    out
  }

  /// Store a notification from another source unless one with the same key
  /// already exists. Returns the stored notification, or `None` if it was a
  /// duplicate.
  pub async fn push(&mut self, input: NewNotification) -> Committed<Option<Notification>> {
    if self.has_key(&dedup_key(input.kind, &input.source_id)) {
      return Committed::new(None);
    }

    let notification = Notification {
      id:         self.env.next_id(),
      kind:       input.kind,
      source_id:  input.source_id,
      title:      input.title,
      message:    input.message,
      priority:   input.priority,
      created_at: self.env.now(),
      read:       false,
    };
    debug!(key = %notification.key(), "notification added");
    self.items.insert(0, notification.clone());

    let mut out = Committed::new(Some(notification));
    out.note(self.save().await);
    out
  }

  /// Returns `None` if `id` is unknown.
  pub async fn mark_read(&mut self, id: Uuid) -> Option<Committed<Notification>> {
    let notification = self.items.iter_mut().find(|n| n.id == id)?;
    notification.read = true;
    let updated = notification.clone();

    let mut out = Committed::new(updated);
    out.note(self.save().await);
    Some(out)
  }

  /// Drop notifications older than the retention window. Returns how many
  /// were removed.
  pub async fn prune(&mut self) -> Committed<usize> {
    let now = self.env.now();
    let before = self.items.len();
    self.items.retain(|n| self.retention.retains(n.created_at, now));
    let removed = before - self.items.len();

    let mut out = Committed::new(removed);
    if removed > 0 {
      info!(removed, "pruned expired notifications");
      out.note(self.save().await);
    }
    out
  }

  /// Remove every notification and delete the collection from the store.
  pub async fn clear(&mut self) -> Committed<usize> {
    let removed = self.items.len();
    self.items.clear();

    let mut out = Committed::new(removed);
    out.note(remove_collection(&*self.store, Collection::Notifications).await);
    out
  }
}
