//! [`Workspace`], the composition point that ties the repository, the
//! notification center and the activity log together.
//!
//! Build one per process with [`Workspace::open`]. Its action handlers
//! perform a repository mutation, record what happened in the activity log
//! and, when vehicles change, re-evaluate licence alerts.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{
  Result,
  activity::{ActivityKind, ActivityLog},
  alert::AlertPolicy,
  assignment::Assignment,
  clock::Env,
  committed::Committed,
  driver::{Driver, DriverPatch, NewDriver},
  log::{LogEntry, LogEntryPatch, NewLogEntry},
  notification::{Notification, NotificationCenter},
  query::{LogFilter, SearchResult},
  repository::{CascadeReport, Repository},
  retention::RetentionPolicy,
  store::CollectionStore,
  vehicle::{NewVehicle, Vehicle, VehiclePatch},
};

/// Tunables for a workspace. Every section has defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceSettings {
  pub alerts:        AlertPolicy,
  pub activity:      RetentionPolicy,
  pub notifications: RetentionPolicy,
}

pub struct Workspace<S> {
  repository:    Repository<S>,
  notifications: NotificationCenter<S>,
  activity:      ActivityLog<S>,
}

impl<S: CollectionStore> Workspace<S> {
  /// Load every collection, run the session-start retention prunes and
  /// evaluate licence alerts once.
  ///
  /// Fails only if the store itself cannot be read; malformed collections
  /// load as empty.
  pub async fn open(
    store: Arc<S>,
    env: Env,
    settings: WorkspaceSettings,
  ) -> Result<Committed<Self>> {
    let repository = Repository::load(store.clone(), env.clone()).await?;
    let notifications =
      NotificationCenter::load(store.clone(), env.clone(), settings.alerts, settings.notifications)
        .await?;
    let activity = ActivityLog::load(store, env, settings.activity).await?;

    let mut workspace = Self {
      repository,
      notifications,
      activity,
    };

    let mut out = Committed::new(());
    out.absorb(workspace.notifications.prune().await);
    out.absorb(workspace.activity.prune().await);
    out.absorb(workspace.sync_alerts().await);

    info!(
      drivers = workspace.repository.drivers().len(),
      vehicles = workspace.repository.vehicles().len(),
      notifications = workspace.notifications.items().len(),
      activity = workspace.activity.all().len(),
      "workspace opened"
    );

    Ok(out.map(|()| workspace))
  }

  pub fn repository(&self) -> &Repository<S> { &self.repository }

  pub fn notifications(&self) -> &NotificationCenter<S> { &self.notifications }

  pub fn notifications_mut(&mut self) -> &mut NotificationCenter<S> { &mut self.notifications }

  pub fn activity(&self) -> &ActivityLog<S> { &self.activity }

  pub fn activity_mut(&mut self) -> &mut ActivityLog<S> { &mut self.activity }

  /// Re-evaluate licence alerts against the current vehicles.
  pub async fn sync_alerts(&mut self) -> Committed<Vec<Notification>> {
    self
      .notifications
      .sync_license_alerts(self.repository.vehicles())
      .await
  }

  async fn note<T>(&mut self, out: &mut Committed<T>, message: String, kind: ActivityKind) {
    out.absorb(self.activity.record(message, kind).await);
  }

  async fn after_vehicle_change<T>(&mut self, out: &mut Committed<T>) {
    out.absorb(self.sync_alerts().await);
  }

  // ── Drivers ───────────────────────────────────────────────────────────────

  pub async fn register_driver(&mut self, input: NewDriver) -> Committed<Driver> {
    let mut out = self.repository.create_driver(input).await;
    let message = format!("Driver {} added", out.value.name);
    self.note(&mut out, message, ActivityKind::Driver).await;
    out
  }

  pub async fn edit_driver(&mut self, id: Uuid, patch: DriverPatch) -> Option<Committed<Driver>> {
    let mut out = self.repository.update_driver(id, patch).await?;
    let message = format!("Driver {} updated", out.value.name);
    self.note(&mut out, message, ActivityKind::Driver).await;
    Some(out)
  }

  pub async fn remove_driver(&mut self, id: Uuid) -> Option<Committed<CascadeReport>> {
    let name = self.repository.driver(id)?.name.clone();
    let mut out = self.repository.delete_driver(id).await?;
    self
      .note(&mut out, format!("Driver {name} deleted"), ActivityKind::Driver)
      .await;
    Some(out)
  }

  // ── Vehicles ──────────────────────────────────────────────────────────────

  pub async fn register_vehicle(&mut self, input: NewVehicle) -> Committed<Vehicle> {
    let mut out = self.repository.create_vehicle(input).await;
    let message = format!("Vehicle {} registered", out.value.plate_number);
    self.note(&mut out, message, ActivityKind::Vehicle).await;
    self.after_vehicle_change(&mut out).await;
    out
  }

  pub async fn edit_vehicle(&mut self, id: Uuid, patch: VehiclePatch) -> Option<Committed<Vehicle>> {
    let mut out = self.repository.update_vehicle(id, patch).await?;
    let message = format!("Vehicle {} updated", out.value.plate_number);
    self.note(&mut out, message, ActivityKind::Vehicle).await;
    self.after_vehicle_change(&mut out).await;
    Some(out)
  }

  pub async fn remove_vehicle(&mut self, id: Uuid) -> Option<Committed<CascadeReport>> {
    let plate = self.repository.vehicle(id)?.plate_number.clone();
    let mut out = self.repository.delete_vehicle(id).await?;
    self
      .note(&mut out, format!("Vehicle {plate} deleted"), ActivityKind::Vehicle)
      .await;
    self.after_vehicle_change(&mut out).await;
    Some(out)
  }

  // ── Assignments ───────────────────────────────────────────────────────────

  pub async fn assign(&mut self, vehicle_id: Uuid, driver_id: Uuid) -> Result<Committed<Assignment>> {
    let mut out = self.repository.assign_vehicle(vehicle_id, driver_id).await?;
    let message = format!(
      "Vehicle {} assigned to {}",
      self.plate(vehicle_id),
      self.driver_name(driver_id)
    );
    self.note(&mut out, message, ActivityKind::Assignment).await;
    Ok(out)
  }

  pub async fn unassign(&mut self, vehicle_id: Uuid) -> Option<Committed<Assignment>> {
    let mut out = self.repository.unassign_vehicle(vehicle_id).await?;
    let message = format!(
      "Vehicle {} unassigned from {}",
      self.plate(vehicle_id),
      self.driver_name(out.value.driver_id)
    );
    self.note(&mut out, message, ActivityKind::Assignment).await;
    Some(out)
  }

  // ── Log entries ───────────────────────────────────────────────────────────

  pub async fn record_log(&mut self, input: NewLogEntry) -> Committed<LogEntry> {
    let mut out = self.repository.create_log_entry(input).await;
    let message = format!("New {} log recorded", out.value.kind());
    self.note(&mut out, message, ActivityKind::Log).await;
    out
  }

  pub async fn edit_log(&mut self, id: Uuid, patch: LogEntryPatch) -> Option<Committed<LogEntry>> {
    let mut out = self.repository.update_log_entry(id, patch).await?;
    let message = format!("{} log {} updated", out.value.kind(), out.value.id);
    self.note(&mut out, message, ActivityKind::Log).await;
    Some(out)
  }

  pub async fn remove_log(&mut self, id: Uuid) -> Option<Committed<LogEntry>> {
    let mut out = self.repository.delete_log_entry(id).await?;
    let message = format!("{} log {} deleted", out.value.kind(), out.value.id);
    self.note(&mut out, message, ActivityKind::Log).await;
    Some(out)
  }

  // ── Read-side actions worth recording ─────────────────────────────────────

  pub async fn note_search(&mut self, query: &str) -> Committed<SearchResult> {
    let mut out = Committed::new(self.repository.search(query));
    self
      .note(&mut out, format!("Search performed: \"{query}\""), ActivityKind::Search)
      .await;
    out
  }

  pub async fn note_report(&mut self, filter: &LogFilter) -> Committed<Vec<LogEntry>> {
    let entries = self.repository.filter_logs(filter).cloned().collect();
    let mut out = Committed::new(entries);
    self
      .note(&mut out, "Report generated".to_owned(), ActivityKind::Report)
      .await;
    out
  }

  fn plate(&self, vehicle_id: Uuid) -> String {
    self
      .repository
      .vehicle(vehicle_id)
      .map_or_else(|| vehicle_id.to_string(), |v| v.plate_number.clone())
  }

  fn driver_name(&self, driver_id: Uuid) -> String {
    self
      .repository
      .driver(driver_id)
      .map_or_else(|| driver_id.to_string(), |d| d.name.clone())
  }
}
