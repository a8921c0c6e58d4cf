//! [`Repository`], the single owner of drivers, vehicles, assignments and
//! log entries.
//!
//! Every mutation is applied to the in-memory collections first and then
//! written back whole to the [`CollectionStore`]. Cross-entity rules live
//! here and nowhere else:
//!
//! - deleting a driver or vehicle cascades to its assignments and log
//!   entries;
//! - a vehicle has at most one active assignment, and its `status` /
//!   `assigned_driver_id` always mirror that assignment.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  assignment::{Assignment, AssignmentStatus},
  clock::Env,
  committed::Committed,
  driver::{Driver, DriverPatch, NewDriver},
  log::{LogEntry, LogEntryPatch, NewLogEntry},
  query::{FleetStats, LogFilter, SearchResult, driver_matches, vehicle_matches},
  store::{Collection, CollectionStore, load_collection, save_collection},
  vehicle::{NewVehicle, Vehicle, VehiclePatch, VehicleStatus},
};

/// What a cascading delete removed alongside the primary record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeReport {
  pub assignments:       usize,
  pub logs:              usize,
  /// Vehicles set back to available because their active assignment was
  /// deleted with a driver.
  pub released_vehicles: Vec<Uuid>,
}

pub struct Repository<S> {
  store:       Arc<S>,
  env:         Env,
  drivers:     Vec<Driver>,
  vehicles:    Vec<Vehicle>,
  assignments: Vec<Assignment>,
  logs:        Vec<LogEntry>,
}

impl<S: CollectionStore> Repository<S> {
  /// Load all four entity collections from `store`.
  pub async fn load(store: Arc<S>, env: Env) -> Result<Self> {
    let drivers = load_collection(&*store, Collection::Drivers).await?;
    let vehicles = load_collection(&*store, Collection::Vehicles).await?;
    let assignments = load_collection(&*store, Collection::Assignments).await?;
    let logs = load_collection(&*store, Collection::Logs).await?;

    Ok(Self {
      store,
      env,
      drivers,
      vehicles,
      assignments,
      logs,
    })
  }

  // ── Collections ───────────────────────────────────────────────────────────

  pub fn drivers(&self) -> &[Driver] { &self.drivers }

  pub fn vehicles(&self) -> &[Vehicle] { &self.vehicles }

  pub fn assignments(&self) -> &[Assignment] { &self.assignments }

  pub fn logs(&self) -> &[LogEntry] { &self.logs }

  async fn save_drivers(&self) -> Result<()> {
    save_collection(&*self.store, Collection::Drivers, &self.drivers).await
  }

  async fn save_vehicles(&self) -> Result<()> {
    save_collection(&*self.store, Collection::Vehicles, &self.vehicles).await
  }

  async fn save_assignments(&self) -> Result<()> {
    save_collection(&*self.store, Collection::Assignments, &self.assignments).await
  }

  async fn save_logs(&self) -> Result<()> {
    save_collection(&*self.store, Collection::Logs, &self.logs).await
  }

  // ── Drivers ───────────────────────────────────────────────────────────────

  pub async fn create_driver(&mut self, input: NewDriver) -> Committed<Driver> {
    let driver = Driver::from_new(self.env.next_id(), input);
    debug!(id = %driver.id, name = %driver.name, "driver created");
    self.drivers.push(driver.clone());

    let mut out = Committed::new(driver);
    out.note(self.save_drivers().await);
    out
  }

  /// Merge `patch` into the driver. Returns `None` if `id` is unknown.
  pub async fn update_driver(&mut self, id: Uuid, patch: DriverPatch) -> Option<Committed<Driver>> {
    let driver = self.drivers.iter_mut().find(|d| d.id == id)?;
    driver.apply(patch);
    let updated = driver.clone();
    debug!(%id, "driver updated");

    let mut out = Committed::new(updated);
    out.note(self.save_drivers().await);
    Some(out)
  }

  /// Delete a driver together with every assignment and log entry that
  /// references it. Vehicles the driver was actively assigned to become
  /// available again.
  pub async fn delete_driver(&mut self, id: Uuid) -> Option<Committed<CascadeReport>> {
    let index = self.drivers.iter().position(|d| d.id == id)?;
    self.drivers.remove(index);

    let released_vehicles: Vec<Uuid> = self
      .assignments
      .iter()
      .filter(|a| a.driver_id == id && a.is_active())
      .map(|a| a.vehicle_id)
      .collect();
    for vehicle in self
      .vehicles
      .iter_mut()
      .filter(|v| released_vehicles.contains(&v.id))
    {
      vehicle.status = VehicleStatus::Available;
      vehicle.assigned_driver_id = None;
    }

    let assignments_before = self.assignments.len();
    self.assignments.retain(|a| a.driver_id != id);
    let logs_before = self.logs.len();
    self.logs.retain(|l| l.driver_id != id);

    let report = CascadeReport {
      assignments: assignments_before - self.assignments.len(),
      logs: logs_before - self.logs.len(),
      released_vehicles,
    };
    debug!(
      %id,
      assignments = report.assignments,
      logs = report.logs,
      "driver deleted"
    );

    let mut out = Committed::new(report);
    out.note(self.save_drivers().await);
    if out.value.assignments > 0 {
      out.note(self.save_assignments().await);
    }
    if out.value.logs > 0 {
      out.note(self.save_logs().await);
    }
    if !out.value.released_vehicles.is_empty() {
      out.note(self.save_vehicles().await);
    }
    Some(out)
  }

  // ── Vehicles ──────────────────────────────────────────────────────────────

  pub async fn create_vehicle(&mut self, mut input: NewVehicle) -> Committed<Vehicle> {
    if input.status == VehicleStatus::Assigned {
      warn!(plate = %input.plate_number, "new vehicle cannot start assigned; marking available");
      input.status = VehicleStatus::Available;
    }
    let vehicle = Vehicle::from_new(self.env.next_id(), input);
    debug!(id = %vehicle.id, plate = %vehicle.plate_number, "vehicle created");
    self.vehicles.push(vehicle.clone());

    let mut out = Committed::new(vehicle);
    out.note(self.save_vehicles().await);
    out
  }

  /// Merge `patch` into the vehicle. Returns `None` if `id` is unknown.
  ///
  /// A status change into or out of `Assigned` is ignored: that transition
  /// belongs to [`assign_vehicle`](Self::assign_vehicle) and
  /// [`unassign_vehicle`](Self::unassign_vehicle).
  pub async fn update_vehicle(
    &mut self,
    id: Uuid,
    mut patch: VehiclePatch,
  ) -> Option<Committed<Vehicle>> {
    let vehicle = self.vehicles.iter_mut().find(|v| v.id == id)?;
    let requested = patch.status.take();
    vehicle.apply(patch);

    if let Some(next) = requested
      && next != vehicle.status
    {
      if next == VehicleStatus::Assigned || vehicle.status == VehicleStatus::Assigned {
        warn!(
          %id,
          from = %vehicle.status,
          to = %next,
          "ignoring status change that bypasses assignment"
        );
      } else {
        vehicle.status = next;
      }
    }

    let updated = vehicle.clone();
    debug!(%id, "vehicle updated");

    let mut out = Committed::new(updated);
    out.note(self.save_vehicles().await);
    Some(out)
  }

  /// Delete a vehicle together with every assignment and log entry that
  /// references it.
  pub async fn delete_vehicle(&mut self, id: Uuid) -> Option<Committed<CascadeReport>> {
    let index = self.vehicles.iter().position(|v| v.id == id)?;
    self.vehicles.remove(index);

    let assignments_before = self.assignments.len();
    self.assignments.retain(|a| a.vehicle_id != id);
    let logs_before = self.logs.len();
    self.logs.retain(|l| l.vehicle_id != id);

    let report = CascadeReport {
      assignments: assignments_before - self.assignments.len(),
      logs: logs_before - self.logs.len(),
      released_vehicles: Vec::new(),
    };
    debug!(
      %id,
      assignments = report.assignments,
      logs = report.logs,
      "vehicle deleted"
    );

    let mut out = Committed::new(report);
    out.note(self.save_vehicles().await);
    if out.value.assignments > 0 {
      out.note(self.save_assignments().await);
    }
    if out.value.logs > 0 {
      out.note(self.save_logs().await);
    }
    Some(out)
  }

  // ── Assignments ───────────────────────────────────────────────────────────

  /// Assign an available vehicle to an active driver.
  pub async fn assign_vehicle(
    &mut self,
    vehicle_id: Uuid,
    driver_id: Uuid,
  ) -> Result<Committed<Assignment>> {
    let vehicle = self
      .vehicle(vehicle_id)
      .ok_or(Error::VehicleNotFound(vehicle_id))?;
    if !vehicle.is_available() {
      return Err(Error::VehicleUnavailable {
        id:     vehicle_id,
        status: vehicle.status,
      });
    }

    let driver = self
      .driver(driver_id)
      .ok_or(Error::DriverNotFound(driver_id))?;
    if !driver.is_active() {
      return Err(Error::DriverInactive(driver_id));
    }

    if self.active_assignment(vehicle_id).is_some() {
      return Err(Error::VehicleAlreadyAssigned(vehicle_id));
    }

    let assignment = Assignment {
      id: self.env.next_id(),
      vehicle_id,
      driver_id,
      assigned_date: self.env.today(),
      unassigned_date: None,
      status: AssignmentStatus::Active,
    };
    self.assignments.push(assignment.clone());

    if let Some(vehicle) = self.vehicles.iter_mut().find(|v| v.id == vehicle_id) {
      vehicle.status = VehicleStatus::Assigned;
      vehicle.assigned_driver_id = Some(driver_id);
    }
    debug!(%vehicle_id, %driver_id, "vehicle assigned");

    let mut out = Committed::new(assignment);
    out.note(self.save_assignments().await);
    out.note(self.save_vehicles().await);
    Ok(out)
  }

  /// Complete the vehicle's active assignment and make it available again.
  /// Returns `None` if the vehicle has no active assignment.
  pub async fn unassign_vehicle(&mut self, vehicle_id: Uuid) -> Option<Committed<Assignment>> {
    let today = self.env.today();
    let assignment = self
      .assignments
      .iter_mut()
      .find(|a| a.vehicle_id == vehicle_id && a.is_active())?;
    assignment.complete(today);
    let completed = assignment.clone();

    if let Some(vehicle) = self.vehicles.iter_mut().find(|v| v.id == vehicle_id) {
      vehicle.status = VehicleStatus::Available;
      vehicle.assigned_driver_id = None;
    }
    debug!(%vehicle_id, driver_id = %completed.driver_id, "vehicle unassigned");

    let mut out = Committed::new(completed);
    out.note(self.save_assignments().await);
    out.note(self.save_vehicles().await);
    Some(out)
  }

  // ── Log entries ───────────────────────────────────────────────────────────

  pub async fn create_log_entry(&mut self, input: NewLogEntry) -> Committed<LogEntry> {
    let entry = LogEntry::from_new(self.env.next_id(), input);
    debug!(id = %entry.id, kind = %entry.kind(), "log entry created");
    self.logs.push(entry.clone());

    let mut out = Committed::new(entry);
    out.note(self.save_logs().await);
    out
  }

  pub async fn update_log_entry(
    &mut self,
    id: Uuid,
    patch: LogEntryPatch,
  ) -> Option<Committed<LogEntry>> {
    let entry = self.logs.iter_mut().find(|l| l.id == id)?;
    entry.apply(patch);
    let updated = entry.clone();
    debug!(%id, "log entry updated");

    let mut out = Committed::new(updated);
    out.note(self.save_logs().await);
    Some(out)
  }

  pub async fn delete_log_entry(&mut self, id: Uuid) -> Option<Committed<LogEntry>> {
    let index = self.logs.iter().position(|l| l.id == id)?;
    let removed = self.logs.remove(index);
    debug!(%id, "log entry deleted");

    let mut out = Committed::new(removed);
    out.note(self.save_logs().await);
    Some(out)
  }

  // ── Queries ───────────────────────────────────────────────────────────────

  pub fn driver(&self, id: Uuid) -> Option<&Driver> { self.drivers.iter().find(|d| d.id == id) }

  pub fn vehicle(&self, id: Uuid) -> Option<&Vehicle> { self.vehicles.iter().find(|v| v.id == id) }

  pub fn log_entry(&self, id: Uuid) -> Option<&LogEntry> { self.logs.iter().find(|l| l.id == id) }

  /// The vehicle's currently active assignment, if any.
  pub fn active_assignment(&self, vehicle_id: Uuid) -> Option<&Assignment> {
    self
      .assignments
      .iter()
      .find(|a| a.vehicle_id == vehicle_id && a.is_active())
  }

  pub fn assignments_for_driver(&self, driver_id: Uuid) -> impl Iterator<Item = &Assignment> {
    self.assignments.iter().filter(move |a| a.driver_id == driver_id)
  }

  pub fn assignments_for_vehicle(&self, vehicle_id: Uuid) -> impl Iterator<Item = &Assignment> {
    self.assignments.iter().filter(move |a| a.vehicle_id == vehicle_id)
  }

  pub fn logs_for_driver(&self, driver_id: Uuid) -> impl Iterator<Item = &LogEntry> {
    self.logs.iter().filter(move |l| l.driver_id == driver_id)
  }

  pub fn logs_for_vehicle(&self, vehicle_id: Uuid) -> impl Iterator<Item = &LogEntry> {
    self.logs.iter().filter(move |l| l.vehicle_id == vehicle_id)
  }

  pub fn search_drivers(&self, query: &str) -> Vec<Driver> {
    self
      .drivers
      .iter()
      .filter(|d| driver_matches(d, query))
      .cloned()
      .collect()
  }

  pub fn search_vehicles(&self, query: &str) -> Vec<Vehicle> {
    self
      .vehicles
      .iter()
      .filter(|v| vehicle_matches(v, query))
      .cloned()
      .collect()
  }

  pub fn search(&self, query: &str) -> SearchResult {
    SearchResult {
      drivers:  self.search_drivers(query),
      vehicles: self.search_vehicles(query),
    }
  }

  pub fn filter_logs<'a>(&'a self, filter: &'a LogFilter) -> impl Iterator<Item = &'a LogEntry> {
    self.logs.iter().filter(move |l| filter.matches(l))
  }

  pub fn stats(&self) -> FleetStats { FleetStats::compute(&self.drivers, &self.vehicles, &self.logs) }
}
