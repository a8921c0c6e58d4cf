//! Read-side query types: text search, the report filter, and dashboard
//! counters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  driver::Driver,
  log::{LogEntry, LogKind, PaymentStatus},
  vehicle::{Vehicle, VehicleStatus},
};

// ─── Search ──────────────────────────────────────────────────────────────────

/// Drivers and vehicles matching a free-text query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResult {
  pub drivers:  Vec<Driver>,
  pub vehicles: Vec<Vehicle>,
}

impl SearchResult {
  pub fn is_empty(&self) -> bool { self.drivers.is_empty() && self.vehicles.is_empty() }
}

/// Case-insensitive match over name, licence number and email.
pub fn driver_matches(driver: &Driver, query: &str) -> bool {
  let q = query.to_lowercase();
  [&driver.name, &driver.license_number, &driver.email]
    .iter()
    .any(|field| field.to_lowercase().contains(&q))
}

/// Case-insensitive match over plate, make, model and VIN.
pub fn vehicle_matches(vehicle: &Vehicle, query: &str) -> bool {
  let q = query.to_lowercase();
  [&vehicle.plate_number, &vehicle.make, &vehicle.model, &vehicle.vin]
    .iter()
    .any(|field| field.to_lowercase().contains(&q))
}

// ─── Report filter ───────────────────────────────────────────────────────────

/// Selects log entries for a report. Empty lists and `None` bounds match
/// everything; the date range is inclusive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogFilter {
  pub vehicle_ids: Vec<Uuid>,
  pub driver_ids:  Vec<Uuid>,
  pub kinds:       Vec<LogKind>,
  pub date_from:   Option<NaiveDate>,
  pub date_to:     Option<NaiveDate>,
}

impl LogFilter {
  pub fn matches(&self, entry: &LogEntry) -> bool {
    (self.vehicle_ids.is_empty() || self.vehicle_ids.contains(&entry.vehicle_id))
      && (self.driver_ids.is_empty() || self.driver_ids.contains(&entry.driver_id))
      && (self.kinds.is_empty() || self.kinds.contains(&entry.kind()))
      && self.date_from.is_none_or(|from| entry.date >= from)
      && self.date_to.is_none_or(|to| entry.date <= to)
  }

  /// Sum of the amounts of the given entries; entries without an amount
  /// contribute nothing.
  pub fn total_amount<'a>(entries: impl IntoIterator<Item = &'a LogEntry>) -> f64 {
    entries.into_iter().filter_map(LogEntry::amount).sum()
  }
}

// ─── Dashboard ───────────────────────────────────────────────────────────────

/// Headline counters for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetStats {
  pub total_drivers:              usize,
  pub active_drivers:             usize,
  pub total_vehicles:             usize,
  pub available_vehicles:         usize,
  pub assigned_vehicles:          usize,
  pub vehicles_under_maintenance: usize,
  /// Sum of paid remittances.
  pub total_remittances:          f64,
  /// Sum of unpaid remittances.
  pub pending_remittances:        f64,
  pub total_expenses:             f64,
}

impl FleetStats {
  pub fn compute(drivers: &[Driver], vehicles: &[Vehicle], logs: &[LogEntry]) -> Self {
    let vehicles_with = |status: VehicleStatus| vehicles.iter().filter(|v| v.status == status).count();
    let remittances = |status: PaymentStatus| -> f64 {
      logs
        .iter()
        .filter(|l| l.payment_status() == Some(status))
        .filter_map(LogEntry::amount)
        .sum()
    };

    Self {
      total_drivers:              drivers.len(),
      active_drivers:             drivers.iter().filter(|d| d.is_active()).count(),
      total_vehicles:             vehicles.len(),
      available_vehicles:         vehicles_with(VehicleStatus::Available),
      assigned_vehicles:          vehicles_with(VehicleStatus::Assigned),
      vehicles_under_maintenance: vehicles_with(VehicleStatus::Maintenance),
      total_remittances:          remittances(PaymentStatus::Paid),
      pending_remittances:        remittances(PaymentStatus::Unpaid),
      total_expenses:             logs
        .iter()
        .filter(|l| l.kind() == LogKind::Expense)
        .filter_map(LogEntry::amount)
        .sum(),
    }
  }
}
