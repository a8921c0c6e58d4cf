//! Log entries: remittances, maintenance, expenses and incidents recorded
//! against a driver and a vehicle.
//!
//! The variant-specific fields live in [`LogDetails`], flattened into the
//! entry so the persisted record carries a single `type` discriminant next to
//! the shared fields.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

// ─── Enumerations ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PaymentStatus {
  Paid,
  Unpaid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IncidentSeverity {
  Minor,
  Major,
  Critical,
}

/// The `type` discriminant of a log entry, without its payload.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogKind {
  Remittance,
  Maintenance,
  Expense,
  Incident,
}

// ─── Details ─────────────────────────────────────────────────────────────────

/// The variant-specific payload of a log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum LogDetails {
  Remittance {
    amount:  f64,
    status:  PaymentStatus,
    week_of: NaiveDate,
  },
  Maintenance {
    amount:               f64,
    service_provider:     String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    maintenance_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    maintenance_item:     Option<String>,
  },
  Expense {
    amount:   f64,
    category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    receipt:  Option<String>,
  },
  Incident {
    severity:    IncidentSeverity,
    location:    String,
    reported_to: String,
  },
}

impl LogDetails {
  pub fn kind(&self) -> LogKind {
    match self {
      Self::Remittance { .. } => LogKind::Remittance,
      Self::Maintenance { .. } => LogKind::Maintenance,
      Self::Expense { .. } => LogKind::Expense,
      Self::Incident { .. } => LogKind::Incident,
    }
  }

  /// The monetary amount, for every variant that carries one.
  pub fn amount(&self) -> Option<f64> {
    match self {
      Self::Remittance { amount, .. }
      | Self::Maintenance { amount, .. }
      | Self::Expense { amount, .. } => Some(*amount),
      Self::Incident { .. } => None,
    }
  }

  /// The payment status; only remittances have one.
  pub fn payment_status(&self) -> Option<PaymentStatus> {
    match self {
      Self::Remittance { status, .. } => Some(*status),
      _ => None,
    }
  }
}

// ─── LogEntry ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
  pub id:          Uuid,
  pub driver_id:   Uuid,
  pub vehicle_id:  Uuid,
  pub date:        NaiveDate,
  #[serde(default)]
  pub description: String,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub attachments: Vec<String>,
  #[serde(flatten)]
  pub details:     LogDetails,
}

impl LogEntry {
  pub fn kind(&self) -> LogKind { self.details.kind() }

  pub fn amount(&self) -> Option<f64> { self.details.amount() }

  pub fn payment_status(&self) -> Option<PaymentStatus> { self.details.payment_status() }

  pub(crate) fn from_new(id: Uuid, input: NewLogEntry) -> Self {
    Self {
      id,
      driver_id: input.driver_id,
      vehicle_id: input.vehicle_id,
      date: input.date,
      description: input.description,
      attachments: input.attachments,
      details: input.details,
    }
  }

  pub(crate) fn apply(&mut self, patch: LogEntryPatch) {
    if let Some(v) = patch.driver_id {
      self.driver_id = v;
    }
    if let Some(v) = patch.vehicle_id {
      self.vehicle_id = v;
    }
    if let Some(v) = patch.date {
      self.date = v;
    }
    if let Some(v) = patch.description {
      self.description = v;
    }
    if let Some(v) = patch.attachments {
      self.attachments = v;
    }
    if let Some(v) = patch.details {
      self.details = v;
    }
  }
}

/// Input to [`Repository::create_log_entry`](crate::repository::Repository::create_log_entry).
#[derive(Debug, Clone)]
pub struct NewLogEntry {
  pub driver_id:   Uuid,
  pub vehicle_id:  Uuid,
  pub date:        NaiveDate,
  pub description: String,
  pub attachments: Vec<String>,
  pub details:     LogDetails,
}

impl NewLogEntry {
  pub fn new(driver_id: Uuid, vehicle_id: Uuid, date: NaiveDate, details: LogDetails) -> Self {
    Self {
      driver_id,
      vehicle_id,
      date,
      description: String::new(),
      attachments: Vec::new(),
      details,
    }
  }
}

/// Partial update for a log entry. Replacing `details` may change its type.
#[derive(Debug, Clone, Default)]
pub struct LogEntryPatch {
  pub driver_id:   Option<Uuid>,
  pub vehicle_id:  Option<Uuid>,
  pub date:        Option<NaiveDate>,
  pub description: Option<String>,
  pub attachments: Option<Vec<String>>,
  pub details:     Option<LogDetails>,
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn date(s: &str) -> NaiveDate { s.parse().unwrap() }

  #[test]
  fn remittance_serialises_flat_with_type_tag() {
    let entry = LogEntry {
      id:          Uuid::from_u128(1),
      driver_id:   Uuid::from_u128(2),
      vehicle_id:  Uuid::from_u128(3),
      date:        date("2025-03-03"),
      description: "week 10".into(),
      attachments: vec![],
      details:     LogDetails::Remittance {
        amount:  250.0,
        status:  PaymentStatus::Paid,
        week_of: date("2025-03-03"),
      },
    };

    let value = serde_json::to_value(&entry).unwrap();
    assert_eq!(value["type"], "remittance");
    assert_eq!(value["weekOf"], "2025-03-03");
    assert_eq!(value["status"], "paid");
    assert_eq!(value["driverId"], Uuid::from_u128(2).to_string());
    assert!(value.get("attachments").is_none());
  }

  #[test]
  fn incident_parses_from_stored_shape() {
    let raw = json!({
      "id": Uuid::from_u128(9),
      "driverId": Uuid::from_u128(2),
      "vehicleId": Uuid::from_u128(3),
      "type": "incident",
      "date": "2025-01-15",
      "description": "scraped mirror",
      "severity": "minor",
      "location": "depot",
      "reportedTo": "ops"
    });

    let entry: LogEntry = serde_json::from_value(raw).unwrap();
    assert_eq!(entry.kind(), LogKind::Incident);
    assert_eq!(entry.amount(), None);
    assert_eq!(entry.payment_status(), None);
    assert!(matches!(
      entry.details,
      LogDetails::Incident { severity: IncidentSeverity::Minor, ref reported_to, .. }
        if reported_to == "ops"
    ));
  }

  #[test]
  fn capabilities_by_variant() {
    let expense = LogDetails::Expense {
      amount:   12.5,
      category: "fuel".into(),
      receipt:  None,
    };
    assert_eq!(expense.amount(), Some(12.5));
    assert_eq!(expense.payment_status(), None);

    let remittance = LogDetails::Remittance {
      amount:  100.0,
      status:  PaymentStatus::Unpaid,
      week_of: date("2025-01-06"),
    };
    assert_eq!(remittance.payment_status(), Some(PaymentStatus::Unpaid));
  }

  #[test]
  fn kind_parses_from_str() {
    assert_eq!("maintenance".parse::<LogKind>().unwrap(), LogKind::Maintenance);
    assert!("fuel".parse::<LogKind>().is_err());
  }
}
