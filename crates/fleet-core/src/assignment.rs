//! Driver ↔ vehicle assignments.
//!
//! The assignment table is the source of truth for who drives what. At most
//! one assignment per vehicle is `Active` at any time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AssignmentStatus {
  Active,
  Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
  pub id:              Uuid,
  pub vehicle_id:      Uuid,
  pub driver_id:       Uuid,
  pub assigned_date:   NaiveDate,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub unassigned_date: Option<NaiveDate>,
  pub status:          AssignmentStatus,
}

impl Assignment {
  pub fn is_active(&self) -> bool { self.status == AssignmentStatus::Active }

  /// Close the assignment as of `date`.
  pub(crate) fn complete(&mut self, date: NaiveDate) {
    self.status = AssignmentStatus::Completed;
    self.unassigned_date = Some(date);
  }
}
