//! Driver records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DriverStatus {
  #[default]
  Active,
  Inactive,
}

/// A registered driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
  pub id:                       Uuid,
  pub name:                     String,
  pub license_number:           String,
  #[serde(default)]
  pub phone:                    String,
  #[serde(default)]
  pub email:                    String,
  #[serde(default)]
  pub address:                  String,
  pub date_joined:              NaiveDate,
  pub status:                   DriverStatus,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub date_of_birth:            Option<NaiveDate>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub emergency_contact_number: Option<String>,
}

impl Driver {
  pub fn is_active(&self) -> bool { self.status == DriverStatus::Active }

  pub(crate) fn from_new(id: Uuid, input: NewDriver) -> Self {
    Self {
      id,
      name: input.name,
      license_number: input.license_number,
      phone: input.phone,
      email: input.email,
      address: input.address,
      date_joined: input.date_joined,
      status: input.status,
      date_of_birth: input.date_of_birth,
      emergency_contact_number: input.emergency_contact_number,
    }
  }

  pub(crate) fn apply(&mut self, patch: DriverPatch) {
    if let Some(v) = patch.name {
      self.name = v;
    }
    if let Some(v) = patch.license_number {
      self.license_number = v;
    }
    if let Some(v) = patch.phone {
      self.phone = v;
    }
    if let Some(v) = patch.email {
      self.email = v;
    }
    if let Some(v) = patch.address {
      self.address = v;
    }
    if let Some(v) = patch.date_joined {
      self.date_joined = v;
    }
    if let Some(v) = patch.status {
      self.status = v;
    }
    if let Some(v) = patch.date_of_birth {
      self.date_of_birth = v;
    }
    if let Some(v) = patch.emergency_contact_number {
      self.emergency_contact_number = v;
    }
  }
}

/// Input to [`Repository::create_driver`](crate::repository::Repository::create_driver).
/// The id is always assigned by the repository.
#[derive(Debug, Clone)]
pub struct NewDriver {
  pub name:                     String,
  pub license_number:           String,
  pub phone:                    String,
  pub email:                    String,
  pub address:                  String,
  pub date_joined:              NaiveDate,
  pub status:                   DriverStatus,
  pub date_of_birth:            Option<NaiveDate>,
  pub emergency_contact_number: Option<String>,
}

impl NewDriver {
  /// Convenience constructor: an active driver with empty contact fields.
  pub fn new(
    name: impl Into<String>,
    license_number: impl Into<String>,
    date_joined: NaiveDate,
  ) -> Self {
    Self {
      name: name.into(),
      license_number: license_number.into(),
      phone: String::new(),
      email: String::new(),
      address: String::new(),
      date_joined,
      status: DriverStatus::Active,
      date_of_birth: None,
      emergency_contact_number: None,
    }
  }
}

/// Partial update for a driver. `None` leaves a field untouched; for optional
/// fields, `Some(None)` clears them.
#[derive(Debug, Clone, Default)]
pub struct DriverPatch {
  pub name:                     Option<String>,
  pub license_number:           Option<String>,
  pub phone:                    Option<String>,
  pub email:                    Option<String>,
  pub address:                  Option<String>,
  pub date_joined:              Option<NaiveDate>,
  pub status:                   Option<DriverStatus>,
  pub date_of_birth:            Option<Option<NaiveDate>>,
  pub emergency_contact_number: Option<Option<String>>,
}
