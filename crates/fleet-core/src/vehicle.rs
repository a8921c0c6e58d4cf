//! Vehicle records.
//!
//! `assigned_driver_id` is a denormalised cache of the vehicle's active
//! [`Assignment`](crate::assignment::Assignment). Only the repository's
//! assign/unassign operations write it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VehicleStatus {
  #[default]
  Available,
  Assigned,
  Maintenance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
pub enum FuelType {
  #[default]
  Gasoline,
  Diesel,
  Electric,
  Hybrid,
  #[serde(rename = "Plug-in Hybrid")]
  #[strum(serialize = "Plug-in Hybrid")]
  PlugInHybrid,
  #[serde(rename = "CNG")]
  #[strum(serialize = "CNG")]
  Cng,
  #[serde(rename = "LPG")]
  #[strum(serialize = "LPG")]
  Lpg,
  Hydrogen,
  Biodiesel,
  Ethanol,
  #[serde(rename = "Synthetic fuels")]
  #[strum(serialize = "Synthetic fuels")]
  SyntheticFuels,
}

/// A vehicle in the fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
  pub id:                   Uuid,
  pub plate_number:         String,
  /// Number of the vehicle's road licence (not the driver's licence).
  #[serde(default)]
  pub license_number:       String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub license_issuing_date: Option<NaiveDate>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub license_expiry_date:  Option<NaiveDate>,
  pub make:                 String,
  pub model:                String,
  pub year:                 u16,
  #[serde(default)]
  pub color:                String,
  #[serde(default)]
  pub vin:                  String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub registration_date:    Option<NaiveDate>,
  pub status:               VehicleStatus,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub assigned_driver_id:   Option<Uuid>,
  #[serde(default)]
  pub fuel_type:            FuelType,
  #[serde(default)]
  pub mileage:              u64,
}

impl Vehicle {
  pub fn is_available(&self) -> bool { self.status == VehicleStatus::Available }

  pub(crate) fn from_new(id: Uuid, input: NewVehicle) -> Self {
    Self {
      id,
      plate_number: input.plate_number,
      license_number: input.license_number,
      license_issuing_date: input.license_issuing_date,
      license_expiry_date: input.license_expiry_date,
      make: input.make,
      model: input.model,
      year: input.year,
      color: input.color,
      vin: input.vin,
      registration_date: input.registration_date,
      status: input.status,
      assigned_driver_id: None,
      fuel_type: input.fuel_type,
      mileage: input.mileage,
    }
  }

  /// Merge every descriptive field of `patch`. Status is handled by the
  /// repository because it is tied to assignments.
  pub(crate) fn apply(&mut self, patch: VehiclePatch) {
    if let Some(v) = patch.plate_number {
      self.plate_number = v;
    }
    if let Some(v) = patch.license_number {
      self.license_number = v;
    }
    if let Some(v) = patch.license_issuing_date {
      self.license_issuing_date = v;
    }
    if let Some(v) = patch.license_expiry_date {
      self.license_expiry_date = v;
    }
    if let Some(v) = patch.make {
      self.make = v;
    }
    if let Some(v) = patch.model {
      self.model = v;
    }
    if let Some(v) = patch.year {
      self.year = v;
    }
    if let Some(v) = patch.color {
      self.color = v;
    }
    if let Some(v) = patch.vin {
      self.vin = v;
    }
    if let Some(v) = patch.registration_date {
      self.registration_date = v;
    }
    if let Some(v) = patch.fuel_type {
      self.fuel_type = v;
    }
    if let Some(v) = patch.mileage {
      self.mileage = v;
    }
  }
}

/// Input to [`Repository::create_vehicle`](crate::repository::Repository::create_vehicle).
///
/// `status` may be `Available` or `Maintenance`; a vehicle only becomes
/// `Assigned` through an assignment.
#[derive(Debug, Clone)]
pub struct NewVehicle {
  pub plate_number:         String,
  pub license_number:       String,
  pub license_issuing_date: Option<NaiveDate>,
  pub license_expiry_date:  Option<NaiveDate>,
  pub make:                 String,
  pub model:                String,
  pub year:                 u16,
  pub color:                String,
  pub vin:                  String,
  pub registration_date:    Option<NaiveDate>,
  pub status:               VehicleStatus,
  pub fuel_type:            FuelType,
  pub mileage:              u64,
}

impl NewVehicle {
  /// Convenience constructor with every optional field left empty.
  pub fn new(
    plate_number: impl Into<String>,
    make: impl Into<String>,
    model: impl Into<String>,
    year: u16,
  ) -> Self {
    Self {
      plate_number: plate_number.into(),
      license_number: String::new(),
      license_issuing_date: None,
      license_expiry_date: None,
      make: make.into(),
      model: model.into(),
      year,
      color: String::new(),
      vin: String::new(),
      registration_date: None,
      status: VehicleStatus::Available,
      fuel_type: FuelType::default(),
      mileage: 0,
    }
  }

  pub fn with_license_expiry(mut self, expiry: NaiveDate) -> Self {
    self.license_expiry_date = Some(expiry);
    self
  }
}

/// Partial update for a vehicle. `None` leaves a field untouched; for optional
/// fields, `Some(None)` clears them.
#[derive(Debug, Clone, Default)]
pub struct VehiclePatch {
  pub plate_number:         Option<String>,
  pub license_number:       Option<String>,
  pub license_issuing_date: Option<Option<NaiveDate>>,
  pub license_expiry_date:  Option<Option<NaiveDate>>,
  pub make:                 Option<String>,
  pub model:                Option<String>,
  pub year:                 Option<u16>,
  pub color:                Option<String>,
  pub vin:                  Option<String>,
  pub registration_date:    Option<Option<NaiveDate>>,
  /// Only `Available` ↔ `Maintenance` transitions are honoured.
  pub status:               Option<VehicleStatus>,
  pub fuel_type:            Option<FuelType>,
  pub mileage:              Option<u64>,
}
