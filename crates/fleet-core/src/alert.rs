//! License-expiry alerts derived from vehicle state.
//!
//! Everything here is a pure function of the vehicle list and the current
//! time. Persisting alerts as notifications is the job of
//! [`NotificationCenter`](crate::notification::NotificationCenter).

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

use crate::{notification::Priority, vehicle::Vehicle};

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

// ─── Policy ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertPolicy {
  /// Raise an `Expired` alert for licences already past their expiry date.
  pub include_expired:    bool,
  /// Only alerts at most this many days out become notifications.
  pub notify_within_days: i64,
}

impl Default for AlertPolicy {
  fn default() -> Self {
    Self {
      include_expired:    false,
      notify_within_days: 90,
    }
  }
}

// ─── Buckets ─────────────────────────────────────────────────────────────────

/// Urgency tier of a licence alert, most urgent first.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
pub enum AlertBucket {
  #[serde(rename = "expired")]
  #[strum(serialize = "expired")]
  Expired,
  #[serde(rename = "today")]
  #[strum(serialize = "today")]
  Today,
  #[serde(rename = "tomorrow")]
  #[strum(serialize = "tomorrow")]
  Tomorrow,
  #[serde(rename = "2days")]
  #[strum(serialize = "2days")]
  TwoDays,
  #[serde(rename = "1week")]
  #[strum(serialize = "1week")]
  OneWeek,
  #[serde(rename = "1month")]
  #[strum(serialize = "1month")]
  OneMonth,
  #[serde(rename = "3months")]
  #[strum(serialize = "3months")]
  ThreeMonths,
}

impl AlertBucket {
  /// Classify a day count; first matching tier wins. Nothing beyond 90 days
  /// produces an alert, and nothing negative unless the policy asks for it.
  pub fn classify(days_until_expiry: i64, policy: &AlertPolicy) -> Option<Self> {
    match days_until_expiry {
      d if d < 0 => policy.include_expired.then_some(Self::Expired),
      0 => Some(Self::Today),
      1 => Some(Self::Tomorrow),
      2 => Some(Self::TwoDays),
      3..=7 => Some(Self::OneWeek),
      8..=30 => Some(Self::OneMonth),
      31..=90 => Some(Self::ThreeMonths),
      _ => None,
    }
  }
}

/// Whole days from `now` until the start (00:00 UTC) of `expiry`, rounded up.
///
/// A licence expiring today yields 0 at any time of day, tomorrow yields 1,
/// and one that expired yesterday yields -1.
pub fn days_until_expiry(expiry: NaiveDate, now: DateTime<Utc>) -> i64 {
  let millis = (expiry.and_time(NaiveTime::MIN).and_utc() - now).num_milliseconds();
  millis.div_euclid(DAY_MILLIS) + i64::from(millis.rem_euclid(DAY_MILLIS) != 0)
}

// ─── LicenseAlert ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseAlert {
  pub vehicle_id:        Uuid,
  pub plate_number:      String,
  pub license_number:    String,
  pub expiry_date:       NaiveDate,
  pub days_until_expiry: i64,
  #[serde(rename = "alertType")]
  pub bucket:            AlertBucket,
}

impl LicenseAlert {
  pub fn priority(&self) -> Priority { Priority::for_days_until_expiry(self.days_until_expiry) }

  /// One-line, human-readable description of the alert.
  pub fn message(&self) -> String {
    match self.bucket {
      AlertBucket::Expired => format!(
        "License for {} expired {} days ago",
        self.plate_number, -self.days_until_expiry
      ),
      AlertBucket::Today => format!("License for {} expires TODAY", self.plate_number),
      AlertBucket::Tomorrow => format!("License for {} expires TOMORROW", self.plate_number),
      _ => format!(
        "License for {} expires in {} days",
        self.plate_number, self.days_until_expiry
      ),
    }
  }
}

/// Every licence alert for `vehicles` as of `now`, most urgent first.
/// Vehicles without an expiry date are skipped.
pub fn license_alerts(vehicles: &[Vehicle], now: DateTime<Utc>, policy: &AlertPolicy) -> Vec<LicenseAlert> {
  let mut alerts: Vec<LicenseAlert> = vehicles
    .iter()
    .filter_map(|vehicle| {
      let expiry = vehicle.license_expiry_date?;
      let days = days_until_expiry(expiry, now);
      let bucket = AlertBucket::classify(days, policy)?;
      Some(LicenseAlert {
        vehicle_id: vehicle.id,
        plate_number: vehicle.plate_number.clone(),
        license_number: vehicle.license_number.clone(),
        expiry_date: expiry,
        days_until_expiry: days,
        bucket,
      })
    })
    .collect();

  alerts.sort_by_key(|a| a.days_until_expiry);
  alerts
}
