//! Age-based retention shared by the activity log and the notification
//! center.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionPolicy {
  /// Records older than this are dropped by the session-start prune.
  pub retention_days: i64,
  /// How many records `recent()` returns.
  pub recent_limit:   usize,
}

impl Default for RetentionPolicy {
  fn default() -> Self {
    Self {
      retention_days: 7,
      recent_limit:   50,
    }
  }
}

impl RetentionPolicy {
  /// `true` while a record stamped `at` is within the window. A record
  /// exactly `retention_days` old is still kept.
  pub fn retains(&self, at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - at <= Duration::days(self.retention_days)
  }
}
