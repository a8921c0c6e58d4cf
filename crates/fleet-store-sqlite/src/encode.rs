//! Conversions between domain values and the text stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings in UTC.

use chrono::{DateTime, Utc};

use crate::{Error, Result};

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn dt_survives_encoding() {
    let at = Utc.with_ymd_and_hms(2025, 6, 10, 9, 30, 15).unwrap();
    assert_eq!(encode_dt(at), "2025-06-10T09:30:15+00:00");
    assert_eq!(decode_dt(&encode_dt(at)).unwrap(), at);
  }

  #[test]
  fn offsets_normalise_to_utc() {
    let at = decode_dt("2025-06-10T10:30:15+01:00").unwrap();
    assert_eq!(at, Utc.with_ymd_and_hms(2025, 6, 10, 9, 30, 15).unwrap());
  }

  #[test]
  fn garbage_is_a_parse_error() {
    assert!(matches!(decode_dt("last tuesday"), Err(Error::DateParse(_))));
  }
}
