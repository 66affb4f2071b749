//! Body-weight samples.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Format used for dates in storage and in user input.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single body-weight measurement. Belongs to exactly one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightSample {
  /// Store-assigned, monotonically increasing.
  pub id:      i64,
  pub user_id: Uuid,
  pub date:    NaiveDate,
  /// Kilograms; always positive.
  pub weight:  f64,
}

/// Input to [`crate::backend::RecordBackend::insert_weight`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewWeightSample {
  pub user_id: Uuid,
  pub date:    NaiveDate,
  pub weight:  f64,
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
    .map_err(|_| Error::InvalidDate(s.to_owned()))
}

pub fn format_date(date: NaiveDate) -> String {
  date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_iso_dates_with_surrounding_whitespace() {
    let d = parse_date(" 2024-01-10 ").unwrap();
    assert_eq!(format_date(d), "2024-01-10");
  }

  #[test]
  fn rejects_other_formats() {
    assert!(matches!(parse_date("10/01/2024"), Err(Error::InvalidDate(_))));
    assert!(matches!(parse_date(""), Err(Error::InvalidDate(_))));
  }
}
