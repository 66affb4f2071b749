//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, calendar dates are `YYYY-MM-DD`, UUIDs
//! are hyphenated lowercase strings and booleans are `0`/`1` integers.

use chrono::{DateTime, NaiveDate, Utc};
use liftlog_core::{
  lift::LiftRecordSet,
  profile::{PlayerProfile, Role},
  weight::{WeightSample, format_date, parse_date},
};
use uuid::Uuid;

use crate::Result;

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

// ─── NaiveDate ────────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { format_date(d) }

pub fn decode_date(s: &str) -> Result<NaiveDate> { Ok(parse_date(s)?) }

// ─── Email ────────────────────────────────────────────────────────────────────

/// Emails are matched case-insensitively; store them lowercased.
pub fn normalize_email(email: &str) -> String { email.trim().to_lowercase() }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `profiles` row.
pub struct RawProfile {
  pub user_id:       String,
  pub email:         String,
  pub region:        String,
  pub team:          String,
  pub name:          String,
  pub role:          String,
  pub pending_admin: bool,
}

/// Column list matching [`RawProfile::from_row`].
pub const PROFILE_COLUMNS: &str =
  "user_id, email, region, team, name, role, pending_admin";

impl RawProfile {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      email:         row.get(1)?,
      region:        row.get(2)?,
      team:          row.get(3)?,
      name:          row.get(4)?,
      role:          row.get(5)?,
      pending_admin: row.get(6)?,
    })
  }

  pub fn into_profile(self) -> Result<PlayerProfile> {
    Ok(PlayerProfile {
      user_id:       decode_uuid(&self.user_id)?,
      email:         self.email,
      region:        self.region,
      team:          self.team,
      name:          self.name,
      role:          Role::parse(&self.role),
      pending_admin: self.pending_admin,
    })
  }
}

/// Raw values read directly from a `weights` row.
pub struct RawWeight {
  pub id:      i64,
  pub user_id: String,
  pub date:    String,
  pub weight:  f64,
}

impl RawWeight {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:      row.get(0)?,
      user_id: row.get(1)?,
      date:    row.get(2)?,
      weight:  row.get(3)?,
    })
  }

  pub fn into_sample(self) -> Result<WeightSample> {
    Ok(WeightSample {
      id:      self.id,
      user_id: decode_uuid(&self.user_id)?,
      date:    decode_date(&self.date)?,
      weight:  self.weight,
    })
  }
}

/// Raw values read directly from a `lifts` row.
pub struct RawLifts {
  pub user_id: String,
  pub values:  [f64; 6],
}

impl RawLifts {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id: row.get(0)?,
      values:  [
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
      ],
    })
  }

  pub fn into_records(self) -> Result<LiftRecordSet> {
    let [snatch, clean_jerk, back_squat, front_squat, deadlift, bench_press] =
      self.values;
    Ok(LiftRecordSet {
      user_id: decode_uuid(&self.user_id)?,
      snatch,
      clean_jerk,
      back_squat,
      front_squat,
      deadlift,
      bench_press,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unknown_role_strings_survive_decoding() {
    let raw = RawProfile {
      user_id:       encode_uuid(Uuid::nil()),
      email:         "a@b.c".into(),
      region:        "KR".into(),
      team:          "Seoul".into(),
      name:          String::new(),
      role:          "owner".into(),
      pending_admin: false,
    };
    let profile = raw.into_profile().unwrap();
    assert_eq!(profile.role, Role::Other("owner".into()));
  }

  #[test]
  fn emails_are_normalized() {
    assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
  }
}
