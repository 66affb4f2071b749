//! Record Store Client: reads and writes of weight samples, lift records,
//! profiles and the profile image, with the client's validation and error
//! policy applied on top of the raw backend.

use std::{collections::HashMap, sync::Arc};

use bytes::Bytes;
use chrono::NaiveDate;
use liftlog_core::{
  backend::{BlobStore, PROFILE_BUCKET, RecordBackend, profile_image_key},
  lift::{Lift, LiftRecordSet},
  profile::{NewProfile, PlayerProfile, ProfilePatch},
  weight::{NewWeightSample, WeightSample, parse_date},
};
use uuid::Uuid;

use crate::{ClientError, Result};

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// The user's answer to a destructive-action prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
  Granted,
  Declined,
}

/// Whether a confirmed action went ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  Done,
  Cancelled,
}

/// Validate raw weight-form input.
///
/// The date must be a `YYYY-MM-DD` calendar date and the weight a positive,
/// finite number.
pub fn parse_weight_input(date: &str, weight: &str) -> Result<(NaiveDate, f64)> {
  if date.trim().is_empty() || weight.trim().is_empty() {
    return Err(ClientError::validation("Enter a date and a weight."));
  }
  let date = parse_date(date).map_err(|e| ClientError::validation(e.to_string()))?;
  let weight: f64 = weight
    .trim()
    .parse()
    .map_err(|_| ClientError::validation(format!("{weight:?} is not a number.")))?;
  if !weight.is_finite() || weight <= 0.0 {
    return Err(ClientError::validation("Weight must be a positive number."));
  }
  Ok((date, weight))
}

/// Raw text of the six lift fields. Absent fields are simply not set.
#[derive(Debug, Clone, Default)]
pub struct LiftInputs {
  values: HashMap<Lift, String>,
}

impl LiftInputs {
  pub fn new() -> Self { Self::default() }

  pub fn with(mut self, lift: Lift, raw: impl Into<String>) -> Self {
    self.set(lift, raw);
    self
  }

  pub fn set(&mut self, lift: Lift, raw: impl Into<String>) {
    self.values.insert(lift, raw.into());
  }

  pub fn get(&self, lift: Lift) -> &str {
    self.values.get(&lift).map(String::as_str).unwrap_or_default()
  }

  /// Build the whole record set, coercing every absent, blank, non-numeric,
  /// negative or non-finite input to zero.
  pub fn to_records(&self, user_id: Uuid) -> LiftRecordSet {
    let mut records = LiftRecordSet::zeroed(user_id);
    for lift in Lift::all() {
      records.set(lift, coerce_lift(self.get(lift)));
    }
    records
  }
}

fn coerce_lift(raw: &str) -> f64 {
  match raw.trim().parse::<f64>() {
    Ok(v) if v.is_finite() && v > 0.0 => v,
    _ => 0.0,
  }
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Record operations with a uniform [`ClientError`] result.
pub struct RecordClient<B> {
  backend: Arc<B>,
}

impl<B: RecordBackend + BlobStore> RecordClient<B> {
  pub fn new(backend: Arc<B>) -> Self { Self { backend } }

  // ── Weight samples ────────────────────────────────────────────────────────

  /// All samples for `user_id`, ascending by date. On failure nothing is
  /// returned, so callers cannot render a partial list.
  pub async fn list_weight_samples(&self, user_id: Uuid) -> Result<Vec<WeightSample>> {
    self
      .backend
      .list_weights(user_id)
      .await
      .map_err(ClientError::fetch)
  }

  pub async fn insert_weight_sample(
    &self,
    user_id: Uuid,
    date: &str,
    weight: &str,
  ) -> Result<WeightSample> {
    let (date, weight) = parse_weight_input(date, weight)?;
    let sample = self
      .backend
      .insert_weight(NewWeightSample { user_id, date, weight })
      .await
      .map_err(ClientError::fetch)?;
    tracing::info!(%user_id, id = sample.id, %date, weight, "weight sample saved");
    Ok(sample)
  }

  pub async fn delete_weight_sample(
    &self,
    id: i64,
    confirmation: Confirmation,
  ) -> Result<Outcome> {
    if confirmation == Confirmation::Declined {
      return Ok(Outcome::Cancelled);
    }
    self.backend.delete_weight(id).await.map_err(ClientError::fetch)?;
    tracing::info!(id, "weight sample deleted");
    Ok(Outcome::Done)
  }

  // ── Lift records ──────────────────────────────────────────────────────────

  /// Replace the user's whole record set. Never fails validation.
  pub async fn upsert_lift_records(
    &self,
    user_id: Uuid,
    inputs: &LiftInputs,
  ) -> Result<LiftRecordSet> {
    let records = inputs.to_records(user_id);
    self
      .backend
      .upsert_lifts(records.clone())
      .await
      .map_err(ClientError::fetch)?;
    tracing::info!(%user_id, "lift records saved");
    Ok(records)
  }

  /// `Ok(None)` when the user has not saved any records yet.
  pub async fn get_lift_records(&self, user_id: Uuid) -> Result<Option<LiftRecordSet>> {
    self.backend.get_lifts(user_id).await.map_err(ClientError::fetch)
  }

  // ── Profile image ─────────────────────────────────────────────────────────

  /// Store the user's image, replacing any previous one.
  pub async fn upload_profile_image(&self, user_id: Uuid, bytes: Bytes) -> Result<()> {
    if bytes.is_empty() {
      return Err(ClientError::validation("Choose an image file first."));
    }
    let size = bytes.len();
    self
      .backend
      .upload(PROFILE_BUCKET.into(), profile_image_key(user_id), bytes, true)
      .await
      .map_err(|e| ClientError::Upload(e.to_string()))?;
    tracing::info!(%user_id, size, "profile image uploaded");
    Ok(())
  }

  pub async fn get_profile_image_url(&self, user_id: Uuid) -> Result<Option<String>> {
    self
      .backend
      .public_url(PROFILE_BUCKET.into(), profile_image_key(user_id))
      .await
      .map_err(ClientError::fetch)
  }

  /// Best-effort removal: a failure is logged and otherwise ignored.
  pub async fn delete_profile_image(
    &self,
    user_id: Uuid,
    confirmation: Confirmation,
  ) -> Outcome {
    if confirmation == Confirmation::Declined {
      return Outcome::Cancelled;
    }
    let result = self
      .backend
      .remove(PROFILE_BUCKET.into(), vec![profile_image_key(user_id)])
      .await;
    if let Err(e) = result {
      tracing::warn!(%user_id, error = %e, "profile image removal failed");
    }
    Outcome::Done
  }

  // ── Profiles ──────────────────────────────────────────────────────────────

  pub async fn create_profile(&self, input: NewProfile) -> Result<PlayerProfile> {
    self.backend.insert_profile(input).await.map_err(ClientError::fetch)
  }

  /// Open an elevation request on the caller's own profile.
  pub async fn request_admin(&self, user_id: Uuid) -> Result<PlayerProfile> {
    self
      .backend
      .update_profile(user_id, ProfilePatch::request_admin())
      .await
      .map_err(ClientError::fetch)
  }

  pub async fn list_pending_admins(&self) -> Result<Vec<PlayerProfile>> {
    self.backend.list_pending_admins().await.map_err(ClientError::fetch)
  }

  /// Promote `user_id` to admin and close their request.
  ///
  /// Only superadmins reach this through the UI, but the backing store's
  /// access policy is what actually enforces it.
  pub async fn approve_admin(&self, user_id: Uuid) -> Result<PlayerProfile> {
    let profile = self
      .backend
      .update_profile(user_id, ProfilePatch::approve_admin())
      .await
      .map_err(ClientError::fetch)?;
    tracing::info!(%user_id, "admin request approved");
    Ok(profile)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn weight_input_is_validated() {
    let (date, weight) = parse_weight_input("2024-01-10", " 82.5 ").unwrap();
    assert_eq!(date.to_string(), "2024-01-10");
    assert_eq!(weight, 82.5);

    for (d, w) in [
      ("", "80"),
      ("2024-01-10", ""),
      ("2024-13-40", "80"),
      ("2024-01-10", "heavy"),
      ("2024-01-10", "0"),
      ("2024-01-10", "-3"),
      ("2024-01-10", "NaN"),
    ] {
      assert!(
        matches!(parse_weight_input(d, w), Err(ClientError::Validation(_))),
        "{d:?}/{w:?} should be rejected"
      );
    }
  }

  #[test]
  fn missing_lifts_become_zero() {
    let records = LiftInputs::new()
      .with(Lift::Snatch, "100")
      .with(Lift::Deadlift, "lots")
      .with(Lift::BenchPress, "-20")
      .to_records(Uuid::nil());

    assert_eq!(records.snatch, 100.0);
    assert_eq!(records.clean_jerk, 0.0);
    assert_eq!(records.back_squat, 0.0);
    assert_eq!(records.front_squat, 0.0);
    assert_eq!(records.deadlift, 0.0);
    assert_eq!(records.bench_press, 0.0);
  }
}
