//! The backing service contract.
//!
//! Three traits cover the collaborator the client layer talks to: an auth
//! service, a typed tabular store, and a blob store. They are implemented by
//! storage backends (e.g. `liftlog-store-sqlite`); `liftlog-client` depends
//! on this abstraction, not on any concrete backend.
//!
//! Access policy (who may change whose rows) is the backend's
//! responsibility. Callers never treat their own role checks as a security
//! boundary.

use std::future::Future;

use bytes::Bytes;
use tokio::sync::watch;
use uuid::Uuid;

use crate::{
  identity::{Session, UserIdentity},
  lift::LiftRecordSet,
  profile::{NewProfile, PlayerProfile, ProfilePatch},
  weight::{NewWeightSample, WeightSample},
};

/// Bucket holding profile images.
pub const PROFILE_BUCKET: &str = "profiles";

/// Blob key of a user's profile image; one image per user.
pub fn profile_image_key(user_id: Uuid) -> String { format!("{user_id}.jpg") }

// ─── Auth ────────────────────────────────────────────────────────────────────

/// Session and credential management.
pub trait AuthService: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Point-in-time check of the current session.
  fn get_session(
    &self,
  ) -> impl Future<Output = Result<Option<Session>, Self::Error>> + Send + '_;

  /// A receiver that observes every session transition. The current value is
  /// the present session (or `None` when signed out).
  fn subscribe(&self) -> watch::Receiver<Option<Session>>;

  /// Verify credentials and make the resulting session current.
  fn sign_in(
    &self,
    email: String,
    password: String,
  ) -> impl Future<Output = Result<Session, Self::Error>> + Send + '_;

  /// Register a new identity and make a session for it current.
  fn sign_up(
    &self,
    email: String,
    password: String,
  ) -> impl Future<Output = Result<UserIdentity, Self::Error>> + Send + '_;

  /// Clear the current session. Signing out while signed out is a no-op.
  fn sign_out(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Tabular store ───────────────────────────────────────────────────────────

/// Typed access to the `profiles`, `weights` and `lifts` tables.
pub trait RecordBackend: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Profiles ──────────────────────────────────────────────────────────

  /// Insert a profile with role `player` and no pending request.
  fn insert_profile(
    &self,
    input: NewProfile,
  ) -> impl Future<Output = Result<PlayerProfile, Self::Error>> + Send + '_;

  /// Retrieve the profile for `user_id`. Returns `None` if not provisioned.
  fn get_profile(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<PlayerProfile>, Self::Error>> + Send + '_;

  /// Apply `patch` to exactly one profile and return the updated row.
  fn update_profile(
    &self,
    user_id: Uuid,
    patch: ProfilePatch,
  ) -> impl Future<Output = Result<PlayerProfile, Self::Error>> + Send + '_;

  /// Profiles with an open elevation request, ordered by email.
  fn list_pending_admins(
    &self,
  ) -> impl Future<Output = Result<Vec<PlayerProfile>, Self::Error>> + Send + '_;

  // ── Weight samples ────────────────────────────────────────────────────

  /// All samples for `user_id`, ascending by date then id.
  fn list_weights(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<WeightSample>, Self::Error>> + Send + '_;

  /// Insert a sample and return it with its store-assigned id.
  fn insert_weight(
    &self,
    input: NewWeightSample,
  ) -> impl Future<Output = Result<WeightSample, Self::Error>> + Send + '_;

  fn delete_weight(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Lift records ──────────────────────────────────────────────────────

  /// Insert or overwrite the single record set keyed by `records.user_id`.
  fn upsert_lifts(
    &self,
    records: LiftRecordSet,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn get_lifts(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<LiftRecordSet>, Self::Error>> + Send + '_;
}

// ─── Blob store ──────────────────────────────────────────────────────────────

/// Binary object storage addressed by `(bucket, key)`.
pub trait BlobStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Store `bytes`. With `overwrite == false` an existing object is an error.
  fn upload(
    &self,
    bucket: String,
    key: String,
    bytes: Bytes,
    overwrite: bool,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// A URL for the object, or `None` if nothing is stored under `key`.
  fn public_url(
    &self,
    bucket: String,
    key: String,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + '_;

  /// Remove every listed key. Missing keys are ignored.
  fn remove(
    &self,
    bucket: String,
    keys: Vec<String>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

/// A complete backing service.
pub trait Backend: AuthService + RecordBackend + BlobStore {}

impl<T> Backend for T where T: AuthService + RecordBackend + BlobStore {}
