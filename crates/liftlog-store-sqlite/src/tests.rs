//! Integration tests for `SqliteBackend` against an in-memory database.

use bytes::Bytes;
use chrono::NaiveDate;
use liftlog_core::{
  backend::{AuthService, BlobStore, PROFILE_BUCKET, RecordBackend, profile_image_key},
  identity::UserIdentity,
  lift::{Lift, LiftRecordSet},
  profile::{NewProfile, ProfilePatch, Role},
  weight::NewWeightSample,
};
use uuid::Uuid;

use crate::{Error, SqliteBackend};

async fn backend() -> SqliteBackend {
  SqliteBackend::open_in_memory()
    .await
    .expect("in-memory backend")
}

/// Register `email`, leaving it signed in, and create its profile.
async fn player(b: &SqliteBackend, email: &str) -> UserIdentity {
  let user = b.sign_up(email.into(), "pw".into()).await.unwrap();
  b.insert_profile(NewProfile {
    user_id: user.user_id,
    email:   email.into(),
    region:  "KR".into(),
    team:    "Seoul WL".into(),
    name:    String::new(),
  })
  .await
  .unwrap();
  user
}

fn date(s: &str) -> NaiveDate { NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap() }

fn sample(user_id: Uuid, d: &str, weight: f64) -> NewWeightSample {
  NewWeightSample { user_id, date: date(d), weight }
}

// ─── Auth ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn sign_up_starts_a_session() {
  let b = backend().await;
  assert!(b.get_session().await.unwrap().is_none());

  let user = b.sign_up("Alice@Example.com".into(), "pw".into()).await.unwrap();
  assert_eq!(user.email, "alice@example.com");

  let session = b.get_session().await.unwrap().unwrap();
  assert_eq!(session.user, user);
}

#[tokio::test]
async fn duplicate_sign_up_is_rejected() {
  let b = backend().await;
  b.sign_up("a@x.io".into(), "pw".into()).await.unwrap();
  let err = b.sign_up("A@x.io".into(), "other".into()).await.unwrap_err();
  assert!(matches!(err, Error::EmailTaken(_)));
}

#[tokio::test]
async fn sign_in_checks_password() {
  let b = backend().await;
  let user = b.sign_up("a@x.io".into(), "pw".into()).await.unwrap();
  b.sign_out().await.unwrap();

  let err = b.sign_in("a@x.io".into(), "nope".into()).await.unwrap_err();
  assert!(matches!(err, Error::InvalidCredentials));
  assert!(b.get_session().await.unwrap().is_none());

  let session = b.sign_in("a@x.io".into(), "pw".into()).await.unwrap();
  assert_eq!(session.user_id(), user.user_id);
}

#[tokio::test]
async fn subscribers_observe_transitions() {
  let b = backend().await;
  let mut rx = b.subscribe();

  b.sign_up("a@x.io".into(), "pw".into()).await.unwrap();
  rx.changed().await.unwrap();
  assert!(rx.borrow_and_update().is_some());

  b.sign_out().await.unwrap();
  rx.changed().await.unwrap();
  assert!(rx.borrow_and_update().is_none());
}

// ─── Weights ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn weights_list_in_date_order_regardless_of_insertion() {
  let b = backend().await;
  let user = player(&b, "a@x.io").await;

  for (d, w) in [("2024-03-01", 81.0), ("2024-01-10", 82.5), ("2024-02-05", 80.2)] {
    b.insert_weight(sample(user.user_id, d, w)).await.unwrap();
  }

  let dates: Vec<String> = b
    .list_weights(user.user_id)
    .await
    .unwrap()
    .iter()
    .map(|s| s.date.to_string())
    .collect();
  assert_eq!(dates, ["2024-01-10", "2024-02-05", "2024-03-01"]);
}

#[tokio::test]
async fn same_day_samples_keep_insertion_order() {
  let b = backend().await;
  let user = player(&b, "a@x.io").await;
  let first = b.insert_weight(sample(user.user_id, "2024-01-10", 82.0)).await.unwrap();
  let second = b.insert_weight(sample(user.user_id, "2024-01-10", 81.5)).await.unwrap();

  let ids: Vec<i64> = b
    .list_weights(user.user_id)
    .await
    .unwrap()
    .iter()
    .map(|s| s.id)
    .collect();
  assert_eq!(ids, [first.id, second.id]);
}

#[tokio::test]
async fn deleted_sample_never_reappears() {
  let b = backend().await;
  let user = player(&b, "a@x.io").await;
  let keep = b.insert_weight(sample(user.user_id, "2024-01-01", 80.0)).await.unwrap();
  let gone = b.insert_weight(sample(user.user_id, "2024-01-02", 81.0)).await.unwrap();

  b.delete_weight(gone.id).await.unwrap();

  let listed = b.list_weights(user.user_id).await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].id, keep.id);
  assert!(matches!(
    b.delete_weight(gone.id).await,
    Err(Error::WeightNotFound(_))
  ));
}

#[tokio::test]
async fn other_users_rows_are_out_of_reach() {
  let b = backend().await;
  let alice = player(&b, "alice@x.io").await;
  let sample_id = b
    .insert_weight(sample(alice.user_id, "2024-01-01", 60.0))
    .await
    .unwrap()
    .id;

  player(&b, "bob@x.io").await;
  assert!(matches!(b.list_weights(alice.user_id).await, Err(Error::Forbidden(_))));
  assert!(matches!(b.delete_weight(sample_id).await, Err(Error::WeightNotFound(_))));
}

#[tokio::test]
async fn non_positive_weight_is_rejected() {
  let b = backend().await;
  let user = player(&b, "a@x.io").await;
  let err = b.insert_weight(sample(user.user_id, "2024-01-01", 0.0)).await.unwrap_err();
  assert!(matches!(err, Error::InvalidInput(_)));
}

// ─── Lifts ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn lifts_absent_until_saved() {
  let b = backend().await;
  let user = player(&b, "a@x.io").await;
  assert!(b.get_lifts(user.user_id).await.unwrap().is_none());
}

#[tokio::test]
async fn second_upsert_overwrites_the_single_row() {
  let b = backend().await;
  let user = player(&b, "a@x.io").await;

  let mut first = LiftRecordSet::zeroed(user.user_id);
  first.set(Lift::Snatch, 90.0);
  first.set(Lift::Deadlift, 200.0);
  b.upsert_lifts(first).await.unwrap();

  let mut second = LiftRecordSet::zeroed(user.user_id);
  second.set(Lift::Snatch, 100.0);
  b.upsert_lifts(second.clone()).await.unwrap();

  let stored = b.get_lifts(user.user_id).await.unwrap().unwrap();
  assert_eq!(stored, second);
  assert_eq!(stored.deadlift, 0.0);

  let rows: i64 = b
    .conn
    .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM lifts", [], |r| r.get(0))?))
    .await
    .unwrap();
  assert_eq!(rows, 1);
}

// ─── Profiles & roles ────────────────────────────────────────────────────────

#[tokio::test]
async fn new_profiles_are_players() {
  let b = backend().await;
  let user = player(&b, "a@x.io").await;
  let profile = b.get_profile(user.user_id).await.unwrap().unwrap();
  assert_eq!(profile.role, Role::Player);
  assert!(!profile.pending_admin);
}

#[tokio::test]
async fn players_cannot_change_their_own_role() {
  let b = backend().await;
  let user = player(&b, "a@x.io").await;
  let err = b
    .update_profile(user.user_id, ProfilePatch::approve_admin())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Forbidden(_)));
}

#[tokio::test]
async fn superadmin_approves_pending_request() {
  let b = backend().await;
  let requester = player(&b, "req@x.io").await;
  b.update_profile(requester.user_id, ProfilePatch::request_admin())
    .await
    .unwrap();

  player(&b, "boss@x.io").await;
  b.grant_superadmin("boss@x.io").await.unwrap();

  let pending = b.list_pending_admins().await.unwrap();
  assert_eq!(pending.len(), 1);
  assert_eq!(pending[0].user_id, requester.user_id);

  let updated = b
    .update_profile(requester.user_id, ProfilePatch::approve_admin())
    .await
    .unwrap();
  assert_eq!(updated.role, Role::Admin);
  assert!(!updated.pending_admin);
  assert!(b.list_pending_admins().await.unwrap().is_empty());
}

#[tokio::test]
async fn promotion_requires_an_open_request() {
  let b = backend().await;
  let bystander = player(&b, "quiet@x.io").await;
  player(&b, "boss@x.io").await;
  b.grant_superadmin("boss@x.io").await.unwrap();

  let err = b
    .update_profile(bystander.user_id, ProfilePatch::approve_admin())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Forbidden(_)));
  let profile = b.get_profile(bystander.user_id).await.unwrap().unwrap();
  assert_eq!(profile.role, Role::Player);
}

#[tokio::test]
async fn superadmin_cannot_be_demoted_through_a_request() {
  let b = backend().await;
  let boss = player(&b, "boss@x.io").await;
  b.grant_superadmin("boss@x.io").await.unwrap();

  let err = b
    .update_profile(boss.user_id, ProfilePatch::request_admin())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Forbidden(_)));

  // Even a stray pending flag cannot turn a superadmin into an admin.
  let err = b
    .update_profile(boss.user_id, ProfilePatch::approve_admin())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Forbidden(_)));

  let profile = b.get_profile(boss.user_id).await.unwrap().unwrap();
  assert_eq!(profile.role, Role::SuperAdmin);
  assert!(!profile.pending_admin);
}

#[tokio::test]
async fn grant_superadmin_requires_a_known_email() {
  let b = backend().await;
  assert!(matches!(
    b.grant_superadmin("ghost@x.io").await,
    Err(Error::UnknownEmail(_))
  ));
}

// ─── Blobs ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upload_overwrite_changes_url_and_remove_clears_it() {
  let b = backend().await;
  let user = player(&b, "a@x.io").await;
  let key = profile_image_key(user.user_id);
  let bucket = PROFILE_BUCKET.to_string();

  assert!(b.public_url(bucket.clone(), key.clone()).await.unwrap().is_none());

  b.upload(bucket.clone(), key.clone(), Bytes::from_static(b"one"), true)
    .await
    .unwrap();
  let first = b.public_url(bucket.clone(), key.clone()).await.unwrap().unwrap();
  assert!(first.starts_with("memory://storage/profiles/"));

  b.upload(bucket.clone(), key.clone(), Bytes::from_static(b"two"), true)
    .await
    .unwrap();
  let second = b.public_url(bucket.clone(), key.clone()).await.unwrap().unwrap();
  assert_ne!(first, second);

  b.remove(bucket.clone(), vec![key.clone()]).await.unwrap();
  assert!(b.public_url(bucket, key).await.unwrap().is_none());
}

#[tokio::test]
async fn upload_without_overwrite_refuses_existing_key() {
  let b = backend().await;
  let user = player(&b, "a@x.io").await;
  let key = profile_image_key(user.user_id);
  b.upload(PROFILE_BUCKET.into(), key.clone(), Bytes::from_static(b"a"), false)
    .await
    .unwrap();
  let err = b
    .upload(PROFILE_BUCKET.into(), key, Bytes::from_static(b"b"), false)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::BlobExists { .. }));
}
