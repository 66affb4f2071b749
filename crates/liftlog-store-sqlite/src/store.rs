//! [`SqliteBackend`]: the SQLite implementation of [`RecordBackend`].
//!
//! The auth and blob halves of the backing contract live in `auth.rs` and
//! `blob.rs`; this module owns the connection, the access policy and the
//! three record tables.

use std::{path::Path, sync::Arc};

use rusqlite::OptionalExtension as _;
use tokio::sync::watch;
use uuid::Uuid;

use liftlog_core::{
  backend::RecordBackend,
  identity::Session,
  lift::LiftRecordSet,
  profile::{NewProfile, PlayerProfile, ProfilePatch, Role},
  weight::{NewWeightSample, WeightSample},
};

use crate::{
  encode::{
    PROFILE_COLUMNS, RawLifts, RawProfile, RawWeight, decode_uuid, encode_date,
    encode_uuid, normalize_email,
  },
  schema::SCHEMA,
  Error, Result,
};

/// Base URL used for blob links when none is configured.
pub const DEFAULT_PUBLIC_BASE_URL: &str = "memory://storage";

// ─── Backend ─────────────────────────────────────────────────────────────────

/// A complete Liftlog backing service on a single SQLite file.
///
/// Cloning is cheap. The connection and the session channel are shared, so
/// every clone observes the same signed-in session.
#[derive(Clone)]
pub struct SqliteBackend {
  pub(crate) conn:            tokio_rusqlite::Connection,
  pub(crate) session:         Arc<watch::Sender<Option<Session>>>,
  pub(crate) public_base_url: Arc<str>,
}

impl SqliteBackend {
  /// Open (or create) a backend at `path` and run schema initialisation.
  pub async fn open(
    path: impl AsRef<Path>,
    public_base_url: impl Into<String>,
  ) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::with_connection(conn, public_base_url.into()).await
  }

  /// Open an in-memory backend for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::with_connection(conn, DEFAULT_PUBLIC_BASE_URL.to_owned()).await
  }

  async fn with_connection(
    conn: tokio_rusqlite::Connection,
    public_base_url: String,
  ) -> Result<Self> {
    let (tx, _rx) = watch::channel(None);
    let backend = Self {
      conn,
      session: Arc::new(tx),
      public_base_url: public_base_url.trim_end_matches('/').into(),
    };
    backend.init_schema().await?;
    Ok(backend)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Promote the account registered under `email` to superadmin.
  ///
  /// This is the out-of-band provisioning path; it bypasses the session
  /// policy and is only reachable from the command line.
  pub async fn grant_superadmin(&self, email: &str) -> Result<PlayerProfile> {
    let email = normalize_email(email);
    let email_for_query = email.clone();

    let user_id: Option<String> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let user_id: Option<String> = tx
          .query_row(
            "SELECT user_id FROM users WHERE email = ?1",
            rusqlite::params![email_for_query],
            |r| r.get(0),
          )
          .optional()?;
        if let Some(id) = &user_id {
          // Users registered before a profile existed get a bare one.
          tx.execute(
            "INSERT INTO profiles (user_id, email, region, team, role, pending_admin)
             VALUES (?1, ?2, '', '', 'superadmin', 0)
             ON CONFLICT(user_id) DO UPDATE
               SET role = 'superadmin', pending_admin = 0",
            rusqlite::params![id, email_for_query],
          )?;
        }
        tx.commit()?;
        Ok(user_id)
      })
      .await?;

    let user_id = user_id.ok_or_else(|| Error::UnknownEmail(email))?;
    let user_id = decode_uuid(&user_id)?;
    tracing::info!(%user_id, "granted superadmin");
    self
      .fetch_profile(user_id)
      .await?
      .ok_or(Error::ProfileNotFound(user_id))
  }

  // ── Access policy ─────────────────────────────────────────────────────────

  pub(crate) fn current_session(&self) -> Option<Session> {
    self.session.borrow().clone()
  }

  pub(crate) fn require_session(&self) -> Result<Session> {
    self.current_session().ok_or(Error::Unauthenticated)
  }

  /// The signed-in user must be `owner`.
  pub(crate) fn require_owner(&self, owner: Uuid) -> Result<Session> {
    let session = self.require_session()?;
    if session.user_id() != owner {
      return Err(Error::Forbidden(format!(
        "rows of user {owner} belong to another account"
      )));
    }
    Ok(session)
  }

  /// The signed-in user must hold the superadmin role.
  async fn require_superadmin(&self) -> Result<Session> {
    let session = self.require_session()?;
    let role = self
      .fetch_profile(session.user_id())
      .await?
      .map(|p| p.role)
      .unwrap_or_default();
    if !role.is_superadmin() {
      return Err(Error::Forbidden("superadmin role required".into()));
    }
    Ok(session)
  }

  // ── Unchecked reads ───────────────────────────────────────────────────────

  async fn fetch_profile(&self, user_id: Uuid) -> Result<Option<PlayerProfile>> {
    let id_str = encode_uuid(user_id);

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = ?1"),
              rusqlite::params![id_str],
              RawProfile::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }
}

// ─── RecordBackend impl ──────────────────────────────────────────────────────

impl RecordBackend for SqliteBackend {
  type Error = Error;

  // ── Profiles ──────────────────────────────────────────────────────────────

  async fn insert_profile(&self, input: NewProfile) -> Result<PlayerProfile> {
    self.require_owner(input.user_id)?;

    let profile = PlayerProfile {
      user_id:       input.user_id,
      email:         normalize_email(&input.email),
      region:        input.region.trim().to_owned(),
      team:          input.team.trim().to_owned(),
      name:          input.name.trim().to_owned(),
      role:          Role::Player,
      pending_admin: false,
    };

    let id_str = encode_uuid(profile.user_id);
    let email  = profile.email.clone();
    let region = profile.region.clone();
    let team   = profile.team.clone();
    let name   = profile.name.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO profiles (user_id, email, region, team, name, role, pending_admin)
           VALUES (?1, ?2, ?3, ?4, ?5, 'player', 0)",
          rusqlite::params![id_str, email, region, team, name],
        )?;
        Ok(())
      })
      .await?;

    Ok(profile)
  }

  async fn get_profile(&self, user_id: Uuid) -> Result<Option<PlayerProfile>> {
    self.require_session()?;
    self.fetch_profile(user_id).await
  }

  async fn update_profile(
    &self,
    user_id: Uuid,
    patch: ProfilePatch,
  ) -> Result<PlayerProfile> {
    if patch.is_empty() {
      return Err(Error::InvalidInput("empty profile patch".into()));
    }
    if patch.role.is_some() {
      // Role changes never originate from the profile owner.
      self.require_superadmin().await?;
    } else if self.require_owner(user_id).is_err() {
      self.require_superadmin().await?;
    }

    // Promotion only ever moves a player with an open request; only players
    // may open one.
    let guard = if patch.role.is_some() {
      " AND role = 'player' AND pending_admin = 1"
    } else if patch.pending_admin == Some(true) {
      " AND role = 'player'"
    } else {
      ""
    };

    let id_str  = encode_uuid(user_id);
    let role    = patch.role.as_ref().map(|r| r.as_str().to_owned());
    let pending = patch.pending_admin;

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          &format!(
            "UPDATE profiles
               SET role          = COALESCE(?2, role),
                   pending_admin = COALESCE(?3, pending_admin)
             WHERE user_id = ?1{guard}"
          ),
          rusqlite::params![id_str, role, pending],
        )?)
      })
      .await?;

    if changed == 0 {
      return match self.fetch_profile(user_id).await? {
        None => Err(Error::ProfileNotFound(user_id)),
        Some(_) if patch.role.is_some() => {
          Err(Error::Forbidden("only a player with a pending request can be promoted".into()))
        }
        Some(_) => Err(Error::Forbidden("only players can request admin access".into())),
      };
    }
    tracing::info!(%user_id, ?patch, "profile updated");
    self
      .fetch_profile(user_id)
      .await?
      .ok_or(Error::ProfileNotFound(user_id))
  }

  async fn list_pending_admins(&self) -> Result<Vec<PlayerProfile>> {
    self.require_superadmin().await?;

    let raws: Vec<RawProfile> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PROFILE_COLUMNS} FROM profiles
           WHERE pending_admin = 1
           ORDER BY email ASC"
        ))?;
        let rows = stmt
          .query_map([], RawProfile::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProfile::into_profile).collect()
  }

  // ── Weight samples ────────────────────────────────────────────────────────

  async fn list_weights(&self, user_id: Uuid) -> Result<Vec<WeightSample>> {
    self.require_owner(user_id)?;
    let id_str = encode_uuid(user_id);

    let raws: Vec<RawWeight> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, user_id, date, weight FROM weights
           WHERE user_id = ?1
           ORDER BY date ASC, id ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], RawWeight::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawWeight::into_sample).collect()
  }

  async fn insert_weight(&self, input: NewWeightSample) -> Result<WeightSample> {
    self.require_owner(input.user_id)?;
    if !(input.weight.is_finite() && input.weight > 0.0) {
      return Err(Error::InvalidInput(format!(
        "weight must be positive, got {}",
        input.weight
      )));
    }

    let id_str   = encode_uuid(input.user_id);
    let date_str = encode_date(input.date);
    let weight   = input.weight;

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO weights (user_id, date, weight) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, date_str, weight],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(WeightSample {
      id,
      user_id: input.user_id,
      date: input.date,
      weight,
    })
  }

  async fn delete_weight(&self, id: i64) -> Result<()> {
    let session = self.require_session()?;
    let owner   = encode_uuid(session.user_id());

    // Scoped to the signed-in owner: another user's id behaves as missing.
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM weights WHERE id = ?1 AND user_id = ?2",
          rusqlite::params![id, owner],
        )?)
      })
      .await?;

    if deleted == 0 {
      return Err(Error::WeightNotFound(id));
    }
    Ok(())
  }

  // ── Lift records ──────────────────────────────────────────────────────────

  async fn upsert_lifts(&self, records: LiftRecordSet) -> Result<()> {
    self.require_owner(records.user_id)?;
    let id_str = encode_uuid(records.user_id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO lifts (
             user_id, snatch, clean_jerk, back_squat,
             front_squat, deadlift, bench_press
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
           ON CONFLICT(user_id) DO UPDATE SET
             snatch      = excluded.snatch,
             clean_jerk  = excluded.clean_jerk,
             back_squat  = excluded.back_squat,
             front_squat = excluded.front_squat,
             deadlift    = excluded.deadlift,
             bench_press = excluded.bench_press",
          rusqlite::params![
            id_str,
            records.snatch,
            records.clean_jerk,
            records.back_squat,
            records.front_squat,
            records.deadlift,
            records.bench_press,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_lifts(&self, user_id: Uuid) -> Result<Option<LiftRecordSet>> {
    self.require_owner(user_id)?;
    let id_str = encode_uuid(user_id);

    let raw: Option<RawLifts> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, snatch, clean_jerk, back_squat,
                      front_squat, deadlift, bench_press
               FROM lifts WHERE user_id = ?1",
              rusqlite::params![id_str],
              RawLifts::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawLifts::into_records).transpose()
  }
}
