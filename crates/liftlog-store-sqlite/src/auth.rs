//! [`AuthService`] for [`SqliteBackend`]: argon2-hashed passwords and a
//! `watch` channel broadcasting the current session.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use chrono::Utc;
use rand_core::OsRng;
use rusqlite::OptionalExtension as _;
use tokio::sync::watch;
use uuid::Uuid;

use liftlog_core::{
  backend::AuthService,
  identity::{Session, UserIdentity},
};

use crate::{
  Error, Result,
  encode::{decode_uuid, encode_dt, encode_uuid, normalize_email},
  store::SqliteBackend,
};

/// Produce an argon2 PHC string for `password`.
fn hash_password(password: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| Error::PasswordHash(e.to_string()))?
      .to_string(),
  )
}

/// Check `password` against a stored PHC string.
fn verify_password(password: &str, phc: &str) -> Result<()> {
  let parsed = PasswordHash::new(phc).map_err(|_| Error::InvalidCredentials)?;
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .map_err(|_| Error::InvalidCredentials)
}

impl SqliteBackend {
  /// Make a fresh session for `user` current and broadcast it.
  fn start_session(&self, user: UserIdentity) -> Session {
    let session = Session {
      session_id: Uuid::new_v4(),
      user,
      issued_at: Utc::now(),
    };
    self.session.send_replace(Some(session.clone()));
    tracing::info!(user_id = %session.user_id(), "session started");
    session
  }
}

impl AuthService for SqliteBackend {
  type Error = Error;

  async fn get_session(&self) -> Result<Option<Session>> {
    Ok(self.current_session())
  }

  fn subscribe(&self) -> watch::Receiver<Option<Session>> {
    self.session.subscribe()
  }

  async fn sign_in(&self, email: String, password: String) -> Result<Session> {
    let email = normalize_email(&email);
    let email_for_query = email.clone();

    let row: Option<(String, String)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, password_hash FROM users WHERE email = ?1",
              rusqlite::params![email_for_query],
              |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?,
        )
      })
      .await?;

    let (user_id, phc) = row.ok_or(Error::InvalidCredentials)?;
    tokio::task::spawn_blocking(move || verify_password(&password, &phc))
      .await??;

    let user = UserIdentity { user_id: decode_uuid(&user_id)?, email };
    Ok(self.start_session(user))
  }

  async fn sign_up(&self, email: String, password: String) -> Result<UserIdentity> {
    let email = normalize_email(&email);
    if email.is_empty() || !email.contains('@') {
      return Err(Error::InvalidInput(format!("not an email address: {email:?}")));
    }
    if password.is_empty() {
      return Err(Error::InvalidInput("password must not be empty".into()));
    }

    let phc = tokio::task::spawn_blocking(move || hash_password(&password))
      .await??;

    let user = UserIdentity { user_id: Uuid::new_v4(), email: email.clone() };
    let id_str = encode_uuid(user.user_id);
    let at_str = encode_dt(Utc::now());
    let email_for_insert = email.clone();

    let inserted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT INTO users (user_id, email, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT(email) DO NOTHING",
          rusqlite::params![id_str, email_for_insert, phc, at_str],
        )?)
      })
      .await?;

    if inserted == 0 {
      return Err(Error::EmailTaken(email));
    }

    self.start_session(user.clone());
    Ok(user)
  }

  async fn sign_out(&self) -> Result<()> {
    let previous = self.session.send_replace(None);
    if let Some(session) = previous {
      tracing::info!(user_id = %session.user_id(), "session ended");
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_then_verify() {
    let phc = hash_password("secret").unwrap();
    assert!(phc.starts_with("$argon2"));
    assert!(verify_password("secret", &phc).is_ok());
    assert!(matches!(
      verify_password("wrong", &phc),
      Err(Error::InvalidCredentials)
    ));
  }

  #[test]
  fn garbage_hash_is_invalid_credentials() {
    assert!(matches!(
      verify_password("secret", "not-a-phc-string"),
      Err(Error::InvalidCredentials)
    ));
  }
}
