//! Session Resolver: who is signed in, and when that changes.

use std::sync::Arc;

use liftlog_core::{
  backend::AuthService,
  identity::{Session, UserIdentity},
};
use tokio::sync::watch;

use crate::{ClientError, Result};

/// Fields collected by the sign-up form.
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
  pub email:    String,
  pub password: String,
  pub region:   String,
  pub team:     String,
  pub name:     String,
}

impl SignUpForm {
  fn validate(&self) -> Result<()> {
    validate_credentials(&self.email, &self.password)?;
    if self.region.trim().is_empty() || self.team.trim().is_empty() {
      return Err(ClientError::validation("Enter both a region and a team."));
    }
    Ok(())
  }
}

fn validate_credentials(email: &str, password: &str) -> Result<()> {
  if email.trim().is_empty() || password.is_empty() {
    return Err(ClientError::validation("Enter an email and a password."));
  }
  Ok(())
}

/// Thin wrapper over an [`AuthService`] with the client's failure policy:
/// a session that cannot be resolved is treated as absent.
pub struct SessionResolver<A> {
  auth: Arc<A>,
}

impl<A: AuthService> SessionResolver<A> {
  pub fn new(auth: Arc<A>) -> Self { Self { auth } }

  /// Point-in-time check. Failures are logged and reported as `None`.
  pub async fn current_session(&self) -> Option<Session> {
    match self.auth.get_session().await {
      Ok(session) => session,
      Err(e) => {
        tracing::warn!(error = %e, "session check failed; treating as signed out");
        None
      }
    }
  }

  /// Every subsequent session transition is observable on the receiver.
  pub fn subscribe(&self) -> watch::Receiver<Option<Session>> { self.auth.subscribe() }

  pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
    validate_credentials(email, password)?;
    self
      .auth
      .sign_in(email.trim().to_owned(), password.to_owned())
      .await
      .map_err(ClientError::auth)
  }

  pub async fn sign_up(&self, form: &SignUpForm) -> Result<UserIdentity> {
    form.validate()?;
    self
      .auth
      .sign_up(form.email.trim().to_owned(), form.password.clone())
      .await
      .map_err(ClientError::auth)
  }

  pub async fn sign_out(&self) -> Result<()> {
    self.auth.sign_out().await.map_err(ClientError::auth)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sign_up_requires_region_and_team() {
    let form = SignUpForm {
      email: "a@x.io".into(),
      password: "pw".into(),
      region: "KR".into(),
      team: "  ".into(),
      name: String::new(),
    };
    assert!(matches!(form.validate(), Err(ClientError::Validation(_))));
  }

  #[test]
  fn blank_credentials_are_rejected() {
    assert!(validate_credentials("", "pw").is_err());
    assert!(validate_credentials("a@x.io", "").is_err());
    assert!(validate_credentials("a@x.io", "pw").is_ok());
  }
}
