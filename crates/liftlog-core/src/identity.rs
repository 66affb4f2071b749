//! Identity and session types supplied by the auth service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An authenticated user as known to the auth service. Immutable for the
/// lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
  pub user_id: Uuid,
  pub email:   String,
}

/// The live authenticated context for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  /// Opaque token; two sign-ins by the same user yield distinct sessions.
  pub session_id: Uuid,
  pub user:       UserIdentity,
  pub issued_at:  DateTime<Utc>,
}

impl Session {
  pub fn user_id(&self) -> Uuid { self.user.user_id }
}
