//! Player profiles and the role hierarchy.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Role ────────────────────────────────────────────────────────────────────

/// The role stored on a profile row.
///
/// Stored values that are not one of the three known roles are preserved in
/// [`Role::Other`] rather than rejected, so the caller decides how to treat
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
  #[default]
  Player,
  Admin,
  SuperAdmin,
  Other(String),
}

impl Role {
  /// Parse a stored role string. Never fails.
  pub fn parse(s: &str) -> Self {
    match s {
      "player" => Self::Player,
      "admin" => Self::Admin,
      "superadmin" => Self::SuperAdmin,
      other => Self::Other(other.to_owned()),
    }
  }

  /// The string written to the `role` column.
  pub fn as_str(&self) -> &str {
    match self {
      Self::Player => "player",
      Self::Admin => "admin",
      Self::SuperAdmin => "superadmin",
      Self::Other(s) => s,
    }
  }

  pub fn is_superadmin(&self) -> bool { matches!(self, Self::SuperAdmin) }
}

impl From<String> for Role {
  fn from(s: String) -> Self { Self::parse(&s) }
}

impl From<Role> for String {
  fn from(role: Role) -> Self { role.as_str().to_owned() }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Profile ─────────────────────────────────────────────────────────────────

/// One row of the `profiles` table. Exactly one per user id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
  pub user_id:       Uuid,
  pub email:         String,
  pub region:        String,
  pub team:          String,
  pub name:          String,
  pub role:          Role,
  /// An open request to be elevated to admin.
  pub pending_admin: bool,
}

/// Input to [`crate::backend::RecordBackend::insert_profile`].
/// Role is always `player` and `pending_admin` always `false` at creation.
#[derive(Debug, Clone)]
pub struct NewProfile {
  pub user_id: Uuid,
  pub email:   String,
  pub region:  String,
  pub team:    String,
  pub name:    String,
}

/// A partial update to a profile row. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfilePatch {
  pub role:          Option<Role>,
  pub pending_admin: Option<bool>,
}

impl ProfilePatch {
  /// The patch applied when a superadmin approves an elevation request.
  pub fn approve_admin() -> Self {
    Self { role: Some(Role::Admin), pending_admin: Some(false) }
  }

  /// The patch a player applies to their own profile to ask for elevation.
  pub fn request_admin() -> Self {
    Self { role: None, pending_admin: Some(true) }
  }

  pub fn is_empty(&self) -> bool {
    self.role.is_none() && self.pending_admin.is_none()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn known_roles_round_trip_through_strings() {
    for role in [Role::Player, Role::Admin, Role::SuperAdmin] {
      assert_eq!(Role::parse(role.as_str()), role);
    }
  }

  #[test]
  fn unknown_role_is_preserved() {
    let role = Role::parse("coach");
    assert_eq!(role, Role::Other("coach".into()));
    assert_eq!(role.as_str(), "coach");
    assert!(!role.is_superadmin());
  }

  #[test]
  fn role_serializes_as_plain_string() {
    let json = serde_json::to_string(&Role::SuperAdmin).unwrap();
    assert_eq!(json, "\"superadmin\"");
  }
}
