//! Role Gate: maps a user to exactly one visible panel.

use std::sync::Arc;

use liftlog_core::{
  backend::RecordBackend,
  profile::{PlayerProfile, Role},
};
use uuid::Uuid;

use crate::{ClientError, Result};

/// A top-level region of the dashboard, shown exclusively based on role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
  Player,
  TeamAdmin,
  SuperAdmin,
}

impl Panel {
  pub fn title(self) -> &'static str {
    match self {
      Self::Player => "Player",
      Self::TeamAdmin => "Team admin",
      Self::SuperAdmin => "Super admin",
    }
  }
}

/// Panel visibility. Holding a single `Option` makes "more than one panel
/// visible" unrepresentable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelSet {
  visible: Option<Panel>,
}

impl PanelSet {
  /// Show `panel` and hide every other.
  pub fn reveal(&mut self, panel: Panel) { self.visible = Some(panel); }

  pub fn hide_all(&mut self) { self.visible = None; }

  pub fn visible(&self) -> Option<Panel> { self.visible }

  pub fn is_visible(&self, panel: Panel) -> bool { self.visible == Some(panel) }
}

/// Looks up the caller's profile and decides which panel they get.
pub struct RoleGate<R> {
  records: Arc<R>,
}

impl<R: RecordBackend> RoleGate<R> {
  pub fn new(records: Arc<R>) -> Self { Self { records } }

  /// Look up the single profile row for `user_id`.
  ///
  /// `Ok(None)` means the identity exists but has no profile yet; that is
  /// logged as a warning and is not an error.
  pub async fn resolve_role(&self, user_id: Uuid) -> Result<Option<PlayerProfile>> {
    match self.records.get_profile(user_id).await {
      Ok(Some(profile)) => Ok(Some(profile)),
      Ok(None) => {
        tracing::warn!(%user_id, "no profile row; user is not provisioned yet");
        Ok(None)
      }
      Err(e) => {
        tracing::error!(%user_id, error = %e, "role lookup failed");
        Err(ClientError::fetch(e))
      }
    }
  }
}

/// The panel shown for `role`. Unrecognised roles get the player panel.
pub fn panel_for(role: &Role) -> Panel {
  match role {
    Role::SuperAdmin => Panel::SuperAdmin,
    Role::Admin => Panel::TeamAdmin,
    Role::Player => Panel::Player,
    Role::Other(value) => {
      tracing::warn!(role = %value, "unrecognised role; showing player panel");
      Panel::Player
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn each_role_maps_to_one_panel() {
    assert_eq!(panel_for(&Role::SuperAdmin), Panel::SuperAdmin);
    assert_eq!(panel_for(&Role::Admin), Panel::TeamAdmin);
    assert_eq!(panel_for(&Role::Player), Panel::Player);
    assert_eq!(panel_for(&Role::Other("coach".into())), Panel::Player);
  }

  #[test]
  fn revealing_a_panel_hides_the_previous_one() {
    let mut panels = PanelSet::default();
    assert_eq!(panels.visible(), None);
    panels.reveal(Panel::TeamAdmin);
    panels.reveal(Panel::Player);
    assert!(panels.is_visible(Panel::Player));
    assert!(!panels.is_visible(Panel::TeamAdmin));
    panels.hide_all();
    assert_eq!(panels.visible(), None);
  }
}
