//! Presentation state read by the UI.

use liftlog_core::{
  identity::Session,
  lift::LiftRecordSet,
  profile::PlayerProfile,
};

use crate::{
  accordion::Accordion,
  charts::{ChartPresenter, ChartSurface},
  role_gate::PanelSet,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
  Info,
  Error,
}

/// A one-line user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
  pub level: NoticeLevel,
  pub text:  String,
}

impl Notice {
  pub fn info(text: impl Into<String>) -> Self {
    Self { level: NoticeLevel::Info, text: text.into() }
  }

  pub fn error(text: impl Into<String>) -> Self {
    Self { level: NoticeLevel::Error, text: text.into() }
  }
}

/// Everything the UI shows. Only the orchestrator mutates it.
pub struct Dashboard<S: ChartSurface> {
  /// `None` means the sign-in screen is shown.
  pub session:        Option<Session>,
  pub profile:        Option<PlayerProfile>,
  pub panels:         PanelSet,
  pub weights:        Accordion,
  pub charts:         ChartPresenter<S>,
  pub lifts:          Option<LiftRecordSet>,
  pub profile_image:  Option<String>,
  /// Only populated for superadmins.
  pub pending_admins: Vec<PlayerProfile>,
  pub notice:         Option<Notice>,
}

impl<S: ChartSurface> Dashboard<S> {
  pub fn new(surface: S) -> Self {
    Self {
      session:        None,
      profile:        None,
      panels:         PanelSet::default(),
      weights:        Accordion::new(),
      charts:         ChartPresenter::new(surface),
      lifts:          None,
      profile_image:  None,
      pending_admins: Vec::new(),
      notice:         None,
    }
  }

  pub fn is_signed_in(&self) -> bool { self.session.is_some() }

  /// Drop all per-user state and dispose both charts. The notice survives.
  pub fn reset(&mut self) {
    self.session = None;
    self.profile = None;
    self.panels.hide_all();
    self.weights.clear();
    self.charts.clear();
    self.lifts = None;
    self.profile_image = None;
    self.pending_admins.clear();
  }
}
