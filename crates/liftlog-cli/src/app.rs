//! Application state machine and event dispatcher.

use std::sync::Arc;

use bytes::Bytes;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use liftlog_client::{
  Orchestrator,
  accordion::RowHandle,
  charts::ChartRegistry,
  dashboard::{Dashboard, Notice},
  records::{Confirmation, LiftInputs},
  role_gate::Panel,
  session::SignUpForm,
};
use liftlog_core::{
  identity::Session,
  lift::{Lift, LiftRecordSet},
};
use liftlog_store_sqlite::SqliteBackend;
use tokio::sync::watch;

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  SignIn,
  Dashboard,
}

/// Which dashboard pane receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
  Weights,
  WeightForm,
  LiftForm,
  Image,
  Pending,
}

impl Focus {
  pub fn label(self) -> &'static str {
    match self {
      Self::Weights => "WEIGHTS",
      Self::WeightForm => "ADD WEIGHT",
      Self::LiftForm => "LIFTS",
      Self::Image => "IMAGE",
      Self::Pending => "REQUESTS",
    }
  }
}

/// A destructive action waiting for `y`/`n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirm {
  DeleteWeight(RowHandle),
  DeleteImage,
}

impl Confirm {
  pub fn prompt(self) -> &'static str {
    match self {
      Self::DeleteWeight(_) => "Delete this weight entry? [y/n]",
      Self::DeleteImage => "Delete your profile image? [y/n]",
    }
  }
}

// ─── Forms ────────────────────────────────────────────────────────────────────

pub const SIGN_IN_FIELDS: [&str; 5] = ["Email", "Password", "Region", "Team", "Name"];

#[derive(Debug, Default)]
pub struct SignInForm {
  pub values: [String; 5],
  pub field:  usize,
}

impl SignInForm {
  fn current(&mut self) -> &mut String { &mut self.values[self.field] }

  fn to_sign_up(&self) -> SignUpForm {
    let [email, password, region, team, name] = self.values.clone();
    SignUpForm { email, password, region, team, name }
  }
}

#[derive(Debug, Default)]
pub struct WeightForm {
  pub date:      String,
  pub weight:    String,
  /// `false` edits the date, `true` the weight.
  pub on_weight: bool,
}

#[derive(Debug, Default)]
pub struct LiftForm {
  pub inputs: LiftInputs,
  pub cursor: usize,
  /// The records the inputs were last filled from.
  source:     Option<LiftRecordSet>,
}

impl LiftForm {
  pub fn selected(&self) -> Lift { Lift::all().nth(self.cursor).unwrap_or(Lift::Snatch) }

  /// Pre-fill from the records on screen so a save doesn't zero them.
  /// Inputs being typed are left alone until the records change.
  fn fill_from(&mut self, view: &Dashboard<ChartRegistry>) {
    if self.source == view.lifts {
      return;
    }
    self.source = view.lifts.clone();
    self.inputs = LiftInputs::new();
    if let Some(records) = &self.source {
      for (lift, value) in records.values() {
        self.inputs.set(lift, value.to_string());
      }
    }
  }
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub screen:         Screen,
  pub focus:          Focus,
  pub sign_in:        SignInForm,
  pub weight_cursor:  usize,
  pub weight_form:    WeightForm,
  pub lift_form:      LiftForm,
  pub image_path:     String,
  pub pending_cursor: usize,
  pub confirm:        Option<Confirm>,

  orchestrator: Orchestrator<SqliteBackend, ChartRegistry>,
  sessions:     watch::Receiver<Option<Session>>,
}

impl App {
  pub fn new(backend: SqliteBackend, email: String) -> Self {
    let orchestrator = Orchestrator::new(Arc::new(backend), ChartRegistry::new());
    let sessions = orchestrator.subscribe();
    let mut sign_in = SignInForm::default();
    sign_in.values[0] = email;
    if !sign_in.values[0].is_empty() {
      sign_in.field = 1;
    }
    Self {
      screen: Screen::SignIn,
      focus: Focus::Weights,
      sign_in,
      weight_cursor: 0,
      weight_form: WeightForm::default(),
      lift_form: LiftForm::default(),
      image_path: String::new(),
      pending_cursor: 0,
      confirm: None,
      orchestrator,
      sessions,
    }
  }

  pub fn view(&self) -> &Dashboard<ChartRegistry> { self.orchestrator.view() }

  pub async fn start(&mut self) {
    self.orchestrator.start().await;
    self.sync_screen();
  }

  /// Feed any session transition from the backend into the orchestrator.
  pub async fn poll_session(&mut self) {
    if self.sessions.has_changed().unwrap_or(false) {
      let session = self.sessions.borrow_and_update().clone();
      self.orchestrator.on_session_change(session).await;
      self.sync_screen();
    }
  }

  fn sync_screen(&mut self) {
    let screen = if self.view().is_signed_in() { Screen::Dashboard } else { Screen::SignIn };
    if screen != self.screen {
      self.screen = screen;
      self.focus = Focus::Weights;
      self.weight_cursor = 0;
      self.pending_cursor = 0;
      self.confirm = None;
      self.sign_in.values[1].clear();
      self.lift_form.cursor = 0;
    }
    self.lift_form.fill_from(self.orchestrator.view());
    self.clamp_cursors();
  }

  fn clamp_cursors(&mut self) {
    let rows = self.view().weights.len();
    self.weight_cursor = self.weight_cursor.min(rows.saturating_sub(1));
    let pending = self.view().pending_admins.len();
    self.pending_cursor = self.pending_cursor.min(pending.saturating_sub(1));
  }

  fn is_superadmin(&self) -> bool { self.view().panels.is_visible(Panel::SuperAdmin) }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    if let Some(confirm) = self.confirm.take() {
      self.handle_confirm(confirm, key).await;
      return Ok(true);
    }

    self.orchestrator.clear_notice();
    let cont = match self.screen {
      Screen::SignIn => self.handle_sign_in_key(key).await,
      Screen::Dashboard => self.handle_dashboard_key(key).await,
    };
    self.sync_screen();
    Ok(cont)
  }

  async fn handle_confirm(&mut self, confirm: Confirm, key: KeyEvent) {
    let confirmation = match key.code {
      KeyCode::Char('y') | KeyCode::Char('Y') => Confirmation::Granted,
      _ => Confirmation::Declined,
    };
    // Failures are already on the status bar.
    let _ = match confirm {
      Confirm::DeleteWeight(row) => self.orchestrator.delete_weight(row, confirmation).await,
      Confirm::DeleteImage => self.orchestrator.delete_image(confirmation).await,
    };
    self.sync_screen();
  }

  async fn handle_sign_in_key(&mut self, key: KeyEvent) -> bool {
    let form = &mut self.sign_in;
    match key.code {
      KeyCode::Esc => return false,
      KeyCode::Tab | KeyCode::Down => form.field = (form.field + 1) % SIGN_IN_FIELDS.len(),
      KeyCode::BackTab | KeyCode::Up => {
        form.field = (form.field + SIGN_IN_FIELDS.len() - 1) % SIGN_IN_FIELDS.len();
      }
      KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        let form = form.to_sign_up();
        let _ = self.orchestrator.sign_up(&form).await;
      }
      KeyCode::Enter => {
        let (email, password) = (form.values[0].clone(), form.values[1].clone());
        let _ = self.orchestrator.sign_in(&email, &password).await;
      }
      KeyCode::Backspace => {
        form.current().pop();
      }
      KeyCode::Char(c) => form.current().push(c),
      _ => {}
    }
    true
  }

  async fn handle_dashboard_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Tab => {
        self.focus = self.next_focus();
        return true;
      }
      KeyCode::Esc if self.focus != Focus::Weights => {
        self.focus = Focus::Weights;
        return true;
      }
      _ => {}
    }

    match self.focus {
      Focus::Weights => return self.handle_weights_key(key).await,
      Focus::WeightForm => self.handle_weight_form_key(key).await,
      Focus::LiftForm => self.handle_lift_form_key(key).await,
      Focus::Image => self.handle_image_key(key).await,
      Focus::Pending => self.handle_pending_key(key).await,
    }
    true
  }

  fn next_focus(&self) -> Focus {
    match self.focus {
      Focus::Weights => Focus::WeightForm,
      Focus::WeightForm => Focus::LiftForm,
      Focus::LiftForm => Focus::Image,
      Focus::Image if self.is_superadmin() => Focus::Pending,
      Focus::Image | Focus::Pending => Focus::Weights,
    }
  }

  async fn handle_weights_key(&mut self, key: KeyEvent) -> bool {
    let rows = self.view().weights.len();
    match key.code {
      KeyCode::Char('q') => return false,
      KeyCode::Down | KeyCode::Char('j') => {
        if self.weight_cursor + 1 < rows {
          self.weight_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.weight_cursor = self.weight_cursor.saturating_sub(1);
      }
      KeyCode::Enter | KeyCode::Char(' ') => {
        if let Some(row) = self.view().weights.handle(self.weight_cursor) {
          self.orchestrator.toggle_row(row);
        }
      }
      KeyCode::Char('e') => {
        self.orchestrator.toggle_all_rows();
      }
      KeyCode::Char('d') => {
        self.confirm = self.view().weights.handle(self.weight_cursor).map(Confirm::DeleteWeight);
      }
      KeyCode::Char('a') => {
        let _ = self.orchestrator.request_admin().await;
      }
      KeyCode::Char('o') => {
        let _ = self.orchestrator.sign_out().await;
      }
      _ => {}
    }
    true
  }

  async fn handle_weight_form_key(&mut self, key: KeyEvent) {
    let form = &mut self.weight_form;
    match key.code {
      KeyCode::Up | KeyCode::Down => form.on_weight = !form.on_weight,
      KeyCode::Char('t') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        form.date = chrono::Local::now().date_naive().to_string();
      }
      KeyCode::Enter => {
        let (date, weight) = (form.date.clone(), form.weight.clone());
        if self.orchestrator.save_weight(&date, &weight).await.is_ok() {
          self.weight_form = WeightForm::default();
        }
      }
      KeyCode::Backspace => {
        if form.on_weight { form.weight.pop() } else { form.date.pop() };
      }
      KeyCode::Char(c) => {
        if form.on_weight { form.weight.push(c) } else { form.date.push(c) }
      }
      _ => {}
    }
  }

  async fn handle_lift_form_key(&mut self, key: KeyEvent) {
    let count = Lift::all().count();
    let form = &mut self.lift_form;
    let lift = form.selected();
    match key.code {
      KeyCode::Down => form.cursor = (form.cursor + 1) % count,
      KeyCode::Up => form.cursor = (form.cursor + count - 1) % count,
      KeyCode::Enter => {
        let inputs = form.inputs.clone();
        let _ = self.orchestrator.save_lifts(&inputs).await;
      }
      KeyCode::Backspace => {
        let mut raw = form.inputs.get(lift).to_owned();
        raw.pop();
        form.inputs.set(lift, raw);
      }
      KeyCode::Char(c) => {
        let raw = format!("{}{c}", form.inputs.get(lift));
        form.inputs.set(lift, raw);
      }
      _ => {}
    }
  }

  async fn handle_image_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.confirm = Some(Confirm::DeleteImage);
      }
      KeyCode::Enter => self.upload_image().await,
      KeyCode::Backspace => {
        self.image_path.pop();
      }
      KeyCode::Char(c) => self.image_path.push(c),
      _ => {}
    }
  }

  async fn upload_image(&mut self) {
    let path = self.image_path.trim().to_owned();
    match tokio::fs::read(&path).await {
      Ok(bytes) => {
        if self.orchestrator.upload_image(Bytes::from(bytes)).await.is_ok() {
          self.image_path.clear();
        }
      }
      Err(e) => {
        tracing::warn!(%path, error = %e, "could not read image file");
        self.orchestrator.notify(Notice::error(format!("Could not read {path}: {e}")));
      }
    }
  }

  async fn handle_pending_key(&mut self, key: KeyEvent) {
    let count = self.view().pending_admins.len();
    match key.code {
      KeyCode::Down | KeyCode::Char('j') => {
        if self.pending_cursor + 1 < count {
          self.pending_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.pending_cursor = self.pending_cursor.saturating_sub(1);
      }
      KeyCode::Char('r') => {
        let _ = self.orchestrator.refresh_pending_admins().await;
      }
      KeyCode::Enter => {
        let target = self.view().pending_admins.get(self.pending_cursor).map(|p| p.user_id);
        if let Some(user_id) = target {
          let _ = self.orchestrator.approve_admin(user_id).await;
        }
      }
      _ => {}
    }
  }
}
