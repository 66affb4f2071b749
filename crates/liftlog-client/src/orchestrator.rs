//! Orchestrator: sequences the components on session change and after
//! every mutation.
//!
//! Bootstrap order for a new session is fixed: resolve role, reveal panel,
//! weights (fetch, chart, list), lifts (fetch, chart), profile image (fetch,
//! show). A failing stage stops the stages after it. A mutation re-runs only
//! the fetch-and-render pair of the dataset it touched.
//!
//! Every public action records a [`Notice`] and returns control to an idle
//! dashboard; nothing here is fatal.

use std::sync::Arc;

use bytes::Bytes;
use liftlog_core::{
  backend::Backend,
  identity::Session,
  lift::LiftRecordSet,
  profile::{NewProfile, PlayerProfile, Role},
  weight::WeightSample,
};
use tokio::sync::watch;
use uuid::Uuid;

use crate::{
  ClientError, Result,
  accordion::{BulkToggle, RowHandle, RowState},
  charts::ChartSurface,
  dashboard::{Dashboard, Notice},
  records::{Confirmation, LiftInputs, Outcome, RecordClient},
  role_gate::{Panel, RoleGate, panel_for},
  session::{SessionResolver, SignUpForm},
};

pub struct Orchestrator<B, S: ChartSurface> {
  session: SessionResolver<B>,
  roles:   RoleGate<B>,
  records: RecordClient<B>,
  view:    Dashboard<S>,
}

impl<B: Backend, S: ChartSurface> Orchestrator<B, S> {
  pub fn new(backend: Arc<B>, surface: S) -> Self {
    Self {
      session: SessionResolver::new(backend.clone()),
      roles:   RoleGate::new(backend.clone()),
      records: RecordClient::new(backend),
      view:    Dashboard::new(surface),
    }
  }

  pub fn view(&self) -> &Dashboard<S> { &self.view }

  /// Session transitions to feed back into [`Orchestrator::on_session_change`].
  pub fn subscribe(&self) -> watch::Receiver<Option<Session>> { self.session.subscribe() }

  pub fn clear_notice(&mut self) { self.view.notice = None; }

  /// Show a notice raised outside the orchestrator, e.g. by the UI itself.
  pub fn notify(&mut self, notice: Notice) { self.view.notice = Some(notice); }

  // ── Session ───────────────────────────────────────────────────────────────

  /// Resolve the current session once and show the matching screen.
  pub async fn start(&mut self) {
    let session = self.session.current_session().await;
    self.on_session_change(session).await;
  }

  /// React to a session transition. Re-delivery of the session that is
  /// already shown is ignored.
  pub async fn on_session_change(&mut self, session: Option<Session>) {
    match session {
      None => {
        if let Some(old) = &self.view.session {
          tracing::info!(user_id = %old.user_id(), "showing sign-in screen");
        }
        self.view.reset();
      }
      Some(session) => {
        let current = self.view.session.as_ref().map(|s| s.session_id);
        if current == Some(session.session_id) {
          return;
        }
        self.bootstrap(session).await;
      }
    }
  }

  async fn bootstrap(&mut self, session: Session) {
    self.view.reset();
    let user_id = session.user_id();
    tracing::info!(%user_id, "bootstrapping dashboard");
    self.view.session = Some(session);

    if let Err(e) = self.run_bootstrap(user_id).await {
      self.report("loading your dashboard", &e);
    }
  }

  async fn run_bootstrap(&mut self, user_id: Uuid) -> Result<()> {
    let Some(profile) = self.roles.resolve_role(user_id).await? else {
      return Ok(());
    };

    let panel = panel_for(&profile.role);
    self.view.panels.reveal(panel);
    self.view.profile = Some(profile);
    if panel == Panel::SuperAdmin {
      // Side branch: a failure here does not stop the data pipeline.
      if let Err(e) = self.reload_pending_admins().await {
        self.report("loading admin requests", &e);
      }
    }

    self.reload_weights(user_id).await?;
    self.reload_lifts(user_id).await?;
    self.reload_profile_image(user_id).await?;
    Ok(())
  }

  pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<()> {
    let result = self.session.sign_in(email, password).await;
    let session =
      self.settle("signing in", result, |s| format!("Signed in as {}.", s.user.email))?;
    self.on_session_change(Some(session)).await;
    Ok(())
  }

  /// Register, create the profile, then show whatever session results.
  pub async fn sign_up(&mut self, form: &SignUpForm) -> Result<()> {
    let result = self.try_sign_up(form).await;
    let outcome = self.settle("signing up", result, |p| format!("Welcome, {}!", p.email));
    let current = self.session.current_session().await;
    self.on_session_change(current).await;
    outcome.map(|_| ())
  }

  async fn try_sign_up(&mut self, form: &SignUpForm) -> Result<PlayerProfile> {
    let user = self.session.sign_up(form).await?;
    self
      .records
      .create_profile(NewProfile {
        user_id: user.user_id,
        email:   user.email,
        region:  form.region.clone(),
        team:    form.team.clone(),
        name:    form.name.clone(),
      })
      .await
  }

  pub async fn sign_out(&mut self) -> Result<()> {
    let result = self.session.sign_out().await;
    self.settle("signing out", result, |_| "Signed out.".to_owned())?;
    self.on_session_change(None).await;
    Ok(())
  }

  // ── Weights ───────────────────────────────────────────────────────────────

  async fn reload_weights(&mut self, user_id: Uuid) -> Result<()> {
    let samples = self.records.list_weight_samples(user_id).await?;
    self.view.charts.render_weight_chart(&samples);
    self.view.weights.render(samples);
    Ok(())
  }

  /// Store a sample, then refresh the weight chart and list. A failed
  /// refresh does not undo the save and is reported on its own.
  pub async fn save_weight(&mut self, date: &str, weight: &str) -> Result<WeightSample> {
    let result = match self.user_id() {
      Ok(user_id) => self.records.insert_weight_sample(user_id, date, weight).await,
      Err(e) => Err(e),
    };
    let sample = self.settle("saving the weight", result, |s| {
      format!("Saved {} kg on {}.", s.weight, s.date)
    })?;

    if let Err(e) = self.reload_weights(sample.user_id).await {
      tracing::error!(error = %e, "refreshing weights after a save failed");
      self.view.notice = Some(Notice::error(format!(
        "Saved {} kg on {}, but the list could not be refreshed: {e}",
        sample.weight, sample.date
      )));
    }
    Ok(sample)
  }

  pub async fn delete_weight(
    &mut self,
    row: RowHandle,
    confirmation: Confirmation,
  ) -> Result<Outcome> {
    let result = self.try_delete_weight(row, confirmation).await;
    self.settle("deleting the weight", result, |o| match o {
      Outcome::Done => "Weight deleted.".to_owned(),
      Outcome::Cancelled => "Delete cancelled.".to_owned(),
    })
  }

  async fn try_delete_weight(
    &mut self,
    row: RowHandle,
    confirmation: Confirmation,
  ) -> Result<Outcome> {
    let user_id = self.user_id()?;
    let id = self
      .view
      .weights
      .delete_target(row)
      .ok_or_else(|| ClientError::validation("That row is no longer on screen."))?;
    let outcome = self.records.delete_weight_sample(id, confirmation).await?;
    if outcome == Outcome::Done {
      self.reload_weights(user_id).await?;
    }
    Ok(outcome)
  }

  pub fn toggle_row(&mut self, row: RowHandle) -> Option<RowState> {
    self.view.weights.toggle(row)
  }

  pub fn toggle_all_rows(&mut self) -> BulkToggle { self.view.weights.toggle_all() }

  // ── Lifts ─────────────────────────────────────────────────────────────────

  async fn reload_lifts(&mut self, user_id: Uuid) -> Result<()> {
    let records = self.records.get_lift_records(user_id).await?;
    self.view.charts.render_lift_chart(records.as_ref());
    self.view.lifts = records;
    Ok(())
  }

  pub async fn save_lifts(&mut self, inputs: &LiftInputs) -> Result<LiftRecordSet> {
    let result = self.try_save_lifts(inputs).await;
    self.settle("saving lift records", result, |_| "Lift records saved.".to_owned())
  }

  async fn try_save_lifts(&mut self, inputs: &LiftInputs) -> Result<LiftRecordSet> {
    let user_id = self.user_id()?;
    let records = self.records.upsert_lift_records(user_id, inputs).await?;
    self.reload_lifts(user_id).await?;
    Ok(records)
  }

  // ── Profile image ─────────────────────────────────────────────────────────

  async fn reload_profile_image(&mut self, user_id: Uuid) -> Result<()> {
    self.view.profile_image = self.records.get_profile_image_url(user_id).await?;
    Ok(())
  }

  pub async fn upload_image(&mut self, bytes: Bytes) -> Result<()> {
    let result = self.try_upload_image(bytes).await;
    self.settle("uploading the image", result, |_| "Profile image uploaded.".to_owned())
  }

  async fn try_upload_image(&mut self, bytes: Bytes) -> Result<()> {
    let user_id = self.user_id()?;
    self.records.upload_profile_image(user_id, bytes).await?;
    self.reload_profile_image(user_id).await
  }

  pub async fn delete_image(&mut self, confirmation: Confirmation) -> Result<Outcome> {
    let result = self.try_delete_image(confirmation).await;
    self.settle("deleting the image", result, |o| match o {
      Outcome::Done => "Profile image deleted.".to_owned(),
      Outcome::Cancelled => "Delete cancelled.".to_owned(),
    })
  }

  async fn try_delete_image(&mut self, confirmation: Confirmation) -> Result<Outcome> {
    let user_id = self.user_id()?;
    let outcome = self.records.delete_profile_image(user_id, confirmation).await;
    if outcome == Outcome::Done {
      self.reload_profile_image(user_id).await?;
    }
    Ok(outcome)
  }

  // ── Admin requests ────────────────────────────────────────────────────────

  async fn reload_pending_admins(&mut self) -> Result<()> {
    self.view.pending_admins = self.records.list_pending_admins().await?;
    Ok(())
  }

  /// Ask for elevation to admin. The role itself only changes on approval.
  pub async fn request_admin(&mut self) -> Result<PlayerProfile> {
    let result = match self.user_id() {
      Ok(_) if self.view.profile.as_ref().is_some_and(|p| p.role != Role::Player) => {
        Err(ClientError::validation("Only players can request admin access."))
      }
      Ok(user_id) => self.records.request_admin(user_id).await,
      Err(e) => Err(e),
    };
    let profile =
      self.settle("requesting admin access", result, |_| "Admin access requested.".to_owned())?;
    self.view.profile = Some(profile.clone());
    Ok(profile)
  }

  /// Approve a pending request. Only offered on the super-admin panel; the
  /// backing store enforces who may actually do it.
  pub async fn approve_admin(&mut self, user_id: Uuid) -> Result<PlayerProfile> {
    let result = self.try_approve_admin(user_id).await;
    self.settle("approving the request", result, |p| {
      format!("{} is now an admin.", p.email)
    })
  }

  async fn try_approve_admin(&mut self, user_id: Uuid) -> Result<PlayerProfile> {
    let profile = self.records.approve_admin(user_id).await?;
    self.reload_pending_admins().await?;
    Ok(profile)
  }

  pub async fn refresh_pending_admins(&mut self) -> Result<()> {
    let result = self.reload_pending_admins().await;
    self.settle("loading admin requests", result, |_| "Admin requests refreshed.".to_owned())
  }

  // ── Helpers ───────────────────────────────────────────────────────────────

  fn user_id(&self) -> Result<Uuid> {
    self
      .view
      .session
      .as_ref()
      .map(Session::user_id)
      .ok_or(ClientError::NotSignedIn)
  }

  /// Turn an action's result into a notice, logging backend failures.
  fn settle<T>(
    &mut self,
    action: &str,
    result: Result<T>,
    success: impl FnOnce(&T) -> String,
  ) -> Result<T> {
    match &result {
      Ok(value) => self.view.notice = Some(Notice::info(success(value))),
      Err(e) => self.report(action, e),
    }
    result
  }

  fn report(&mut self, action: &str, e: &ClientError) {
    let text = match e {
      ClientError::Validation(msg) => msg.clone(),
      ClientError::NotSignedIn => "Sign in first.".to_owned(),
      ClientError::Auth(_) => e.to_string(),
      ClientError::Fetch(_) | ClientError::Upload(_) => {
        tracing::error!(error = %e, "{action} failed");
        format!("Failed {action}: {e}")
      }
    };
    self.view.notice = Some(Notice::error(text));
  }
}
