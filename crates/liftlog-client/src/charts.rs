//! Chart Presenter: one weight-history line chart and one lift-records bar
//! chart, each owned through a single slot.
//!
//! Chart instances are created and disposed through a [`ChartSurface`]. A
//! slot disposes its live instance before a new one is created, so repeated
//! renders never accumulate instances.

use std::collections::HashMap;

use chrono::NaiveDate;
use liftlog_core::{
  lift::{Lift, LiftRecordSet},
  weight::WeightSample,
};

// ─── Chart data ──────────────────────────────────────────────────────────────

/// Which slot a chart belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
  WeightLine,
  LiftBar,
}

/// The data a chart instance is built from.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
  /// Body weight (kg) by date, ascending.
  WeightLine(Vec<(NaiveDate, f64)>),
  /// One bar per lift, in display order.
  LiftBar(Vec<(Lift, f64)>),
}

impl ChartData {
  pub fn kind(&self) -> ChartKind {
    match self {
      Self::WeightLine(_) => ChartKind::WeightLine,
      Self::LiftBar(_) => ChartKind::LiftBar,
    }
  }

  pub fn weight_line(samples: &[WeightSample]) -> Self {
    Self::WeightLine(samples.iter().map(|s| (s.date, s.weight)).collect())
  }

  /// Bars for `records`; values that are not finite display as zero.
  pub fn lift_bar(records: &LiftRecordSet) -> Self {
    Self::LiftBar(
      records
        .values()
        .into_iter()
        .map(|(lift, v)| (lift, if v.is_finite() { v } else { 0.0 }))
        .collect(),
    )
  }
}

// ─── Surface ─────────────────────────────────────────────────────────────────

/// Where chart instances live. Creating one allocates rendering resources
/// that stay alive until the handle is disposed.
pub trait ChartSurface {
  type Handle;

  fn create(&mut self, data: ChartData) -> Self::Handle;

  fn dispose(&mut self, handle: Self::Handle);
}

/// Identifier of a chart in a [`ChartRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChartId(u64);

/// A [`ChartSurface`] that keeps the data of every live chart, keyed by id.
/// The terminal UI draws from it.
#[derive(Debug, Default)]
pub struct ChartRegistry {
  live:    HashMap<ChartId, ChartData>,
  next_id: u64,
}

impl ChartRegistry {
  pub fn new() -> Self { Self::default() }

  pub fn get(&self, id: ChartId) -> Option<&ChartData> { self.live.get(&id) }

  pub fn live_count(&self) -> usize { self.live.len() }
}

impl ChartSurface for ChartRegistry {
  type Handle = ChartId;

  fn create(&mut self, data: ChartData) -> ChartId {
    self.next_id += 1;
    let id = ChartId(self.next_id);
    self.live.insert(id, data);
    id
  }

  fn dispose(&mut self, handle: ChartId) { self.live.remove(&handle); }
}

// ─── Slots ───────────────────────────────────────────────────────────────────

/// Holds at most one live chart instance.
#[derive(Debug)]
struct ChartSlot<H> {
  live: Option<H>,
}

impl<H> Default for ChartSlot<H> {
  fn default() -> Self { Self { live: None } }
}

impl<H> ChartSlot<H> {
  fn replace<S: ChartSurface<Handle = H>>(&mut self, surface: &mut S, data: ChartData) {
    self.clear(surface);
    self.live = Some(surface.create(data));
  }

  fn clear<S: ChartSurface<Handle = H>>(&mut self, surface: &mut S) {
    if let Some(old) = self.live.take() {
      surface.dispose(old);
    }
  }
}

// ─── Presenter ───────────────────────────────────────────────────────────────

/// Owns the surface and both chart slots exclusively.
pub struct ChartPresenter<S: ChartSurface> {
  surface: S,
  weight:  ChartSlot<S::Handle>,
  lift:    ChartSlot<S::Handle>,
}

impl<S: ChartSurface> ChartPresenter<S> {
  pub fn new(surface: S) -> Self {
    Self { surface, weight: ChartSlot::default(), lift: ChartSlot::default() }
  }

  pub fn render_weight_chart(&mut self, samples: &[WeightSample]) {
    tracing::debug!(points = samples.len(), "rendering weight chart");
    self.weight.replace(&mut self.surface, ChartData::weight_line(samples));
  }

  /// Render the lift chart, or leave the slot empty when there are no
  /// records.
  pub fn render_lift_chart(&mut self, records: Option<&LiftRecordSet>) {
    match records {
      Some(records) => {
        tracing::debug!("rendering lift chart");
        self.lift.replace(&mut self.surface, ChartData::lift_bar(records));
      }
      None => self.lift.clear(&mut self.surface),
    }
  }

  /// Dispose both charts.
  pub fn clear(&mut self) {
    self.weight.clear(&mut self.surface);
    self.lift.clear(&mut self.surface);
  }

  pub fn surface(&self) -> &S { &self.surface }

  pub fn weight_handle(&self) -> Option<&S::Handle> { self.weight.live.as_ref() }

  pub fn lift_handle(&self) -> Option<&S::Handle> { self.lift.live.as_ref() }
}

impl ChartPresenter<ChartRegistry> {
  pub fn weight_data(&self) -> Option<&ChartData> {
    self.weight_handle().and_then(|id| self.surface.get(*id))
  }

  pub fn lift_data(&self) -> Option<&ChartData> {
    self.lift_handle().and_then(|id| self.surface.get(*id))
  }
}

#[cfg(test)]
mod tests {
  use uuid::Uuid;

  use super::*;

  /// Counts every creation and disposal.
  #[derive(Default)]
  struct Recording {
    created:  Vec<(u32, ChartKind)>,
    disposed: Vec<u32>,
  }

  impl ChartSurface for Recording {
    type Handle = u32;

    fn create(&mut self, data: ChartData) -> u32 {
      let id = self.created.len() as u32;
      self.created.push((id, data.kind()));
      id
    }

    fn dispose(&mut self, handle: u32) { self.disposed.push(handle); }
  }

  fn sample(day: u32) -> WeightSample {
    WeightSample {
      id:      day as i64,
      user_id: Uuid::nil(),
      date:    NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
      weight:  80.0,
    }
  }

  #[test]
  fn repeated_renders_dispose_every_prior_instance() {
    let mut charts = ChartPresenter::new(Recording::default());
    for n in 1..=5 {
      charts.render_weight_chart(&[sample(n)]);
    }
    let surface = charts.surface();
    assert_eq!(surface.created.len(), 5);
    assert_eq!(surface.disposed, [0, 1, 2, 3]);
    assert_eq!(charts.weight_handle(), Some(&4));
  }

  #[test]
  fn slots_are_independent() {
    let mut charts = ChartPresenter::new(Recording::default());
    charts.render_weight_chart(&[]);
    charts.render_lift_chart(Some(&LiftRecordSet::zeroed(Uuid::nil())));
    charts.render_weight_chart(&[sample(1)]);

    assert_eq!(charts.surface().disposed, [0]);
    assert_eq!(charts.lift_handle(), Some(&1));
  }

  #[test]
  fn absent_records_leave_the_lift_slot_empty() {
    let mut charts = ChartPresenter::new(ChartRegistry::new());
    charts.render_lift_chart(None);
    assert!(charts.lift_data().is_none());

    charts.render_lift_chart(Some(&LiftRecordSet::zeroed(Uuid::nil())));
    assert_eq!(charts.surface().live_count(), 1);

    charts.render_lift_chart(None);
    assert_eq!(charts.surface().live_count(), 0);
  }

  #[test]
  fn registry_tracks_live_data() {
    let mut charts = ChartPresenter::new(ChartRegistry::new());
    charts.render_weight_chart(&[sample(2), sample(3)]);
    charts.render_weight_chart(&[sample(2)]);
    assert_eq!(charts.surface().live_count(), 1);
    assert_eq!(
      charts.weight_data(),
      Some(&ChartData::WeightLine(vec![(sample(2).date, 80.0)]))
    );

    charts.clear();
    assert_eq!(charts.surface().live_count(), 0);
  }
}
