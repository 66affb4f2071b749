//! List/Accordion Presenter for the weight history.
//!
//! Each render rebuilds the rows and starts a new binding generation. Row
//! handles carry the generation they were issued for, so a handle kept from
//! an earlier render can never act on the rebuilt list.

use liftlog_core::weight::WeightSample;

/// Display state of one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowState {
  Closed,
  Open,
}

/// What the expand/collapse-all control will do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkToggle {
  ExpandAll,
  CollapseAll,
}

impl BulkToggle {
  pub fn label(self) -> &'static str {
    match self {
      Self::ExpandAll => "expand all",
      Self::CollapseAll => "collapse all",
    }
  }
}

/// A binding to one row of one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowHandle {
  generation: u64,
  index:      usize,
}

#[derive(Debug, Clone)]
pub struct AccordionRow {
  pub sample: WeightSample,
  pub state:  RowState,
}

/// The weight-history list. Row clicks keep at most one row open.
#[derive(Debug, Default)]
pub struct Accordion {
  rows:       Vec<AccordionRow>,
  generation: u64,
}

impl Accordion {
  pub fn new() -> Self { Self::default() }

  /// Rebuild the list from `samples`. Every row starts closed and every
  /// previously issued handle is invalidated.
  pub fn render(&mut self, samples: Vec<WeightSample>) {
    self.generation += 1;
    self.rows = samples
      .into_iter()
      .map(|sample| AccordionRow { sample, state: RowState::Closed })
      .collect();
  }

  /// Empty the list, e.g. on sign-out.
  pub fn clear(&mut self) { self.render(Vec::new()); }

  pub fn rows(&self) -> &[AccordionRow] { &self.rows }

  pub fn len(&self) -> usize { self.rows.len() }

  pub fn is_empty(&self) -> bool { self.rows.is_empty() }

  /// Handle for the row at `index` in the current render.
  pub fn handle(&self, index: usize) -> Option<RowHandle> {
    (index < self.rows.len()).then_some(RowHandle { generation: self.generation, index })
  }

  fn resolve(&self, handle: RowHandle) -> Option<usize> {
    (handle.generation == self.generation && handle.index < self.rows.len())
      .then_some(handle.index)
  }

  /// Click on a row. Opening a row closes all others.
  ///
  /// Returns the row's new state, or `None` for a stale handle.
  pub fn toggle(&mut self, handle: RowHandle) -> Option<RowState> {
    let index = self.resolve(handle)?;
    let next = match self.rows[index].state {
      RowState::Open => RowState::Closed,
      RowState::Closed => RowState::Open,
    };
    if next == RowState::Open {
      for row in &mut self.rows {
        row.state = RowState::Closed;
      }
    }
    self.rows[index].state = next;
    Some(next)
  }

  /// The sample id a delete request on `handle` targets.
  pub fn delete_target(&self, handle: RowHandle) -> Option<i64> {
    self.resolve(handle).map(|i| self.rows[i].sample.id)
  }

  fn all_open(&self) -> bool {
    !self.rows.is_empty() && self.rows.iter().all(|r| r.state == RowState::Open)
  }

  /// What [`Accordion::toggle_all`] would do right now.
  pub fn next_bulk_action(&self) -> BulkToggle {
    if self.all_open() { BulkToggle::CollapseAll } else { BulkToggle::ExpandAll }
  }

  /// Expand every row, or collapse every row if all are already open.
  pub fn toggle_all(&mut self) -> BulkToggle {
    let action = self.next_bulk_action();
    let state = match action {
      BulkToggle::ExpandAll => RowState::Open,
      BulkToggle::CollapseAll => RowState::Closed,
    };
    for row in &mut self.rows {
      row.state = state;
    }
    action
  }

  pub fn open_count(&self) -> usize {
    self.rows.iter().filter(|r| r.state == RowState::Open).count()
  }
}
