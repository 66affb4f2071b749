//! Personal-best lift records.
//!
//! Each user has at most one [`LiftRecordSet`] holding a value for every
//! [`Lift`]. Writes always replace the whole set.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};
use uuid::Uuid;

/// The six fixed lift categories, in display order.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Lift {
  Snatch,
  CleanJerk,
  BackSquat,
  FrontSquat,
  Deadlift,
  BenchPress,
}

impl Lift {
  /// Human-readable label used in charts and forms.
  pub fn label(self) -> &'static str {
    match self {
      Self::Snatch => "Snatch",
      Self::CleanJerk => "Clean & Jerk",
      Self::BackSquat => "Back Squat",
      Self::FrontSquat => "Front Squat",
      Self::Deadlift => "Deadlift",
      Self::BenchPress => "Bench Press",
    }
  }

  pub fn all() -> impl Iterator<Item = Lift> { Self::iter() }
}

/// The lift records of one user. Values are kilograms, never negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiftRecordSet {
  pub user_id:     Uuid,
  pub snatch:      f64,
  pub clean_jerk:  f64,
  pub back_squat:  f64,
  pub front_squat: f64,
  pub deadlift:    f64,
  pub bench_press: f64,
}

impl LiftRecordSet {
  /// A record set with every lift at zero.
  pub fn zeroed(user_id: Uuid) -> Self {
    Self {
      user_id,
      snatch: 0.0,
      clean_jerk: 0.0,
      back_squat: 0.0,
      front_squat: 0.0,
      deadlift: 0.0,
      bench_press: 0.0,
    }
  }

  pub fn get(&self, lift: Lift) -> f64 {
    match lift {
      Lift::Snatch => self.snatch,
      Lift::CleanJerk => self.clean_jerk,
      Lift::BackSquat => self.back_squat,
      Lift::FrontSquat => self.front_squat,
      Lift::Deadlift => self.deadlift,
      Lift::BenchPress => self.bench_press,
    }
  }

  pub fn set(&mut self, lift: Lift, value: f64) {
    let slot = match lift {
      Lift::Snatch => &mut self.snatch,
      Lift::CleanJerk => &mut self.clean_jerk,
      Lift::BackSquat => &mut self.back_squat,
      Lift::FrontSquat => &mut self.front_squat,
      Lift::Deadlift => &mut self.deadlift,
      Lift::BenchPress => &mut self.bench_press,
    };
    *slot = value;
  }

  /// All six values in display order.
  pub fn values(&self) -> Vec<(Lift, f64)> {
    Lift::all().map(|lift| (lift, self.get(lift))).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn discriminants_match_column_names() {
    let names: Vec<String> = Lift::all().map(|l| l.to_string()).collect();
    assert_eq!(
      names,
      [
        "snatch",
        "clean_jerk",
        "back_squat",
        "front_squat",
        "deadlift",
        "bench_press"
      ]
    );
  }

  #[test]
  fn set_then_get() {
    let mut records = LiftRecordSet::zeroed(Uuid::nil());
    records.set(Lift::FrontSquat, 140.0);
    assert_eq!(records.get(Lift::FrontSquat), 140.0);
    assert_eq!(records.values().iter().filter(|(_, v)| *v == 0.0).count(), 5);
  }
}
