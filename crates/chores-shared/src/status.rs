use chrono::NaiveDate;
use serde::{
  Deserialize,
  Serialize
};

use crate::model::Task;

const OVERDUE_RATIO: f64 = 1.0;
const ALMOST_DUE_RATIO: f64 = 0.9;
const DUE_SOON_RATIO: f64 = 0.75;

/// Urgency bucket of a chore, derived
/// from the time since it was last done
/// relative to its frequency.
#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Hash,
)]
pub enum DueState {
  NotCompleted,
  OnTrack,
  DueSoon,
  AlmostDue,
  Overdue
}

impl DueState {
  /// Buckets the elapsed/frequency
  /// ratio. Each threshold must be
  /// exceeded, not met.
  pub fn from_ratio(ratio: f64) -> Self {
    if ratio > OVERDUE_RATIO {
      Self::Overdue
    } else if ratio > ALMOST_DUE_RATIO {
      Self::AlmostDue
    } else if ratio > DUE_SOON_RATIO {
      Self::DueSoon
    } else {
      Self::OnTrack
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      | Self::NotCompleted => {
        "Not Completed"
      }
      | Self::OnTrack => "On Track",
      | Self::DueSoon => "Due Soon",
      | Self::AlmostDue => "Almost Due",
      | Self::Overdue => "Overdue"
    }
  }

  /// Background color token for rows and
  /// cards.
  pub fn color(self) -> &'static str {
    match self {
      | Self::NotCompleted => "#e0e0e0",
      | Self::OnTrack => "#ccff90",
      | Self::DueSoon => "#fff475",
      | Self::AlmostDue => "#fbbc04",
      | Self::Overdue => "#f28b82"
    }
  }

  pub fn css_class(self) -> &'static str {
    match self {
      | Self::NotCompleted => {
        "status-not-completed"
      }
      | Self::OnTrack => "status-on-track",
      | Self::DueSoon => "status-due-soon",
      | Self::AlmostDue => {
        "status-almost-due"
      }
      | Self::Overdue => "status-overdue"
    }
  }
}

impl std::fmt::Display for DueState {
  fn fmt(
    &self,
    f: &mut std::fmt::Formatter<'_>
  ) -> std::fmt::Result {
    f.write_str(self.label())
  }
}

/// Classifies by elapsed days. `None`
/// means the chore was never completed.
/// `frequency_days` must be positive.
pub fn classify_elapsed(
  elapsed_days: Option<f64>,
  frequency_days: u32
) -> DueState {
  match elapsed_days {
    | Some(days) => DueState::from_ratio(
      days / f64::from(frequency_days)
    ),
    | None => DueState::NotCompleted
  }
}

/// Classifies against a calendar day.
/// Elapsed time is counted in whole days
/// between the completion date and
/// `today`.
pub fn classify(
  last_completed: Option<NaiveDate>,
  frequency_days: u32,
  today: NaiveDate
) -> DueState {
  let elapsed = last_completed.map(|last| {
    (today - last).num_days() as f64
  });
  classify_elapsed(elapsed, frequency_days)
}

impl Task {
  pub fn due_state(
    &self,
    today: NaiveDate
  ) -> DueState {
    classify(
      self.last_completed,
      self.frequency_days,
      today
    )
  }
}

#[cfg(test)]
mod tests {
  use chrono::Days;
  use proptest::prelude::*;

  use super::*;

  fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn ratio_of_exactly_one_is_almost_due() {
    let today = day(2026, 5, 20);
    let last = today - Days::new(10);
    let state = classify(Some(last), 10, today);
    assert_eq!(state, DueState::AlmostDue);
    assert_ne!(state, DueState::Overdue);
    assert_eq!(
      DueState::from_ratio(1.0),
      DueState::AlmostDue
    );
    assert_eq!(
      classify(
        Some(last - Days::new(1)),
        10,
        today
      ),
      DueState::Overdue
    );
  }

  #[test]
  fn boundaries_belong_to_the_lower_bucket()
   {
    assert_eq!(
      classify_elapsed(Some(9.0), 10),
      DueState::DueSoon
    );
    assert_eq!(
      classify_elapsed(Some(7.5), 10),
      DueState::OnTrack
    );
    assert_eq!(
      classify_elapsed(Some(9.5), 10),
      DueState::AlmostDue
    );
    assert_eq!(
      classify_elapsed(Some(8.0), 10),
      DueState::DueSoon
    );
  }

  #[test]
  fn never_completed_is_gray() {
    let state =
      classify(None, 1, day(2026, 1, 1));
    assert_eq!(
      state,
      DueState::NotCompleted
    );
    assert_eq!(state.label(), "Not Completed");
    assert_eq!(state.color(), "#e0e0e0");
  }

  #[test]
  fn completion_in_the_future_is_on_track() {
    let today = day(2026, 1, 1);
    assert_eq!(
      classify(
        Some(day(2026, 1, 5)),
        7,
        today
      ),
      DueState::OnTrack
    );
  }

  proptest! {
    #[test]
    fn buckets_follow_the_ratio(
      elapsed in 0u32..2_000,
      frequency in 1u32..400
    ) {
      let ratio = f64::from(elapsed) / f64::from(frequency);
      let expected = if ratio > 1.0 {
        DueState::Overdue
      } else if ratio > 0.9 {
        DueState::AlmostDue
      } else if ratio > 0.75 {
        DueState::DueSoon
      } else {
        DueState::OnTrack
      };
      prop_assert_eq!(
        classify_elapsed(Some(f64::from(elapsed)), frequency),
        expected
      );
    }

    #[test]
    fn missing_completion_ignores_frequency(
      frequency in 1u32..10_000
    ) {
      prop_assert_eq!(
        classify_elapsed(None, frequency),
        DueState::NotCompleted
      );
    }
  }
}
