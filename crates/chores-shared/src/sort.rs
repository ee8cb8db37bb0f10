use std::cmp::Ordering;
use std::str::FromStr;

use serde::{
  Deserialize,
  Serialize
};

use crate::model::{
  Category,
  Task,
  category_label
};

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
pub enum SortColumn {
  Name,
  Description,
  Frequency,
  LastCompleted,
  Status,
  Category,
  CompletedBy
}

impl SortColumn {
  pub const ALL: [SortColumn; 7] = [
    SortColumn::Name,
    SortColumn::Description,
    SortColumn::Frequency,
    SortColumn::LastCompleted,
    SortColumn::Status,
    SortColumn::Category,
    SortColumn::CompletedBy
  ];

  pub fn header(self) -> &'static str {
    match self {
      | Self::Name => "Task",
      | Self::Description => "Description",
      | Self::Frequency => {
        "Frequency (days)"
      }
      | Self::LastCompleted => {
        "Last Completed"
      }
      | Self::Status => "Status",
      | Self::Category => "Category",
      | Self::CompletedBy => "Completed By"
    }
  }

  pub fn as_key(self) -> &'static str {
    match self {
      | Self::Name => "name",
      | Self::Description => "description",
      | Self::Frequency => "frequency",
      | Self::LastCompleted => {
        "last-completed"
      }
      | Self::Status => "status",
      | Self::Category => "category",
      | Self::CompletedBy => "completed-by"
    }
  }
}

impl FromStr for SortColumn {
  type Err = String;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    let wanted = s
      .trim()
      .to_ascii_lowercase()
      .replace('_', "-");
    Self::ALL
      .into_iter()
      .find(|column| {
        column.as_key() == wanted
      })
      .ok_or_else(|| {
        let keys: Vec<&str> = Self::ALL
          .iter()
          .map(|column| column.as_key())
          .collect();
        format!(
          "unknown sort column '{s}' \
           (expected one of: {})",
          keys.join(", ")
        )
      })
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Default,
)]
pub enum SortDirection {
  #[default]
  Ascending,
  Descending
}

impl SortDirection {
  pub fn reversed(self) -> Self {
    match self {
      | Self::Ascending => Self::Descending,
      | Self::Descending => Self::Ascending
    }
  }

  pub fn as_key(self) -> &'static str {
    match self {
      | Self::Ascending => "asc",
      | Self::Descending => "desc"
    }
  }
}

/// Sort selection of the task list.
/// No column keeps the load order.
#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Default,
)]
pub struct SortState {
  pub column:    Option<SortColumn>,
  pub direction: SortDirection
}

impl SortState {
  pub fn by(
    column: SortColumn,
    direction: SortDirection
  ) -> Self {
    Self {
      column: Some(column),
      direction
    }
  }

  /// Same column flips the direction, a
  /// new column starts ascending.
  pub fn toggled(
    self,
    column: SortColumn
  ) -> Self {
    if self.column == Some(column) {
      Self {
        column:    Some(column),
        direction: self
          .direction
          .reversed()
      }
    } else {
      Self::by(
        column,
        SortDirection::Ascending
      )
    }
  }

  pub fn indicator(
    self,
    column: SortColumn
  ) -> &'static str {
    if self.column != Some(column) {
      return "";
    }
    match self.direction {
      | SortDirection::Ascending => " ▲",
      | SortDirection::Descending => " ▼"
    }
  }
}

/// Returns a sorted copy. Equal keys keep
/// their input order in both directions.
pub fn sort_tasks(
  tasks: &[Task],
  categories: &[Category],
  state: SortState
) -> Vec<Task> {
  let mut sorted = tasks.to_vec();
  let Some(column) = state.column else {
    return sorted;
  };

  match state.direction {
    | SortDirection::Ascending => {
      sorted.sort_by(|a, b| {
        compare(a, b, column, categories)
      })
    }
    | SortDirection::Descending => {
      sorted.sort_by(|a, b| {
        compare(b, a, column, categories)
      })
    }
  }
  sorted
}

fn compare(
  a: &Task,
  b: &Task,
  column: SortColumn,
  categories: &[Category]
) -> Ordering {
  match column {
    | SortColumn::Name => a.name.cmp(&b.name),
    | SortColumn::Description => a
      .description
      .as_deref()
      .unwrap_or_default()
      .cmp(
        b.description
          .as_deref()
          .unwrap_or_default()
      ),
    | SortColumn::Frequency => a
      .frequency_days
      .cmp(&b.frequency_days),
    | SortColumn::LastCompleted => a
      .last_completed
      .cmp(&b.last_completed),
    | SortColumn::Status => {
      a.next_due().cmp(&b.next_due())
    }
    | SortColumn::Category => {
      category_label(
        categories,
        a.category_id
      )
      .cmp(category_label(
        categories,
        b.category_id
      ))
    }
    | SortColumn::CompletedBy => a
      .completed_by
      .as_deref()
      .unwrap_or_default()
      .cmp(
        b.completed_by
          .as_deref()
          .unwrap_or_default()
      )
  }
}
