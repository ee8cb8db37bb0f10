use chrono::{
  Days,
  NaiveDate
};
use serde::{
  Deserialize,
  Deserializer,
  Serialize
};
use uuid::Uuid;

pub const UNCATEGORIZED_LABEL: &str =
  "Uncategorized";

/// A recurring chore as stored in the
/// `tasks` collection.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct Task {
  pub id:             Uuid,
  pub name:           String,
  #[serde(
    default,
    deserialize_with = "blank_as_none"
  )]
  pub description:    Option<String>,
  pub frequency_days: u32,
  #[serde(default)]
  pub last_completed:
    Option<NaiveDate>,
  #[serde(default)]
  pub category_id:    Option<Uuid>,
  #[serde(
    default,
    deserialize_with = "blank_as_none"
  )]
  pub completed_by:   Option<String>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub created_at:     Option<String>
}

impl Task {
  /// Date the chore falls due again.
  /// Never-completed chores are due
  /// since the epoch.
  pub fn next_due(&self) -> NaiveDate {
    match self.last_completed {
      | Some(last) => last
        .checked_add_days(Days::new(
          u64::from(self.frequency_days)
        ))
        .unwrap_or(NaiveDate::MAX),
      | None => NaiveDate::default()
    }
  }

  pub fn short_id(&self) -> String {
    self.id.simple().to_string()[..8]
      .to_string()
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct Category {
  pub id:   Uuid,
  pub name: String
}

/// Writable columns of a task, sent on
/// insert and on editor updates.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct TaskFields {
  pub name:           String,
  pub description:    Option<String>,
  pub frequency_days: u32,
  pub category_id:    Option<Uuid>,
  pub last_completed:
    Option<NaiveDate>
}

impl From<&Task> for TaskFields {
  fn from(task: &Task) -> Self {
    Self {
      name:           task.name.clone(),
      description:    task
        .description
        .clone(),
      frequency_days: task
        .frequency_days,
      category_id:    task.category_id,
      last_completed: task
        .last_completed
    }
  }
}

/// Patch written by the mark-complete
/// action.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct TaskCompletion {
  pub last_completed: NaiveDate,
  pub completed_by:   String
}

/// Resolves the display name of a
/// category reference.
pub fn category_label<'a>(
  categories: &'a [Category],
  id: Option<Uuid>
) -> &'a str {
  id.and_then(|id| {
    categories
      .iter()
      .find(|category| category.id == id)
  })
  .map_or(UNCATEGORIZED_LABEL, |c| {
    c.name.as_str()
  })
}

fn blank_as_none<'de, D>(
  deserializer: D
) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>
{
  let raw =
    Option::<String>::deserialize(
      deserializer
    )?;
  Ok(raw.filter(|value| {
    !value.trim().is_empty()
  }))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn store_rows_decode_with_blank_optionals()
   {
    let raw = r#"{
      "id": "6f1c1a52-3c39-4b1e-9f57-1c1f3f1a2b3c",
      "name": "Water plants",
      "description": "",
      "frequency_days": 3,
      "last_completed": "2026-03-01",
      "category_id": null,
      "completed_by": null,
      "created_at": "2026-01-01T10:00:00+00:00"
    }"#;
    let task: Task =
      serde_json::from_str(raw).unwrap();
    assert_eq!(task.description, None);
    assert_eq!(task.completed_by, None);
    assert_eq!(
      task.last_completed,
      NaiveDate::from_ymd_opt(2026, 3, 1)
    );
    assert_eq!(
      task.next_due(),
      NaiveDate::from_ymd_opt(2026, 3, 4)
        .unwrap()
    );
  }

  #[test]
  fn never_completed_is_due_at_epoch() {
    let task = Task {
      id:             Uuid::new_v4(),
      name:           "Descale kettle"
        .to_string(),
      description:    None,
      frequency_days: 30,
      last_completed: None,
      category_id:    None,
      completed_by:   None,
      created_at:     None
    };
    assert_eq!(
      task.next_due(),
      NaiveDate::from_ymd_opt(1970, 1, 1)
        .unwrap()
    );
  }

  #[test]
  fn unknown_category_falls_back() {
    let kitchen = Category {
      id:   Uuid::new_v4(),
      name: "Kitchen".to_string()
    };
    let categories = vec![kitchen.clone()];
    assert_eq!(
      category_label(
        &categories,
        Some(kitchen.id)
      ),
      "Kitchen"
    );
    assert_eq!(
      category_label(
        &categories,
        Some(Uuid::new_v4())
      ),
      UNCATEGORIZED_LABEL
    );
    assert_eq!(
      category_label(&categories, None),
      UNCATEGORIZED_LABEL
    );
  }
}
