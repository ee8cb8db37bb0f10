use chrono::NaiveDate;
use uuid::Uuid;

use crate::model::{
  Task,
  TaskFields
};

pub const DEFAULT_FREQUENCY_DAYS: u32 = 7;

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  thiserror::Error,
)]
pub enum FormError {
  #[error("Name is required.")]
  MissingName,
  #[error(
    "Frequency must be a whole number \
     of days, at least 1 (got '{0}')."
  )]
  InvalidFrequency(String),
  #[error(
    "Last completed must be a date \
     like 2026-01-31 (got '{0}')."
  )]
  InvalidDate(String)
}

/// What a valid editor submission writes
/// to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
  Insert(TaskFields),
  Update {
    id:     Uuid,
    fields: TaskFields
  }
}

impl Submission {
  pub fn target(&self) -> Option<Uuid> {
    match self {
      | Self::Insert(_) => None,
      | Self::Update {
        id, ..
      } => Some(*id)
    }
  }
}

/// Editable state of the task form. Text
/// inputs are kept raw and validated on
/// submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
  pub id:             Option<Uuid>,
  pub name:           String,
  pub description:    String,
  pub frequency_days: String,
  pub category_id:    Option<Uuid>,
  pub last_completed:
    Option<NaiveDate>
}

impl Default for TaskForm {
  fn default() -> Self {
    Self {
      id:             None,
      name:           String::new(),
      description:    String::new(),
      frequency_days:
        DEFAULT_FREQUENCY_DAYS.to_string(),
      category_id:    None,
      last_completed: None
    }
  }
}

impl TaskForm {
  pub fn for_task(task: &Task) -> Self {
    Self {
      id:             Some(task.id),
      name:           task.name.clone(),
      description:    task
        .description
        .clone()
        .unwrap_or_default(),
      frequency_days: task
        .frequency_days
        .to_string(),
      category_id:    task.category_id,
      last_completed: task
        .last_completed
    }
  }

  pub fn is_edit(&self) -> bool {
    self.id.is_some()
  }

  pub fn title(&self) -> &'static str {
    if self.is_edit() {
      "Edit Task"
    } else {
      "Add New Task"
    }
  }

  pub fn submit_label(
    &self
  ) -> &'static str {
    if self.is_edit() {
      "Save"
    } else {
      "Add Task"
    }
  }

  /// Sets the date from a date input.
  /// An empty value clears it.
  pub fn set_last_completed(
    &mut self,
    raw: &str
  ) -> Result<(), FormError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
      self.last_completed = None;
      return Ok(());
    }
    let date = NaiveDate::parse_from_str(
      trimmed, "%Y-%m-%d"
    )
    .map_err(|_| {
      FormError::InvalidDate(
        trimmed.to_string()
      )
    })?;
    self.last_completed = Some(date);
    Ok(())
  }

  /// Sets the category from a select
  /// value; anything but an id means
  /// uncategorized.
  pub fn set_category_key(
    &mut self,
    raw: &str
  ) {
    self.category_id =
      Uuid::parse_str(raw.trim()).ok();
  }

  pub fn fields(
    &self
  ) -> Result<TaskFields, FormError> {
    let name = self.name.trim();
    if name.is_empty() {
      return Err(FormError::MissingName);
    }

    let raw_frequency =
      self.frequency_days.trim();
    let frequency_days = raw_frequency
      .parse::<u32>()
      .ok()
      .filter(|days| *days >= 1)
      .ok_or_else(|| {
        FormError::InvalidFrequency(
          raw_frequency.to_string()
        )
      })?;

    let description = Some(
      self.description.trim().to_string()
    )
    .filter(|text| !text.is_empty());

    Ok(TaskFields {
      name: name.to_string(),
      description,
      frequency_days,
      category_id: self.category_id,
      last_completed: self.last_completed
    })
  }

  pub fn submission(
    &self
  ) -> Result<Submission, FormError> {
    let fields = self.fields()?;
    Ok(match self.id {
      | Some(id) => {
        Submission::Update { id, fields }
      }
      | None => Submission::Insert(fields)
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_form_uses_defaults() {
    let form = TaskForm::default();
    assert!(!form.is_edit());
    assert_eq!(form.title(), "Add New Task");
    assert_eq!(form.frequency_days, "7");
    assert_eq!(form.category_id, None);
    assert_eq!(form.description, "");
  }

  #[test]
  fn new_form_submits_an_insert() {
    let form = TaskForm {
      name: "  Vacuum stairs ".to_string(),
      description: "   ".to_string(),
      ..TaskForm::default()
    };
    assert_eq!(
      form.submission().unwrap(),
      Submission::Insert(TaskFields {
        name:           "Vacuum stairs"
          .to_string(),
        description:    None,
        frequency_days: 7,
        category_id:    None,
        last_completed: None
      })
    );
  }

  #[test]
  fn existing_task_submits_an_update() {
    let task = Task {
      id:             Uuid::new_v4(),
      name:           "Clean oven".to_string(),
      description:    Some(
        "inside and racks".to_string()
      ),
      frequency_days: 60,
      last_completed: NaiveDate::from_ymd_opt(
        2026, 2, 1
      ),
      category_id:    Some(Uuid::new_v4()),
      completed_by:   Some("Team".to_string()),
      created_at:     None
    };
    let mut form = TaskForm::for_task(&task);
    form.frequency_days = "45".to_string();

    match form.submission().unwrap() {
      | Submission::Update { id, fields } => {
        assert_eq!(id, task.id);
        assert_eq!(fields.frequency_days, 45);
        assert_eq!(
          fields.description.as_deref(),
          Some("inside and racks")
        );
        assert_eq!(
          fields.last_completed,
          task.last_completed
        );
      }
      | other => {
        panic!("expected update, got {other:?}")
      }
    }
  }

  #[test]
  fn validation_rejects_bad_input() {
    let mut form = TaskForm::default();
    assert_eq!(
      form.fields(),
      Err(FormError::MissingName)
    );

    form.name = "Dust".to_string();
    form.frequency_days = "0".to_string();
    assert_eq!(
      form.fields(),
      Err(FormError::InvalidFrequency(
        "0".to_string()
      ))
    );

    form.frequency_days = "weekly".to_string();
    assert!(matches!(
      form.fields(),
      Err(FormError::InvalidFrequency(_))
    ));
  }

  #[test]
  fn date_and_category_inputs() {
    let mut form = TaskForm::default();
    form.set_last_completed("2026-07-04").unwrap();
    assert_eq!(
      form.last_completed,
      NaiveDate::from_ymd_opt(2026, 7, 4)
    );
    form.set_last_completed("").unwrap();
    assert_eq!(form.last_completed, None);
    assert!(
      form.set_last_completed("July 4").is_err()
    );

    let id = Uuid::new_v4();
    form.set_category_key(&id.to_string());
    assert_eq!(form.category_id, Some(id));
    form.set_category_key("");
    assert_eq!(form.category_id, None);
  }
}
