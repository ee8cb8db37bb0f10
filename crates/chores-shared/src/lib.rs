pub mod board;
pub mod editor;
pub mod filter;
pub mod layout;
pub mod model;
pub mod sort;
pub mod status;

pub use board::{
  Board,
  EditorState
};
pub use editor::{
  DEFAULT_FREQUENCY_DAYS,
  FormError,
  Submission,
  TaskForm
};
pub use filter::CategoryFilter;
pub use layout::Layout;
pub use model::{
  Category,
  Task,
  TaskCompletion,
  TaskFields,
  UNCATEGORIZED_LABEL,
  category_label
};
pub use sort::{
  SortColumn,
  SortDirection,
  SortState,
  sort_tasks
};
pub use status::{
  DueState,
  classify,
  classify_elapsed
};
use serde::{
  Deserialize,
  Serialize
};
use uuid::Uuid;

pub const DEFAULT_COMPLETED_BY: &str =
  "Team";

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct TaskIdArg {
  pub id: Uuid
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct TaskCompleteArgs {
  pub id:           Uuid,
  pub completed_by: String
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct TaskCreateArgs {
  pub fields: TaskFields
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct TaskUpdateArgs {
  pub id:     Uuid,
  pub fields: TaskFields
}

/// Settings the frontend needs at mount.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct AppSettingsDto {
  pub completed_by_choices: Vec<String>,
  pub default_completed_by: String
}

impl Default for AppSettingsDto {
  fn default() -> Self {
    Self {
      completed_by_choices: vec![
        DEFAULT_COMPLETED_BY.to_string(),
      ],
      default_completed_by:
        DEFAULT_COMPLETED_BY.to_string()
    }
  }
}
