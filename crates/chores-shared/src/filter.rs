use serde::{
  Deserialize,
  Serialize
};
use uuid::Uuid;

use crate::model::Task;

pub const ALL_CATEGORIES_KEY: &str = "all";

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
pub enum CategoryFilter {
  #[default]
  All,
  Category(Uuid)
}

impl CategoryFilter {
  /// Parses a select value. Anything that
  /// is not a category id shows all tasks.
  pub fn from_key(key: &str) -> Self {
    match Uuid::parse_str(key.trim()) {
      | Ok(id) => Self::Category(id),
      | Err(_) => Self::All
    }
  }

  pub fn as_key(self) -> String {
    match self {
      | Self::All => {
        ALL_CATEGORIES_KEY.to_string()
      }
      | Self::Category(id) => id.to_string()
    }
  }

  pub fn matches(
    self,
    task: &Task
  ) -> bool {
    match self {
      | Self::All => true,
      | Self::Category(id) => {
        task.category_id == Some(id)
      }
    }
  }

  pub fn apply(
    self,
    tasks: &[Task]
  ) -> Vec<Task> {
    tasks
      .iter()
      .filter(|task| self.matches(task))
      .cloned()
      .collect()
  }
}
