//! State owned by the root view: the
//! cached store snapshot, the category
//! filter, the completed-by selection and
//! the editor.
//!
//! Writes are serialized per task: a task
//! with a write in flight ignores further
//! writes until [`Board::finish_write`].

use std::collections::BTreeSet;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::editor::{
  FormError,
  Submission,
  TaskForm
};
use crate::filter::CategoryFilter;
use crate::model::{
  Category,
  Task,
  TaskCompletion,
  category_label
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
  pub form:  TaskForm,
  pub busy:  bool,
  pub error: Option<String>
}

impl EditorState {
  fn open(form: TaskForm) -> Self {
    Self {
      form,
      busy: false,
      error: None
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
  pub tasks:        Vec<Task>,
  pub categories:   Vec<Category>,
  pub loading:      bool,
  pub filter:       CategoryFilter,
  pub completed_by: String,
  editor:           Option<EditorState>,
  in_flight:        BTreeSet<Uuid>
}

impl Board {
  pub fn new(
    completed_by: impl Into<String>
  ) -> Self {
    Self {
      tasks:        Vec::new(),
      categories:   Vec::new(),
      loading:      true,
      filter:       CategoryFilter::All,
      completed_by: completed_by.into(),
      editor:       None,
      in_flight:    BTreeSet::new()
    }
  }

  pub fn set_tasks(
    &mut self,
    tasks: Vec<Task>
  ) {
    self.tasks = tasks;
    self.loading = false;
  }

  /// A failed load still ends the loading
  /// phase; the previous snapshot stays.
  pub fn load_failed(&mut self) {
    self.loading = false;
  }

  pub fn set_categories(
    &mut self,
    categories: Vec<Category>
  ) {
    self.categories = categories;
  }

  pub fn visible_tasks(&self) -> Vec<Task> {
    self.filter.apply(&self.tasks)
  }

  pub fn task(
    &self,
    id: Uuid
  ) -> Option<&Task> {
    self.tasks.iter().find(|t| t.id == id)
  }

  pub fn category_label(
    &self,
    id: Option<Uuid>
  ) -> &str {
    category_label(&self.categories, id)
  }

  pub fn is_writing(&self, id: Uuid) -> bool {
    self.in_flight.contains(&id)
  }

  pub fn editor(
    &self
  ) -> Option<&EditorState> {
    self.editor.as_ref()
  }

  pub fn editor_form_mut(
    &mut self
  ) -> Option<&mut TaskForm> {
    self
      .editor
      .as_mut()
      .map(|editor| &mut editor.form)
  }

  /// The add button: opens a blank form,
  /// or closes whatever form is open.
  pub fn toggle_new_editor(&mut self) {
    if self.editor.is_some() {
      self.close_editor();
    } else {
      self.editor = Some(EditorState::open(
        TaskForm::default()
      ));
    }
  }

  /// Opens the edit form for `task`.
  /// Refused while the current editor is
  /// busy.
  pub fn open_editor(
    &mut self,
    task: &Task
  ) -> bool {
    if self
      .editor
      .as_ref()
      .is_some_and(|editor| editor.busy)
    {
      return false;
    }
    self.editor = Some(EditorState::open(
      TaskForm::for_task(task)
    ));
    true
  }

  /// Closing is refused while a save or
  /// delete is in flight.
  pub fn close_editor(&mut self) -> bool {
    if self
      .editor
      .as_ref()
      .is_some_and(|editor| editor.busy)
    {
      return false;
    }
    self.editor = None;
    true
  }

  /// Starts a mark-complete write. Returns
  /// `None` when the task already has a
  /// write in flight.
  pub fn begin_complete(
    &mut self,
    id: Uuid,
    today: NaiveDate
  ) -> Option<TaskCompletion> {
    if !self.in_flight.insert(id) {
      return None;
    }
    Some(TaskCompletion {
      last_completed: today,
      completed_by:   self
        .completed_by
        .clone()
    })
  }

  pub fn finish_write(&mut self, id: Uuid) {
    self.in_flight.remove(&id);
  }

  /// Validates the open form and marks the
  /// editor busy. `Ok(None)` means there
  /// is nothing to submit right now.
  pub fn begin_save(
    &mut self
  ) -> Result<Option<Submission>, FormError>
  {
    let Some(editor) = self.editor.as_mut()
    else {
      return Ok(None);
    };
    if editor.busy {
      return Ok(None);
    }

    let submission =
      match editor.form.submission() {
        | Ok(submission) => submission,
        | Err(err) => {
          editor.error = Some(err.to_string());
          return Err(err);
        }
      };

    if let Some(id) = submission.target()
      && !self.in_flight.insert(id)
    {
      return Ok(None);
    }

    editor.busy = true;
    editor.error = None;
    Ok(Some(submission))
  }

  /// Marks the editor busy for a delete of
  /// the task being edited.
  pub fn begin_delete(&mut self) -> Option<Uuid> {
    let editor = self.editor.as_mut()?;
    let id = editor.form.id?;
    if editor.busy
      || !self.in_flight.insert(id)
    {
      return None;
    }
    editor.busy = true;
    editor.error = None;
    Some(id)
  }

  /// Successful save or delete: the
  /// editor closes.
  pub fn editor_write_succeeded(
    &mut self,
    target: Option<Uuid>
  ) {
    if let Some(id) = target {
      self.in_flight.remove(&id);
    }
    self.editor = None;
  }

  /// Failed save or delete: the editor
  /// stays open with the form intact.
  pub fn editor_write_failed(
    &mut self,
    target: Option<Uuid>,
    message: impl Into<String>
  ) {
    if let Some(id) = target {
      self.in_flight.remove(&id);
    }
    if let Some(editor) = self.editor.as_mut()
    {
      editor.busy = false;
      editor.error = Some(message.into());
    }
  }
}
