//! The root coordinator: owns the [`Board`] and drives it through the store.
//!
//! Every successful write is followed by a reload of the full task list. A
//! failed write leaves the board as it was, with the editor still open when
//! the write came from it.

use chores_shared::{Board, FormError, TaskForm};
use chrono::{Local, NaiveDate};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::service::ChoreService;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// Another write for the same target is still in flight.
    Ignored,
    Cancelled,
}

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no loaded task has id {0}")]
    UnknownTask(Uuid),
}

/// The local calendar day used to stamp completions.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Debug)]
pub struct ChoreApp<S> {
    service: ChoreService<S>,
    board: Board,
}

impl<S: Store> ChoreApp<S> {
    pub fn new(service: ChoreService<S>, completed_by: impl Into<String>) -> Self {
        Self {
            service,
            board: Board::new(completed_by),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn service(&self) -> &ChoreService<S> {
        &self.service
    }

    /// Loads categories and tasks. Each load that succeeds is applied even
    /// when the other fails; the first failure is returned.
    #[instrument(skip(self))]
    pub async fn activate(&mut self) -> Result<(), StoreError> {
        let categories = self.service.load_categories().await;
        let tasks = self.reload().await;

        match categories {
            Ok(categories) => {
                self.board.set_categories(categories);
                tasks
            }
            Err(err) => Err(err),
        }
    }

    pub async fn reload(&mut self) -> Result<(), StoreError> {
        match self.service.load_tasks().await {
            Ok(tasks) => {
                self.board.set_tasks(tasks);
                Ok(())
            }
            Err(err) => {
                self.board.load_failed();
                Err(err)
            }
        }
    }

    async fn reload_after_write(&mut self) {
        if let Err(err) = self.reload().await {
            warn!(error = %err, "write succeeded but the task list could not be reloaded");
        }
    }

    /// Stamps the task with `today` and the board's completed-by label.
    #[instrument(skip(self))]
    pub async fn mark_complete(&mut self, id: Uuid, today: NaiveDate) -> Result<Outcome, ActionError> {
        if self.board.task(id).is_none() {
            return Err(ActionError::UnknownTask(id));
        }
        let Some(completion) = self.board.begin_complete(id, today) else {
            info!(%id, "completion already in flight; ignoring");
            return Ok(Outcome::Ignored);
        };

        let result = self.service.complete_task(id, &completion).await;
        self.board.finish_write(id);
        result?;

        self.reload_after_write().await;
        Ok(Outcome::Applied)
    }

    /// Submits the open editor: insert for a new task, update-by-id for an
    /// existing one.
    #[instrument(skip(self))]
    pub async fn submit_editor(&mut self) -> Result<Outcome, ActionError> {
        let Some(submission) = self.board.begin_save()? else {
            return Ok(Outcome::Ignored);
        };
        let target = submission.target();

        match self.service.submit(&submission).await {
            Ok(()) => {
                self.board.editor_write_succeeded(target);
                self.reload_after_write().await;
                Ok(Outcome::Applied)
            }
            Err(err) => {
                self.board.editor_write_failed(target, err.to_string());
                Err(err.into())
            }
        }
    }

    /// Deletes the task open in the editor once `confirm` agrees.
    #[instrument(skip(self, confirm))]
    pub async fn delete_from_editor<F>(&mut self, confirm: F) -> Result<Outcome, ActionError>
    where
        F: FnOnce(&TaskForm) -> bool,
    {
        let Some(editor) = self.board.editor() else {
            return Ok(Outcome::Ignored);
        };
        if editor.busy || !editor.form.is_edit() {
            return Ok(Outcome::Ignored);
        }
        if !confirm(&editor.form) {
            info!("task deletion cancelled");
            return Ok(Outcome::Cancelled);
        }

        let Some(id) = self.board.begin_delete() else {
            return Ok(Outcome::Ignored);
        };
        match self.service.delete_task(id).await {
            Ok(()) => {
                self.board.editor_write_succeeded(Some(id));
                self.reload_after_write().await;
                Ok(Outcome::Applied)
            }
            Err(err) => {
                self.board.editor_write_failed(Some(id), err.to_string());
                Err(err.into())
            }
        }
    }
}
