use chores_shared::{Category, SortDirection, Submission, Task, TaskCompletion, TaskFields};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::store::{Query, Store, StoreError};

/// Task and category operations over a [`Store`], bound to the configured
/// collection names. Every failure is logged before it is returned.
#[derive(Debug)]
pub struct ChoreService<S> {
    store: S,
    tasks_table: String,
    categories_table: String,
}

impl<S: Store> ChoreService<S> {
    pub fn new(store: S, cfg: &StoreConfig) -> Self {
        Self {
            store,
            tasks_table: cfg.tasks_table.clone(),
            categories_table: cfg.categories_table.clone(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All tasks in creation order.
    #[instrument(skip(self))]
    pub async fn load_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let query = Query::all().order_by("created_at", SortDirection::Ascending);
        let tasks = self
            .store
            .select::<Task>(&self.tasks_table, &query)
            .await
            .inspect_err(|err| error!(error = %err, "failed to load tasks"))?;
        info!(count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    #[instrument(skip(self))]
    pub async fn load_categories(&self) -> Result<Vec<Category>, StoreError> {
        let categories = self
            .store
            .select::<Category>(&self.categories_table, &Query::all())
            .await
            .inspect_err(|err| error!(error = %err, "failed to load categories"))?;
        info!(count = categories.len(), "loaded categories");
        Ok(categories)
    }

    #[instrument(skip(self))]
    pub async fn find_task(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let mut rows = self
            .store
            .select::<Task>(&self.tasks_table, &Query::all().eq("id", id))
            .await
            .inspect_err(|err| error!(error = %err, %id, "failed to look up task"))?;
        Ok(rows.pop())
    }

    #[instrument(skip(self, fields), fields(name = %fields.name))]
    pub async fn insert_task(&self, fields: &TaskFields) -> Result<(), StoreError> {
        self.store
            .insert(&self.tasks_table, fields)
            .await
            .inspect_err(|err| error!(error = %err, "failed to insert task"))?;
        info!("task inserted");
        Ok(())
    }

    #[instrument(skip(self, fields))]
    pub async fn update_task(&self, id: Uuid, fields: &TaskFields) -> Result<(), StoreError> {
        self.store
            .update(&self.tasks_table, id, fields)
            .await
            .inspect_err(|err| error!(error = %err, %id, "failed to update task"))?;
        info!(%id, "task updated");
        Ok(())
    }

    #[instrument(skip(self, completion), fields(by = %completion.completed_by))]
    pub async fn complete_task(
        &self,
        id: Uuid,
        completion: &TaskCompletion,
    ) -> Result<(), StoreError> {
        self.store
            .update(&self.tasks_table, id, completion)
            .await
            .inspect_err(|err| error!(error = %err, %id, "failed to mark task complete"))?;
        info!(%id, date = %completion.last_completed, "task marked complete");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_task(&self, id: Uuid) -> Result<(), StoreError> {
        self.store
            .delete(&self.tasks_table, id)
            .await
            .inspect_err(|err| error!(error = %err, %id, "failed to delete task"))?;
        info!(%id, "task deleted");
        Ok(())
    }

    /// Performs exactly one insert or update-by-id.
    pub async fn submit(&self, submission: &Submission) -> Result<(), StoreError> {
        match submission {
            Submission::Insert(fields) => self.insert_task(fields).await,
            Submission::Update { id, fields } => self.update_task(*id, fields).await,
        }
    }
}
