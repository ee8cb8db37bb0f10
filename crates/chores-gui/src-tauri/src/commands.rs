use chores_core::store::StoreError;
use chores_shared::{
  AppSettingsDto,
  Category,
  Task,
  TaskCompleteArgs,
  TaskCompletion,
  TaskCreateArgs,
  TaskIdArg,
  TaskUpdateArgs
};
use chrono::Local;
use serde::Deserialize;
use tauri::State;
use tracing::{
  error,
  info,
  instrument
};

use crate::state::AppState;

fn err_to_string(
  err: StoreError
) -> String {
  err.to_string()
}

#[tauri::command]
#[instrument(skip(state))]
pub async fn app_settings(
  state: State<'_, AppState>,
  request_id: Option<String>
) -> Result<AppSettingsDto, String> {
  info!(request_id = ?request_id, "app_settings command invoked");
  Ok(state.settings.clone())
}

#[tauri::command]
#[instrument(skip(state), fields(request_id = ?request_id))]
pub async fn tasks_list(
  state: State<'_, AppState>,
  request_id: Option<String>
) -> Result<Vec<Task>, String> {
  info!(request_id = ?request_id, "tasks_list command invoked");
  let result = state.service.load_tasks().await;
  if let Err(err) = result.as_ref() {
    error!(request_id = ?request_id, error = %err, "tasks_list command failed");
  }
  result.map_err(err_to_string)
}

#[tauri::command]
#[instrument(skip(state), fields(request_id = ?request_id))]
pub async fn categories_list(
  state: State<'_, AppState>,
  request_id: Option<String>
) -> Result<Vec<Category>, String> {
  info!(request_id = ?request_id, "categories_list command invoked");
  let result =
    state.service.load_categories().await;
  if let Err(err) = result.as_ref() {
    error!(request_id = ?request_id, error = %err, "categories_list command failed");
  }
  result.map_err(err_to_string)
}

#[tauri::command]
#[instrument(skip(state, args), fields(request_id = ?request_id, id = %args.id, by = %args.completed_by))]
pub async fn task_complete(
  state: State<'_, AppState>,
  args: TaskCompleteArgs,
  request_id: Option<String>
) -> Result<(), String> {
  let completion = TaskCompletion {
    last_completed: Local::now()
      .date_naive(),
    completed_by:   args.completed_by
  };
  info!(request_id = ?request_id, id = %args.id, date = %completion.last_completed, "task_complete command invoked");
  let result = state
    .service
    .complete_task(args.id, &completion)
    .await;
  if let Err(err) = result.as_ref() {
    error!(request_id = ?request_id, error = %err, "task_complete command failed");
  }
  result.map_err(err_to_string)
}

#[tauri::command]
#[instrument(skip(state, args), fields(request_id = ?request_id, name = %args.fields.name))]
pub async fn task_create(
  state: State<'_, AppState>,
  args: TaskCreateArgs,
  request_id: Option<String>
) -> Result<(), String> {
  info!(request_id = ?request_id, "task_create command invoked");
  let result = state
    .service
    .insert_task(&args.fields)
    .await;
  if let Err(err) = result.as_ref() {
    error!(request_id = ?request_id, error = %err, "task_create command failed");
  }
  result.map_err(err_to_string)
}

#[tauri::command]
#[instrument(skip(state, args), fields(request_id = ?request_id, id = %args.id))]
pub async fn task_update(
  state: State<'_, AppState>,
  args: TaskUpdateArgs,
  request_id: Option<String>
) -> Result<(), String> {
  info!(request_id = ?request_id, id = %args.id, "task_update command invoked");
  let result = state
    .service
    .update_task(args.id, &args.fields)
    .await;
  if let Err(err) = result.as_ref() {
    error!(request_id = ?request_id, error = %err, "task_update command failed");
  }
  result.map_err(err_to_string)
}

#[tauri::command]
#[instrument(skip(state, args), fields(request_id = ?request_id, id = %args.id))]
pub async fn task_delete(
  state: State<'_, AppState>,
  args: TaskIdArg,
  request_id: Option<String>
) -> Result<(), String> {
  info!(request_id = ?request_id, id = %args.id, "task_delete command invoked");
  let result =
    state.service.delete_task(args.id).await;
  if let Err(err) = result.as_ref() {
    error!(request_id = ?request_id, error = %err, "task_delete command failed");
  }
  result.map_err(err_to_string)
}

#[derive(Debug, Deserialize)]
pub struct UiLogArg {
  pub event:  String,
  pub detail: String
}

#[tauri::command]
pub async fn ui_log(
  args: UiLogArg,
  request_id: Option<String>
) -> Result<(), String> {
  info!(request_id = ?request_id, event = %args.event, detail = %args.detail, "ui interaction");
  Ok(())
}
