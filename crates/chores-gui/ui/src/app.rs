use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use chores_shared::filter::ALL_CATEGORIES_KEY;
use chores_shared::{
  AppSettingsDto,
  Board,
  Category,
  CategoryFilter,
  DEFAULT_COMPLETED_BY,
  Submission,
  Task,
  TaskCompleteArgs,
  TaskCreateArgs,
  TaskForm,
  TaskIdArg,
  TaskUpdateArgs
};
use chrono::Local;
use gloo::console::log;
use uuid::Uuid;
use web_sys::HtmlSelectElement;
use yew::functional::UseForceUpdateHandle;
use yew::{
  Callback,
  Html,
  TargetCast,
  function_component,
  html,
  use_effect_with,
  use_force_update,
  use_mut_ref,
  use_state
};

use crate::api::{
  invoke_tauri,
  invoke_tauri_without_args,
  ui_log
};
use crate::components::{
  TaskEditor,
  TaskList
};

type SharedBoard = Rc<RefCell<Board>>;

#[function_component(App)]
pub fn app() -> Html {
  let board: SharedBoard = use_mut_ref(|| {
    Board::new(DEFAULT_COMPLETED_BY)
  });
  let settings =
    use_state(AppSettingsDto::default);
  let redraw = use_force_update();

  {
    let board = board.clone();
    let settings = settings.clone();
    let redraw = redraw.clone();
    use_effect_with((), move |_| {
      wasm_bindgen_futures::spawn_local(
        async move {
          match invoke_tauri_without_args::<
            AppSettingsDto
          >("app_settings")
          .await
          {
            | Ok(loaded) => {
              board.borrow_mut().completed_by =
                loaded
                  .default_completed_by
                  .clone();
              settings.set(loaded);
            }
            | Err(err) => tracing::error!(error = %err, "app_settings failed")
          }

          match invoke_tauri_without_args::<
            Vec<Category>
          >("categories_list")
          .await
          {
            | Ok(categories) => {
              ui_debug(
                "categories_loaded",
                &categories.len().to_string()
              );
              board
                .borrow_mut()
                .set_categories(categories);
            }
            | Err(err) => tracing::error!(error = %err, "categories_list failed")
          }

          reload_tasks(board, redraw).await;
        }
      );
      || ()
    });
  }

  let on_filter = {
    let board = board.clone();
    let redraw = redraw.clone();
    Callback::from(
      move |e: web_sys::Event| {
        let select: HtmlSelectElement =
          e.target_unchecked_into();
        let filter =
          CategoryFilter::from_key(
            &select.value()
          );
        ui_debug(
          "filter_changed",
          &filter.as_key()
        );
        board.borrow_mut().filter = filter;
        redraw.force_update();
      }
    )
  };

  let on_completed_by = {
    let board = board.clone();
    let redraw = redraw.clone();
    Callback::from(move |choice: String| {
      board.borrow_mut().completed_by =
        choice;
      redraw.force_update();
    })
  };

  let on_toggle_add = {
    let board = board.clone();
    let redraw = redraw.clone();
    Callback::from(
      move |_: yew::MouseEvent| {
        board
          .borrow_mut()
          .toggle_new_editor();
        redraw.force_update();
      }
    )
  };

  let on_complete = {
    let board = board.clone();
    let redraw = redraw.clone();
    Callback::from(move |id: Uuid| {
      let today = Local::now().date_naive();
      let Some(completion) = board
        .borrow_mut()
        .begin_complete(id, today)
      else {
        ui_debug(
          "complete_ignored",
          &id.to_string()
        );
        return;
      };
      redraw.force_update();

      let board = board.clone();
      let redraw = redraw.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          let args = TaskCompleteArgs {
            id,
            completed_by: completion
              .completed_by
          };
          let result =
            invoke_tauri::<(), _>(
              "task_complete",
              &args
            )
            .await;
          board.borrow_mut().finish_write(id);

          match result {
            | Ok(()) => {
              reload_tasks(board, redraw)
                .await
            }
            | Err(err) => {
              tracing::error!(error = %err, %id, "task_complete failed");
              redraw.force_update();
            }
          }
        }
      );
    })
  };

  let on_edit = {
    let board = board.clone();
    let redraw = redraw.clone();
    Callback::from(move |task: Task| {
      if board.borrow_mut().open_editor(&task) {
        ui_debug("edit_opened", &task.name);
        redraw.force_update();
      } else {
        ui_debug(
          "edit_ignored",
          "write in flight"
        );
      }
    })
  };

  let on_form_change = {
    let board = board.clone();
    let redraw = redraw.clone();
    Callback::from(move |form: TaskForm| {
      if let Some(current) =
        board.borrow_mut().editor_form_mut()
      {
        *current = form;
      }
      redraw.force_update();
    })
  };

  let on_close = {
    let board = board.clone();
    let redraw = redraw.clone();
    Callback::from(move |()| {
      if !board.borrow_mut().close_editor() {
        ui_debug(
          "close_ignored",
          "write in flight"
        );
      }
      redraw.force_update();
    })
  };

  let on_submit = {
    let board = board.clone();
    let redraw = redraw.clone();
    Callback::from(move |()| {
      let submission =
        board.borrow_mut().begin_save();
      redraw.force_update();

      let submission = match submission {
        | Ok(Some(submission)) => submission,
        | Ok(None) => return,
        | Err(err) => {
          ui_debug(
            "form_invalid",
            &err.to_string()
          );
          return;
        }
      };

      let board = board.clone();
      let redraw = redraw.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          let target = submission.target();
          let result = match submission {
            | Submission::Insert(fields) => {
              invoke_tauri::<(), _>(
                "task_create",
                &TaskCreateArgs { fields }
              )
              .await
            }
            | Submission::Update {
              id,
              fields
            } => {
              invoke_tauri::<(), _>(
                "task_update",
                &TaskUpdateArgs { id, fields }
              )
              .await
            }
          };

          finish_editor_write(
            board, redraw, target, result
          )
          .await;
        }
      );
    })
  };

  let on_delete = {
    let board = board.clone();
    let redraw = redraw.clone();
    Callback::from(move |()| {
      let deletable = board
        .borrow()
        .editor()
        .is_some_and(|editor| {
          editor.form.is_edit()
            && !editor.busy
        });
      if !deletable {
        return;
      }

      let confirmed = web_sys::window()
        .and_then(|window| {
          window
            .confirm_with_message(
              "Are you sure you want to \
               delete this task?"
            )
            .ok()
        })
        .unwrap_or(false);
      if !confirmed {
        ui_debug(
          "delete_cancelled",
          "user declined"
        );
        return;
      }

      let Some(id) =
        board.borrow_mut().begin_delete()
      else {
        return;
      };
      redraw.force_update();

      let board = board.clone();
      let redraw = redraw.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          let result =
            invoke_tauri::<(), _>(
              "task_delete",
              &TaskIdArg { id }
            )
            .await;
          finish_editor_write(
            board,
            redraw,
            Some(id),
            result
          )
          .await;
        }
      );
    })
  };

  let snapshot = board.borrow().clone();
  let visible = snapshot.visible_tasks();
  let writing: BTreeSet<Uuid> = snapshot
    .tasks
    .iter()
    .filter(|task| {
      snapshot.is_writing(task.id)
    })
    .map(|task| task.id)
    .collect();
  let filter_key = snapshot.filter.as_key();
  let editor_open =
    snapshot.editor().is_some();

  html! {
      <div class="app">
          <div class="toolbar">
              <h1>{ "Household Chores" }</h1>
              <div class="field inline">
                  <label>{ "Category" }</label>
                  <select onchange={on_filter}>
                      <option value={ALL_CATEGORIES_KEY} selected={filter_key == ALL_CATEGORIES_KEY}>
                          { "All Categories" }
                      </option>
                      {
                          for snapshot.categories.iter().map(|category| {
                              let key = category.id.to_string();
                              let selected = key == filter_key;
                              html! { <option value={key} selected={selected}>{ &category.name }</option> }
                          })
                      }
                  </select>
              </div>
              <div class="field inline completed-by">
                  <label>{ "Completed by" }</label>
                  {
                      for settings.completed_by_choices.iter().cloned().map(|choice| {
                          let checked = choice == snapshot.completed_by;
                          let on_completed_by = on_completed_by.clone();
                          let value = choice.clone();
                          html! {
                              <label class="radio">
                                  <input
                                      type="radio"
                                      name="completed-by"
                                      value={choice.clone()}
                                      checked={checked}
                                      onchange={move |_| on_completed_by.emit(value.clone())}
                                  />
                                  { choice }
                              </label>
                          }
                      })
                  }
              </div>
              <button type="button" class="btn" onclick={on_toggle_add}>
                  { if editor_open { "Close Editor" } else { "Add Task" } }
              </button>
          </div>

          {
              if snapshot.loading {
                  html! { <div class="loading">{ "Loading tasks..." }</div> }
              } else {
                  html! {
                      <TaskList
                          tasks={visible}
                          categories={snapshot.categories.clone()}
                          writing={writing}
                          today={Local::now().date_naive()}
                          on_complete={on_complete}
                          on_edit={on_edit}
                      />
                  }
              }
          }

          {
              match snapshot.editor() {
                  Some(editor) => html! {
                      <TaskEditor
                          editor={editor.clone()}
                          categories={snapshot.categories.clone()}
                          on_change={on_form_change}
                          on_submit={on_submit}
                          on_delete={on_delete}
                          on_close={on_close}
                      />
                  },
                  None => html! {},
              }
          }
      </div>
  }
}

async fn reload_tasks(
  board: SharedBoard,
  redraw: UseForceUpdateHandle
) {
  let result = invoke_tauri_without_args::<
    Vec<Task>
  >("tasks_list")
  .await;

  match result {
    | Ok(tasks) => {
      tracing::debug!(
        total = tasks.len(),
        "refreshed task snapshot"
      );
      board.borrow_mut().set_tasks(tasks);
    }
    | Err(err) => {
      tracing::error!(error = %err, "tasks_list failed");
      board.borrow_mut().load_failed();
    }
  }
  redraw.force_update();
}

/// Closes the editor and reloads after a
/// successful save or delete; keeps it
/// open with the error otherwise.
async fn finish_editor_write(
  board: SharedBoard,
  redraw: UseForceUpdateHandle,
  target: Option<Uuid>,
  result: Result<(), String>
) {
  match result {
    | Ok(()) => {
      board
        .borrow_mut()
        .editor_write_succeeded(target);
      reload_tasks(board, redraw).await;
    }
    | Err(err) => {
      tracing::error!(error = %err, "task write failed");
      ui_log("task_write_failed", &err).await;
      board
        .borrow_mut()
        .editor_write_failed(target, err);
      redraw.force_update();
    }
  }
}

fn ui_debug(
  event: &str,
  detail: &str
) {
  tracing::debug!(
    event, detail, "ui-debug"
  );
  log!(format!(
    "[ui-debug] {event}: {detail}"
  ));
}
