use std::collections::BTreeSet;

use chores_shared::{
  Category,
  Task,
  category_label
};
use chrono::NaiveDate;
use uuid::Uuid;
use yew::{
  Callback,
  Html,
  Properties,
  classes,
  function_component,
  html
};

use super::StatusBadge;
use super::task_table::date_or_dash;

#[derive(Properties, PartialEq)]
pub struct TaskCardsProps {
  pub tasks:       Vec<Task>,
  pub categories:  Vec<Category>,
  pub writing:     BTreeSet<Uuid>,
  pub today:       NaiveDate,
  pub on_complete: Callback<Uuid>,
  pub on_edit:     Callback<Task>
}

#[function_component(TaskCards)]
pub fn task_cards(
  props: &TaskCardsProps
) -> Html {
  html! {
      <div class="task-cards">
          {
              for props.tasks.iter().map(|task| {
                  let state = task.due_state(props.today);
                  let id = task.id;
                  let busy = props.writing.contains(&id);
                  let on_complete = props.on_complete.clone();
                  let on_edit = props.on_edit.clone();
                  let edit_task = task.clone();
                  html! {
                      <div
                          key={id.to_string()}
                          class={classes!("task-card", state.css_class())}
                          style={format!("background-color:{};", state.color())}
                      >
                          <div class="card-title">{ &task.name }</div>
                          {
                              match &task.description {
                                  Some(description) => html! { <div class="card-subtitle">{ description }</div> },
                                  None => html! {},
                              }
                          }
                          <div class="card-line">{ format!("Every {} days", task.frequency_days) }</div>
                          <div class="card-line">{ format!("Last completed: {}", date_or_dash(task.last_completed)) }</div>
                          <div class="card-line">{ "Status: " }<StatusBadge state={state} /></div>
                          <div class="card-line">
                              { format!("Category: {}", category_label(&props.categories, task.category_id)) }
                          </div>
                          {
                              match &task.completed_by {
                                  Some(by) => html! { <div class="card-line">{ format!("Completed by: {by}") }</div> },
                                  None => html! {},
                              }
                          }
                          <div class="card-actions">
                              <button
                                  type="button"
                                  class="btn"
                                  disabled={busy}
                                  onclick={move |_| on_complete.emit(id)}
                              >
                                  { if busy { "Saving..." } else { "Complete" } }
                              </button>
                              <button
                                  type="button"
                                  class="btn secondary"
                                  onclick={move |_| on_edit.emit(edit_task.clone())}
                              >
                                  { "Edit" }
                              </button>
                          </div>
                      </div>
                  }
              })
          }
      </div>
  }
}
