use std::collections::BTreeSet;

use chores_shared::{
  Category,
  SortColumn,
  SortState,
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

#[derive(Properties, PartialEq)]
pub struct TaskTableProps {
  pub tasks:       Vec<Task>,
  pub categories:  Vec<Category>,
  pub writing:     BTreeSet<Uuid>,
  pub today:       NaiveDate,
  pub sort:        SortState,
  pub on_sort:     Callback<SortColumn>,
  pub on_complete: Callback<Uuid>,
  pub on_edit:     Callback<Task>
}

#[function_component(TaskTable)]
pub fn task_table(
  props: &TaskTableProps
) -> Html {
  let header = |column: SortColumn| {
    let on_sort = props.on_sort.clone();
    let active =
      props.sort.column == Some(column);
    html! {
        <th
            class={classes!("sortable", active.then_some("active"))}
            onclick={move |_| on_sort.emit(column)}
        >
            { format!("{}{}", column.header(), props.sort.indicator(column)) }
        </th>
    }
  };

  html! {
      <table class="task-table">
          <thead>
              <tr>
                  { for SortColumn::ALL.iter().copied().map(header) }
                  <th>{ "Actions" }</th>
              </tr>
          </thead>
          <tbody>
              {
                  for props.tasks.iter().map(|task| {
                      let state = task.due_state(props.today);
                      let id = task.id;
                      let busy = props.writing.contains(&id);
                      let on_complete = props.on_complete.clone();
                      let on_edit = props.on_edit.clone();
                      let edit_task = task.clone();
                      html! {
                          <tr
                              key={id.to_string()}
                              class={classes!("task-row", state.css_class())}
                              style={format!("background-color:{};", state.color())}
                          >
                              <td class="name">{ &task.name }</td>
                              <td>{ task.description.clone().unwrap_or_default() }</td>
                              <td class="numeric">{ task.frequency_days.to_string() }</td>
                              <td>{ date_or_dash(task.last_completed) }</td>
                              <td><StatusBadge state={state} /></td>
                              <td>{ category_label(&props.categories, task.category_id) }</td>
                              <td>{ task.completed_by.clone().unwrap_or_else(|| "-".to_string()) }</td>
                              <td class="actions">
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
                              </td>
                          </tr>
                      }
                  })
              }
          </tbody>
      </table>
  }
}

pub(super) fn date_or_dash(
  date: Option<NaiveDate>
) -> String {
  date
    .map(|date| {
      date.format("%Y-%m-%d").to_string()
    })
    .unwrap_or_else(|| "-".to_string())
}
