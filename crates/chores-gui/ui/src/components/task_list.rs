use std::collections::BTreeSet;

use chores_shared::{
  Category,
  Layout,
  SortColumn,
  SortState,
  Task,
  sort_tasks
};
use chrono::NaiveDate;
use uuid::Uuid;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html,
  use_memo,
  use_state
};

use super::{
  TaskCards,
  TaskTable
};
use crate::hooks::use_viewport_layout;

#[derive(Properties, PartialEq)]
pub struct TaskListProps {
  pub tasks:       Vec<Task>,
  pub categories:  Vec<Category>,
  pub writing:     BTreeSet<Uuid>,
  pub today:       NaiveDate,
  pub on_complete: Callback<Uuid>,
  pub on_edit:     Callback<Task>
}

/// Owns the sort state and picks table
/// or cards from the viewport.
#[function_component(TaskList)]
pub fn task_list(
  props: &TaskListProps
) -> Html {
  let sort = use_state(SortState::default);
  let layout = use_viewport_layout();

  let sorted = use_memo(
    (
      props.tasks.clone(),
      props.categories.clone(),
      *sort
    ),
    |(tasks, categories, sort)| {
      sort_tasks(tasks, categories, *sort)
    }
  );

  let on_sort = {
    let sort = sort.clone();
    Callback::from(
      move |column: SortColumn| {
        sort.set(sort.toggled(column));
      }
    )
  };

  if sorted.is_empty() {
    return html! {
        <div class="empty">{ "No tasks yet." }</div>
    };
  }

  match layout {
    | Layout::Table => html! {
        <TaskTable
            tasks={(*sorted).clone()}
            categories={props.categories.clone()}
            writing={props.writing.clone()}
            today={props.today}
            sort={*sort}
            on_sort={on_sort}
            on_complete={props.on_complete.clone()}
            on_edit={props.on_edit.clone()}
        />
    },
    | Layout::Cards => html! {
        <TaskCards
            tasks={(*sorted).clone()}
            categories={props.categories.clone()}
            writing={props.writing.clone()}
            today={props.today}
            on_complete={props.on_complete.clone()}
            on_edit={props.on_edit.clone()}
        />
    }
  }
}
