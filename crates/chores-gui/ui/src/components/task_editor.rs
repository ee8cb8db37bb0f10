use chores_shared::{
  Category,
  EditorState,
  TaskForm
};
use web_sys::{
  HtmlInputElement,
  HtmlSelectElement,
  HtmlTextAreaElement
};
use yew::{
  Callback,
  Html,
  Properties,
  TargetCast,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct TaskEditorProps {
  pub editor:     EditorState,
  pub categories: Vec<Category>,
  pub on_change:  Callback<TaskForm>,
  pub on_submit:  Callback<()>,
  pub on_delete:  Callback<()>,
  pub on_close:   Callback<()>
}

/// Add/edit modal. The form itself lives
/// in the root view; every input emits an
/// updated copy.
#[function_component(TaskEditor)]
pub fn task_editor(
  props: &TaskEditorProps
) -> Html {
  let form = &props.editor.form;
  let busy = props.editor.busy;

  let edit = |apply: fn(
    &mut TaskForm,
    String
  )| {
    let on_change = props.on_change.clone();
    let form = form.clone();
    move |value: String| {
      let mut next = form.clone();
      apply(&mut next, value);
      on_change.emit(next);
    }
  };

  let on_name = {
    let set = edit(|form, value| {
      form.name = value
    });
    Callback::from(
      move |e: web_sys::InputEvent| {
        let input: HtmlInputElement =
          e.target_unchecked_into();
        set(input.value());
      }
    )
  };
  let on_description = {
    let set = edit(|form, value| {
      form.description = value
    });
    Callback::from(
      move |e: web_sys::InputEvent| {
        let input: HtmlTextAreaElement =
          e.target_unchecked_into();
        set(input.value());
      }
    )
  };
  let on_frequency = {
    let set = edit(|form, value| {
      form.frequency_days = value
    });
    Callback::from(
      move |e: web_sys::InputEvent| {
        let input: HtmlInputElement =
          e.target_unchecked_into();
        set(input.value());
      }
    )
  };
  let on_category = {
    let set = edit(|form, value| {
      form.set_category_key(&value)
    });
    Callback::from(
      move |e: web_sys::Event| {
        let select: HtmlSelectElement =
          e.target_unchecked_into();
        set(select.value());
      }
    )
  };
  let on_last_completed = {
    let set = edit(|form, value| {
      if let Err(err) =
        form.set_last_completed(&value)
      {
        tracing::warn!(error = %err, "ignoring unparseable date input");
      }
    });
    Callback::from(
      move |e: web_sys::Event| {
        let input: HtmlInputElement =
          e.target_unchecked_into();
        set(input.value());
      }
    )
  };

  let on_submit = {
    let on_submit =
      props.on_submit.clone();
    Callback::from(
      move |e: web_sys::SubmitEvent| {
        e.prevent_default();
        on_submit.emit(());
      }
    )
  };
  let on_close = {
    let on_close = props.on_close.clone();
    Callback::from(
      move |_: yew::MouseEvent| {
        on_close.emit(())
      }
    )
  };
  let on_delete = {
    let on_delete =
      props.on_delete.clone();
    Callback::from(
      move |_: yew::MouseEvent| {
        on_delete.emit(())
      }
    )
  };

  let category_key = form
    .category_id
    .map(|id| id.to_string())
    .unwrap_or_default();
  let last_completed = form
    .last_completed
    .map(|date| {
      date.format("%Y-%m-%d").to_string()
    })
    .unwrap_or_default();

  html! {
      <div class="modal-backdrop" onclick={on_close.clone()}>
          <div class="modal" onclick={Callback::from(|e: yew::MouseEvent| e.stop_propagation())}>
              <div class="header">{ form.title() }</div>
              <form class="content" onsubmit={on_submit}>
                  {
                      if let Some(err) = props.editor.error.clone() {
                          html! { <div class="form-error">{ err }</div> }
                      } else {
                          html! {}
                      }
                  }
                  <div class="field">
                      <label>{ "Task Name" }</label>
                      <input
                          value={form.name.clone()}
                          placeholder="Required"
                          required=true
                          oninput={on_name}
                      />
                  </div>
                  <div class="field">
                      <label>{ "Description" }</label>
                      <textarea
                          value={form.description.clone()}
                          placeholder="Optional details"
                          oninput={on_description}
                      />
                  </div>
                  <div class="field">
                      <label>{ "Frequency (days)" }</label>
                      <input
                          type="number"
                          min="1"
                          value={form.frequency_days.clone()}
                          required=true
                          oninput={on_frequency}
                      />
                  </div>
                  <div class="field">
                      <label>{ "Category" }</label>
                      <select onchange={on_category}>
                          <option value="" selected={category_key.is_empty()}>{ "Uncategorized" }</option>
                          {
                              for props.categories.iter().map(|category| {
                                  let key = category.id.to_string();
                                  let selected = key == category_key;
                                  html! {
                                      <option value={key} selected={selected}>{ &category.name }</option>
                                  }
                              })
                          }
                      </select>
                  </div>
                  <div class="field">
                      <label>{ "Last Completed" }</label>
                      <input
                          type="date"
                          value={last_completed}
                          onchange={on_last_completed}
                      />
                  </div>
                  <div class="footer">
                      {
                          if form.is_edit() {
                              html! {
                                  <button type="button" class="btn danger" disabled={busy} onclick={on_delete}>
                                      { "Delete" }
                                  </button>
                              }
                          } else {
                              html! {}
                          }
                      }
                      <button type="button" class="btn secondary" disabled={busy} onclick={on_close}>
                          { "Cancel" }
                      </button>
                      <button type="submit" class="btn" disabled={busy}>
                          { if busy { "Saving..." } else { form.submit_label() } }
                      </button>
                  </div>
              </form>
          </div>
      </div>
  }
}
