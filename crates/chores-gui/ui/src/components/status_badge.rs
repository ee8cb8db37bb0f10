use chores_shared::DueState;
use yew::{
  Html,
  Properties,
  classes,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct StatusBadgeProps {
  pub state: DueState
}

#[function_component(StatusBadge)]
pub fn status_badge(
  props: &StatusBadgeProps
) -> Html {
  html! {
      <span
          class={classes!("status-badge", props.state.css_class())}
          style={format!("background-color:{};", props.state.color())}
      >
          { props.state.label() }
      </span>
  }
}
