use chores_shared::Layout;
use chores_shared::layout::VIEWPORT_BREAKPOINT_PX;
use gloo::events::EventListener;
use yew::{
  hook,
  use_effect_with,
  use_state_eq
};

fn viewport_width() -> f64 {
  web_sys::window()
    .and_then(|window| {
      window.inner_width().ok()
    })
    .and_then(|width| width.as_f64())
    .unwrap_or(VIEWPORT_BREAKPOINT_PX)
}

/// Table or cards for the current window
/// width, recomputed on every resize.
#[hook]
pub fn use_viewport_layout() -> Layout {
  let layout = use_state_eq(|| {
    Layout::for_viewport(viewport_width())
  });

  {
    let layout = layout.clone();
    use_effect_with((), move |_| {
      let listener =
        web_sys::window().map(|window| {
          EventListener::new(
            &window,
            "resize",
            move |_| {
              layout.set(
                Layout::for_viewport(
                  viewport_width()
                )
              );
            }
          )
        });
      move || drop(listener)
    });
  }

  *layout
}
