/// Viewport width (CSS px) below which
/// the task list renders as cards.
pub const VIEWPORT_BREAKPOINT_PX: f64 =
  768.0;

/// Terminal width (columns) below which
/// the CLI prints cards.
pub const TERMINAL_BREAKPOINT_COLUMNS: f64 =
  100.0;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Layout {
  Table,
  Cards
}

impl Layout {
  pub fn for_width(
    width: f64,
    breakpoint: f64
  ) -> Self {
    if width < breakpoint {
      Self::Cards
    } else {
      Self::Table
    }
  }

  pub fn for_viewport(width_px: f64) -> Self {
    Self::for_width(
      width_px,
      VIEWPORT_BREAKPOINT_PX
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn breakpoint_is_exclusive_for_cards() {
    assert_eq!(
      Layout::for_viewport(767.0),
      Layout::Cards
    );
    assert_eq!(
      Layout::for_viewport(768.0),
      Layout::Table
    );
    assert_eq!(
      Layout::for_width(
        80.0,
        TERMINAL_BREAKPOINT_COLUMNS
      ),
      Layout::Cards
    );
  }
}
