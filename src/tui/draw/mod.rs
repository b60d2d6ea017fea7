//! TUI rendering.

mod picker;

pub(super) use picker::draw_picker;
