//! TUI constants: colors and timing.

use ratatui::style::Color;

/// Accent green color (#98FB98).
pub(super) const ACCENT: Color = Color::Rgb(152, 251, 152);

/// Event poll timeout in milliseconds (picker loop).
pub(crate) const EVENT_POLL_TIMEOUT_MS: u64 = 100;
