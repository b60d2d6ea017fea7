//! Status-bar presentation: styled segments for the status block and the date/time block.
//!
//! Everything here is pure; rendering segments is the host's job. The `render` helpers cover
//! the hosts the CLI talks to directly (plain text, ANSI terminals, tmux, JSON consumers).

use chrono::{Datelike, Timelike, Weekday};
use crossterm::style::{Color, Stylize};
use serde::Serialize;

use crate::core::config::Palette;
use crate::core::models::display_name;
use crate::core::status::ServerState;

const DOT_RUNNING: &str = "● ";
const LOADING: &str = "◌ loading";
const OFF: &str = "○ off";
const IDLE: &str = "idle";
const TIME_SEPARATOR: &str = " │ ";

/// One styled span: a `#rrggbb` foreground color and literal text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub color: String,
    pub text: String,
}

impl Segment {
    fn new(color: &str, text: impl Into<String>) -> Self {
        Self {
            color: color.to_string(),
            text: text.into(),
        }
    }
}

/// Output flavor for the CLI status commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Text only, no colors
    Plain,
    /// 24-bit ANSI escape sequences
    Ansi,
    /// tmux `#[fg=...]` style markup
    Tmux,
    /// JSON array of {color, text}
    Json,
}

/// Map server state and loaded model to the status block.
pub fn format_status(
    state: ServerState,
    loaded: Option<&str>,
    palette: &Palette,
    icon: &str,
) -> Vec<Segment> {
    let mut segments = vec![Segment::new(&palette.icon, format!("{} ", icon))];
    match (state, loaded) {
        (ServerState::Running, Some(model)) => {
            segments.push(Segment::new(&palette.running, DOT_RUNNING));
            segments.push(Segment::new(&palette.text, display_name(model)));
        }
        (ServerState::Running, None) => {
            segments.push(Segment::new(&palette.running, DOT_RUNNING));
            segments.push(Segment::new(&palette.separator, IDLE));
        }
        (ServerState::Loading, _) => segments.push(Segment::new(&palette.loading, LOADING)),
        (ServerState::Stopped | ServerState::Unknown, _) => {
            segments.push(Segment::new(&palette.stopped, OFF))
        }
    }
    segments
}

/// Trailing block: separator, then the date/time.
pub fn format_time_segments<T: Datelike + Timelike>(now: &T, palette: &Palette) -> Vec<Segment> {
    vec![
        Segment::new(&palette.separator, TIME_SEPARATOR),
        Segment::new(&palette.text, format_datetime(now)),
    ]
}

/// "Fri 2:30p": weekday, 12-hour clock, zero-padded minutes, single-letter meridiem.
pub fn format_datetime<T: Datelike + Timelike>(now: &T) -> String {
    let hour = now.hour();
    let hour12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    let meridiem = if hour < 12 { 'a' } else { 'p' };
    format!(
        "{} {}:{:02}{}",
        weekday_abbrev(now.weekday()),
        hour12,
        now.minute(),
        meridiem
    )
}

fn weekday_abbrev(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Render segments for a host.
pub fn render(segments: &[Segment], format: OutputFormat) -> String {
    match format {
        OutputFormat::Plain => segments.iter().map(|s| s.text.as_str()).collect(),
        OutputFormat::Ansi => segments
            .iter()
            .map(|s| match parse_hex(&s.color) {
                Some(color) => s.text.as_str().with(color).to_string(),
                None => s.text.clone(),
            })
            .collect(),
        OutputFormat::Tmux => {
            let mut out: String = segments
                .iter()
                .map(|s| format!("#[fg={}]{}", s.color, s.text.replace('#', "##")))
                .collect();
            if !out.is_empty() {
                out.push_str("#[default]");
            }
            out
        }
        OutputFormat::Json => serde_json::to_string(segments).unwrap_or_else(|e| {
            log::warn!("Failed to encode segments: {}", e);
            "[]".to_string()
        }),
    }
}

fn parse_hex(color: &str) -> Option<Color> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}
