//! Saved sessions: `<model>_<timestamp>.json` files in the session directory.
//!
//! Only the newest [`MAX_SESSIONS`] files are kept; older ones are pruned after each
//! recording. Nothing reads session contents back. Resume only looks at file names: the model is the
//! part of the file stem before the first `_`. Model names that contain `_` therefore
//! resolve to a truncated name.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use serde::Serialize;

/// Extension of session files.
pub const SESSION_EXTENSION: &str = "json";

/// Resume picker shows at most this many entries.
pub const MAX_SESSIONS: usize = 20;

/// A session file found on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionEntry {
    pub path: PathBuf,
    /// File stem, used as the picker label.
    pub derived_name: String,
}

impl SessionEntry {
    /// Model to relaunch, derived from the label.
    pub fn model(&self) -> &str {
        model_from_label(&self.derived_name)
    }
}

#[derive(Serialize)]
struct SessionRecord<'a> {
    model: &'a str,
    host: &'a str,
    started_at: String,
}

/// Substring before the first `_` ("llama3.2_2024-01-01" -> "llama3.2").
pub fn model_from_label(label: &str) -> &str {
    label.split_once('_').map(|(model, _)| model).unwrap_or(label)
}

/// List session files, newest first (by modification time), capped at [`MAX_SESSIONS`].
/// A missing directory is an empty list.
pub fn list_sessions(dir: &Path) -> io::Result<Vec<SessionEntry>> {
    let mut entries = scan_sessions(dir)?;
    entries.truncate(MAX_SESSIONS);
    Ok(entries)
}

/// Delete session files beyond the newest `keep`. Returns how many were removed.
pub fn prune_sessions(dir: &Path, keep: usize) -> io::Result<usize> {
    let stale = scan_sessions(dir)?.into_iter().skip(keep);
    let mut removed = 0;
    for entry in stale {
        fs::remove_file(&entry.path)?;
        log::debug!("Pruned session {}", entry.path.display());
        removed += 1;
    }
    Ok(removed)
}

/// Every session file in `dir`, newest first.
fn scan_sessions(dir: &Path) -> io::Result<Vec<SessionEntry>> {
    let read = match fs::read_dir(dir) {
        Ok(r) => r,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(vec![]),
        Err(e) => return Err(e),
    };

    let mut found: Vec<(SystemTime, SessionEntry)> = Vec::new();
    for entry in read {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(SESSION_EXTENSION) {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let meta = entry.metadata()?;
        if !meta.is_file() {
            continue;
        }
        let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        found.push((
            modified,
            SessionEntry {
                derived_name: stem.to_string(),
                path,
            },
        ));
    }

    found.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| b.1.derived_name.cmp(&a.1.derived_name))
    });
    Ok(found.into_iter().map(|(_, entry)| entry).collect())
}

/// File name for a session started at `started`. Path separators in the model name become `-`.
pub fn session_file_name(model: &str, started: &DateTime<Local>) -> String {
    let safe: String = model
        .chars()
        .map(|c| if c == '/' || c == '\\' { '-' } else { c })
        .collect();
    format!(
        "{}_{}.{}",
        safe,
        started.format("%Y-%m-%dT%H-%M-%S"),
        SESSION_EXTENSION
    )
}

/// Write a session record, creating the directory (and parents) on demand.
pub fn record_session(
    dir: &Path,
    model: &str,
    host: &str,
    started: &DateTime<Local>,
) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(session_file_name(model, started));
    let record = SessionRecord {
        model,
        host,
        started_at: started.to_rfc3339(),
    };
    let json = serde_json::to_string_pretty(&record)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&path, json)?;
    Ok(path)
}
