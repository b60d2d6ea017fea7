//! On-disk copy of the status cache (`~/.cache/ollama-bar/status.json`).
//!
//! One-shot `status` invocations from a status bar each run in a fresh process; seeding the
//! cache from the previous snapshot keeps the TTL and debounce windows meaningful across them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::core::models::ModelInfo;
use crate::core::paths;

use super::{LoadedModel, ServerState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Host the record describes; a snapshot for another host is ignored.
    pub host: String,
    pub catalog: Vec<ModelInfo>,
    /// Milliseconds since the Unix epoch.
    pub catalog_fetched_at: Option<u64>,
    pub server_state: ServerState,
    pub loaded_model: LoadedModel,
    /// Milliseconds since the Unix epoch.
    pub status_checked_at: Option<u64>,
}

pub fn snapshot_path() -> Option<PathBuf> {
    paths::cache_dir().map(|d| d.join("status.json"))
}

/// Load the snapshot for `host`. Missing, unreadable, or foreign snapshots yield `None`.
pub fn load_snapshot(path: &Path, host: &str) -> Option<Snapshot> {
    let data = fs::read_to_string(path).ok()?;
    let snap: Snapshot = match serde_json::from_str(&data) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("Ignoring corrupt status snapshot {}: {}", path.display(), e);
            return None;
        }
    };
    if snap.host != host {
        log::debug!("Status snapshot is for {}, not {}", snap.host, host);
        return None;
    }
    Some(snap)
}

/// Write the snapshot atomically (per-process temp file + rename). Creates the cache dir if
/// needed.
pub fn save_snapshot(path: &Path, snap: &Snapshot) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(snap)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let tmp = tmp_path(path);
    fs::write(&tmp, json)?;
    fs::rename(tmp, path)
}

/// Per-process temp file next to `path`, so concurrent writers never share one.
fn tmp_path(path: &Path) -> PathBuf {
    path.with_extension(format!("{}.tmp", std::process::id()))
}

pub(super) fn to_millis(t: SystemTime) -> Option<u64> {
    t.duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_millis() as u64)
}

pub(super) fn from_millis(ms: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_millis(ms)
}
