//! Cached view of the daemon: reachability, loaded model, and model catalog.
//!
//! Callers may ask at any rate (every status-bar repaint). The catalog is refreshed at most
//! once per TTL and the running-model probe at most once per debounce interval; everything
//! else is served from the cache.

mod snapshot;

pub use snapshot::{Snapshot, load_snapshot, save_snapshot, snapshot_path};

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::core::config::ResolvedConfig;
use crate::core::extract;
use crate::core::models::ModelInfo;
use crate::core::probe::Probe;

/// Daemon reachability as last observed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerState {
    /// No probe has completed yet.
    #[default]
    Unknown,
    Running,
    /// Reserved; no probe outcome maps to it.
    #[allow(dead_code)]
    Loading,
    Stopped,
}

/// Name of the first loaded model, tag suffix included.
pub type LoadedModel = Option<String>;

/// The cache record plus the probe that refreshes it. Owned by whoever wires the system;
/// there is no global instance.
pub struct StatusCache<P: Probe> {
    probe: P,
    catalog_ttl: Duration,
    status_debounce: Duration,
    catalog: Arc<[ModelInfo]>,
    catalog_fetched_at: Option<SystemTime>,
    server_state: ServerState,
    loaded_model: LoadedModel,
    status_checked_at: Option<SystemTime>,
}

impl<P: Probe> StatusCache<P> {
    pub fn new(probe: P, catalog_ttl: Duration, status_debounce: Duration) -> Self {
        Self {
            probe,
            catalog_ttl,
            status_debounce,
            catalog: Arc::from(Vec::new()),
            catalog_fetched_at: None,
            server_state: ServerState::Unknown,
            loaded_model: None,
            status_checked_at: None,
        }
    }

    pub fn from_config(probe: P, config: &ResolvedConfig) -> Self {
        Self::new(probe, config.catalog_ttl, config.status_debounce)
    }

    /// Catalog, probing only when the cached one is empty or older than the TTL.
    ///
    /// A failed probe marks the server stopped but keeps the previous catalog.
    pub fn get_catalog(&mut self, now: SystemTime) -> Arc<[ModelInfo]> {
        if !self.catalog.is_empty() && is_fresh(self.catalog_fetched_at, now, self.catalog_ttl) {
            return Arc::clone(&self.catalog);
        }

        let outcome = self.probe.catalog();
        if outcome.ok {
            let models = extract::extract_catalog(&outcome.body);
            log::debug!("Catalog refreshed: {} model(s)", models.len());
            self.catalog = Arc::from(models);
            self.catalog_fetched_at = Some(now);
            self.set_server_state(ServerState::Running);
        } else {
            self.set_server_state(ServerState::Stopped);
        }
        Arc::clone(&self.catalog)
    }

    /// Server state and loaded model, probing at most once per debounce interval.
    ///
    /// The check time advances even when the probe fails, so an unreachable daemon is
    /// not probed on every call.
    pub fn get_status(&mut self, now: SystemTime) -> (ServerState, LoadedModel) {
        if is_fresh(self.status_checked_at, now, self.status_debounce) {
            return (self.server_state, self.loaded_model.clone());
        }

        let outcome = self.probe.running();
        let (state, loaded) = if outcome.ok {
            let first = extract::extract_running_names(&outcome.body).into_iter().next();
            (ServerState::Running, first)
        } else {
            (ServerState::Stopped, None)
        };
        self.set_server_state(state);
        self.loaded_model = loaded;
        self.status_checked_at = Some(now);
        (self.server_state, self.loaded_model.clone())
    }

    #[cfg(test)]
    pub(crate) fn server_state(&self) -> ServerState {
        self.server_state
    }

    /// Serializable copy of the record, tagged with the host it describes.
    pub fn snapshot(&self, host: &str) -> Snapshot {
        Snapshot {
            host: host.to_string(),
            catalog: self.catalog.to_vec(),
            catalog_fetched_at: self.catalog_fetched_at.and_then(snapshot::to_millis),
            server_state: self.server_state,
            loaded_model: self.loaded_model.clone(),
            status_checked_at: self.status_checked_at.and_then(snapshot::to_millis),
        }
    }

    /// Seed the record from a snapshot taken by an earlier process.
    pub fn restore(&mut self, snap: Snapshot) {
        self.catalog = Arc::from(snap.catalog);
        self.catalog_fetched_at = snap.catalog_fetched_at.map(snapshot::from_millis);
        self.server_state = snap.server_state;
        self.loaded_model = snap.loaded_model;
        self.status_checked_at = snap.status_checked_at.map(snapshot::from_millis);
    }

    fn set_server_state(&mut self, state: ServerState) {
        if state != self.server_state {
            log::info!("Server state {:?} -> {:?}", self.server_state, state);
        }
        self.server_state = state;
    }

    #[cfg(test)]
    pub(crate) fn probe(&self) -> &P {
        &self.probe
    }
}

/// True when `stamp` is set and `now` is less than `window` past it. A clock that moved
/// backwards counts as stale.
fn is_fresh(stamp: Option<SystemTime>, now: SystemTime, window: Duration) -> bool {
    stamp
        .and_then(|t| now.duration_since(t).ok())
        .is_some_and(|age| age < window)
}
