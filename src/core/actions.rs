//! Interactive workflows: pick-and-run a model, quick chat, resume a saved session.
//!
//! Each workflow gathers its data, shows a notice and stops when there is nothing to offer,
//! otherwise presents a fuzzy choice list and launches the chosen model. The host supplies
//! the picker, the notice surface, and the launcher.

use std::fmt;
use std::time::SystemTime;

use chrono::Local;

use crate::core::config::ResolvedConfig;
use crate::core::launch::{LaunchError, LaunchRequest};
use crate::core::probe::Probe;
use crate::core::sessions;
use crate::core::status::StatusCache;

/// Transient, dismissible user-facing message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    NoModels,
    NoSessions,
    SessionsDisabled,
    LaunchFailed(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NoModels => write!(f, "No models available (is ollama running?)"),
            Notice::NoSessions => write!(f, "No saved sessions"),
            Notice::SessionsDisabled => {
                write!(f, "Session saving is disabled (features.save_sessions)")
            }
            Notice::LaunchFailed(e) => write!(f, "Could not start session: {}", e),
        }
    }
}

/// What the host provides to the workflows.
pub trait Host {
    /// Show a transient notice.
    fn notify(&mut self, notice: &Notice);
    /// Present a fuzzy choice list; `None` when dismissed.
    fn choose(&mut self, title: &str, labels: &[String]) -> Option<usize>;
    /// Start an interactive session.
    fn launch(&mut self, request: &LaunchRequest) -> Result<(), LaunchError>;
}

/// How a workflow ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    Launched(String),
    Cancelled,
    Notified(Notice),
}

/// Model selector: choose from the catalog and run the chosen model.
pub fn select_model<P: Probe, H: Host>(
    cache: &mut StatusCache<P>,
    config: &ResolvedConfig,
    host: &mut H,
    now: SystemTime,
) -> ActionOutcome {
    let catalog = cache.get_catalog(now);
    if catalog.is_empty() {
        return notify(host, Notice::NoModels);
    }
    let labels: Vec<String> = catalog.iter().map(|m| m.label()).collect();
    match host.choose("Select model", &labels) {
        Some(i) => match catalog.get(i) {
            Some(model) => launch_model(config, host, &model.name),
            None => ActionOutcome::Cancelled,
        },
        None => ActionOutcome::Cancelled,
    }
}

/// Quick chat: run the configured default model, or fall back to the selector.
pub fn quick_chat<P: Probe, H: Host>(
    cache: &mut StatusCache<P>,
    config: &ResolvedConfig,
    host: &mut H,
    now: SystemTime,
) -> ActionOutcome {
    match config.default_model.as_deref() {
        Some(model) => launch_model(config, host, model),
        None => select_model(cache, config, host, now),
    }
}

/// Session resume: choose a saved session and run the model named by its label.
pub fn resume_session<H: Host>(config: &ResolvedConfig, host: &mut H) -> ActionOutcome {
    if !config.features.save_sessions {
        return notify(host, Notice::SessionsDisabled);
    }
    let entries = sessions::list_sessions(&config.session_dir).unwrap_or_else(|e| {
        log::warn!(
            "Failed to list sessions in {}: {}",
            config.session_dir.display(),
            e
        );
        vec![]
    });
    if entries.is_empty() {
        return notify(host, Notice::NoSessions);
    }
    let labels: Vec<String> = entries.iter().map(|s| s.derived_name.clone()).collect();
    match host.choose("Resume session", &labels) {
        Some(i) => match entries.get(i) {
            Some(entry) => launch_model(config, host, entry.model()),
            None => ActionOutcome::Cancelled,
        },
        None => ActionOutcome::Cancelled,
    }
}

/// Record the session (when enabled), prune old ones, and launch it.
fn launch_model<H: Host>(config: &ResolvedConfig, host: &mut H, model: &str) -> ActionOutcome {
    if config.features.save_sessions {
        record_session(config, model);
    }

    let request = LaunchRequest::new(&config.executable, model);
    match host.launch(&request) {
        Ok(()) => ActionOutcome::Launched(model.to_string()),
        Err(e) => notify(host, Notice::LaunchFailed(e.to_string())),
    }
}

fn record_session(config: &ResolvedConfig, model: &str) {
    let dir = &config.session_dir;
    if let Err(e) = sessions::record_session(dir, model, &config.host, &Local::now()) {
        log::warn!("Failed to record session for {}: {}", model, e);
        return;
    }
    if let Err(e) = sessions::prune_sessions(dir, sessions::MAX_SESSIONS) {
        log::warn!("Failed to prune sessions in {}: {}", dir.display(), e);
    }
}

fn notify<H: Host>(host: &mut H, notice: Notice) -> ActionOutcome {
    log::info!("{}", notice);
    host.notify(&notice);
    ActionOutcome::Notified(notice)
}

#[cfg(test)]
mod tests;
