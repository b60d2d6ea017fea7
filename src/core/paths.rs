//! Centralized path helpers for config, cache, and data directories.

use std::path::PathBuf;

use crate::core::app;

/// Project directories (config, cache, data) from the standard platform locations.
pub fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("io", app::VENDOR, app::NAME)
}

/// Config directory (~/.config/ollama-bar/).
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().to_path_buf())
}

/// Config file path. `OLLAMA_BAR_CONFIG` overrides the default location.
pub fn config_file() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("OLLAMA_BAR_CONFIG")
        && !p.trim().is_empty()
    {
        return Some(expand_home(p.trim()));
    }
    config_dir().map(|d| d.join("config.json"))
}

/// Cache directory (~/.cache/ollama-bar/).
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|d| d.cache_dir().to_path_buf())
}

/// Default session directory (~/.local/share/ollama-bar/sessions/).
pub fn default_session_dir() -> Option<PathBuf> {
    project_dirs().map(|d| d.data_dir().join("sessions"))
}

/// User home directory.
pub fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf())
}

/// Expand a leading `~/` to the home directory. Other paths are returned as-is.
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from(path));
    }
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}
