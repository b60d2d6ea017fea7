//! Configuration: typed file options resolved once into an immutable [`ResolvedConfig`].
//!
//! The file lives at `~/.config/ollama-bar/config.json` (or `OLLAMA_BAR_CONFIG`). Every key
//! is optional and nested keys fall back to their defaults one by one, so a file that only
//! sets `colors.running` keeps the other five colors.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::paths;

/// Daemon address. An IPv4 literal: the daemon may not answer on the IPv6 loopback a
/// hostname could resolve to.
pub const DEFAULT_HOST: &str = "http://127.0.0.1:11434";

/// Port assumed for a scheme-less host without one.
const DEFAULT_PORT: u16 = 11434;

/// How long a fetched catalog is served without probing again.
pub const DEFAULT_CATALOG_TTL: Duration = Duration::from_secs(60);

/// Minimum spacing between two running-model probes. Not configurable.
pub const STATUS_DEBOUNCE: Duration = Duration::from_secs(5);

pub const DEFAULT_ICON: &str = "🦙";

/// Known install locations checked before falling back to a PATH lookup.
const EXECUTABLE_CANDIDATES: &[&str] = &[
    "/usr/local/bin/ollama",
    "/opt/homebrew/bin/ollama",
    "/usr/bin/ollama",
    "~/.local/bin/ollama",
];

/// Error loading the config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// On-disk options. Everything is optional.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub host: Option<String>,
    pub executable: Option<String>,
    pub catalog_ttl_secs: Option<u64>,
    pub default_model: Option<String>,
    #[serde(default)]
    pub features: FileFeatures,
    pub session_dir: Option<String>,
    #[serde(default)]
    pub keys: FileKeys,
    #[serde(default)]
    pub colors: FilePalette,
    pub icon: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FileFeatures {
    pub show_status: Option<bool>,
    pub save_sessions: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FileKeys {
    pub select_model: Option<KeySetting>,
    pub quick_chat: Option<KeySetting>,
    pub resume_session: Option<KeySetting>,
}

/// A key binding: a key string, `true` for the default key, or `false` to disable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum KeySetting {
    Key(String),
    Toggle(bool),
}

#[derive(Debug, Default, Deserialize)]
pub struct FilePalette {
    pub icon: Option<String>,
    pub running: Option<String>,
    pub loading: Option<String>,
    pub stopped: Option<String>,
    pub text: Option<String>,
    pub separator: Option<String>,
}

/// Environment values applied on top of the file.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    /// `OLLAMA_HOST`, as understood by the daemon's own CLI (scheme optional).
    pub host: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("OLLAMA_HOST")
                .ok()
                .filter(|s| !s.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Features {
    pub show_status: bool,
    pub save_sessions: bool,
}

/// Resolved bindings; `None` means the action is not bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyBindings {
    pub select_model: Option<String>,
    pub quick_chat: Option<String>,
    pub resume_session: Option<String>,
}

/// Six named color roles, each a `#rrggbb` string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub icon: String,
    pub running: String,
    pub loading: String,
    pub stopped: String,
    pub text: String,
    pub separator: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            icon: "#98fb98".to_string(),
            running: "#50fa7b".to_string(),
            loading: "#ffb86c".to_string(),
            stopped: "#ff5555".to_string(),
            text: "#f8f8f2".to_string(),
            separator: "#6272a4".to_string(),
        }
    }
}

/// Immutable configuration snapshot shared by reference.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    pub host: String,
    pub executable: PathBuf,
    #[serde(serialize_with = "secs::serialize")]
    pub catalog_ttl: Duration,
    #[serde(serialize_with = "secs::serialize")]
    pub status_debounce: Duration,
    pub default_model: Option<String>,
    pub features: Features,
    pub keys: KeyBindings,
    pub palette: Palette,
    pub icon: String,
    pub session_dir: PathBuf,
}

mod secs {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }
}

/// Load the config file (absent file = defaults) and apply environment overrides.
pub fn load() -> Result<ResolvedConfig, ConfigError> {
    let file = match paths::config_file() {
        Some(path) => read_file(&path)?,
        None => FileConfig::default(),
    };
    resolve(file, &EnvOverrides::from_env())
}

/// Read and parse a config file. A missing file yields the empty config.
pub fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("No config file at {}", path.display());
            return Ok(FileConfig::default());
        }
        Err(e) => return Err(e.into()),
    };
    Ok(serde_json::from_str(&content)?)
}

/// Resolve file options and overrides, field by field, into the immutable snapshot.
pub fn resolve(file: FileConfig, env: &EnvOverrides) -> Result<ResolvedConfig, ConfigError> {
    let host = env
        .host
        .as_deref()
        .or(file.host.as_deref())
        .map(normalize_host)
        .unwrap_or_else(|| DEFAULT_HOST.to_string());
    if !host.starts_with("http://") && !host.starts_with("https://") {
        return Err(ConfigError::Invalid(format!(
            "host must be an http(s) URL, got '{}'",
            host
        )));
    }

    let executable = match file.executable.as_deref().map(str::trim) {
        Some(p) if !p.is_empty() => paths::expand_home(p),
        _ => detect_executable(),
    };

    let defaults = Palette::default();
    let colors = file.colors;
    let palette = Palette {
        icon: colors.icon.unwrap_or(defaults.icon),
        running: colors.running.unwrap_or(defaults.running),
        loading: colors.loading.unwrap_or(defaults.loading),
        stopped: colors.stopped.unwrap_or(defaults.stopped),
        text: colors.text.unwrap_or(defaults.text),
        separator: colors.separator.unwrap_or(defaults.separator),
    };
    for color in [
        &palette.icon,
        &palette.running,
        &palette.loading,
        &palette.stopped,
        &palette.text,
        &palette.separator,
    ] {
        if !is_hex_color(color) {
            return Err(ConfigError::Invalid(format!(
                "color '{}' is not #rrggbb",
                color
            )));
        }
    }

    let session_dir = file
        .session_dir
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| paths::expand_home(s.trim()))
        .or_else(paths::default_session_dir)
        .unwrap_or_else(|| PathBuf::from("sessions"));

    Ok(ResolvedConfig {
        host,
        executable,
        catalog_ttl: file
            .catalog_ttl_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_CATALOG_TTL),
        status_debounce: STATUS_DEBOUNCE,
        default_model: file
            .default_model
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty()),
        features: Features {
            show_status: file.features.show_status.unwrap_or(true),
            save_sessions: file.features.save_sessions.unwrap_or(false),
        },
        keys: KeyBindings {
            select_model: resolve_key(file.keys.select_model, "M-m"),
            quick_chat: resolve_key(file.keys.quick_chat, "M-c"),
            resume_session: resolve_key(file.keys.resume_session, "M-r"),
        },
        palette,
        icon: file.icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
        session_dir,
    })
}

fn resolve_key(setting: Option<KeySetting>, default: &str) -> Option<String> {
    match setting {
        None | Some(KeySetting::Toggle(true)) => Some(default.to_string()),
        Some(KeySetting::Toggle(false)) => None,
        Some(KeySetting::Key(k)) => Some(k.trim().to_string()).filter(|k| !k.is_empty()),
    }
}

/// Read a host the way the daemon's CLI reads `OLLAMA_HOST`: without a scheme it is
/// `http://` and, when no port is given, port 11434 ("0.0.0.0" -> "http://0.0.0.0:11434").
/// With a scheme, the scheme's own default port applies. Trailing slashes are dropped.
fn normalize_host(raw: &str) -> String {
    let raw = raw.trim().trim_end_matches('/');
    if raw.contains("://") {
        return raw.to_string();
    }
    let (authority, path) = match raw.find('/') {
        Some(i) => raw.split_at(i),
        None => (raw, ""),
    };
    if has_port(authority) {
        format!("http://{}{}", authority, path)
    } else {
        format!("http://{}:{}{}", authority, DEFAULT_PORT, path)
    }
}

/// `host:port` or `[v6]:port`. A bracketed IPv6 literal alone has no port.
fn has_port(authority: &str) -> bool {
    authority.rsplit_once(':').is_some_and(|(host, port)| {
        !port.is_empty()
            && port.chars().all(|c| c.is_ascii_digit())
            && (!host.starts_with('[') || host.ends_with(']'))
    })
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// First existing known install location, else the bare name for a PATH lookup.
fn detect_executable() -> PathBuf {
    EXECUTABLE_CANDIDATES
        .iter()
        .map(|c| paths::expand_home(c))
        .find(|p| p.is_file())
        .unwrap_or_else(|| PathBuf::from("ollama"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> FileConfig {
        serde_json::from_str(json).expect("valid test config")
    }

    #[test]
    fn empty_file_resolves_to_defaults() {
        let cfg = resolve(parse("{}"), &EnvOverrides::default()).expect("valid");
        assert_eq!(cfg.host, DEFAULT_HOST);
        assert_eq!(cfg.catalog_ttl, DEFAULT_CATALOG_TTL);
        assert_eq!(cfg.status_debounce, STATUS_DEBOUNCE);
        assert_eq!(cfg.palette, Palette::default());
        assert_eq!(cfg.icon, DEFAULT_ICON);
        assert!(cfg.features.show_status);
        assert!(!cfg.features.save_sessions);
        assert_eq!(cfg.keys.select_model.as_deref(), Some("M-m"));
        assert!(cfg.default_model.is_none());
    }

    #[test]
    fn nested_fields_fall_back_individually() {
        let cfg = resolve(
            parse(r##"{"colors":{"running":"#00ff00"},"features":{"save_sessions":true}}"##),
            &EnvOverrides::default(),
        )
        .expect("valid");
        assert_eq!(cfg.palette.running, "#00ff00");
        assert_eq!(cfg.palette.stopped, Palette::default().stopped);
        assert!(cfg.features.save_sessions);
        assert!(cfg.features.show_status);
    }

    #[test]
    fn key_bindings_can_be_disabled_or_replaced() {
        let cfg = resolve(
            parse(r#"{"keys":{"select_model":"O","quick_chat":false,"resume_session":true}}"#),
            &EnvOverrides::default(),
        )
        .expect("valid");
        assert_eq!(cfg.keys.select_model.as_deref(), Some("O"));
        assert_eq!(cfg.keys.quick_chat, None);
        assert_eq!(cfg.keys.resume_session.as_deref(), Some("M-r"));
    }

    #[test]
    fn env_host_overrides_file_and_gets_scheme() {
        let env = EnvOverrides {
            host: Some("127.0.0.1:9999".to_string()),
        };
        let cfg = resolve(parse(r#"{"host":"http://10.0.0.2:11434/"}"#), &env).expect("valid");
        assert_eq!(cfg.host, "http://127.0.0.1:9999");

        let cfg = resolve(parse(r#"{"host":"http://10.0.0.2:11434/"}"#), &EnvOverrides::default())
            .expect("valid");
        assert_eq!(cfg.host, "http://10.0.0.2:11434");
    }

    #[test]
    fn bare_env_host_gets_default_port() {
        for (raw, expected) in [
            ("0.0.0.0", "http://0.0.0.0:11434"),
            ("127.0.0.1", "http://127.0.0.1:11434"),
            ("localhost/", "http://localhost:11434"),
            ("[::1]", "http://[::1]:11434"),
            ("[::1]:8080", "http://[::1]:8080"),
        ] {
            let env = EnvOverrides {
                host: Some(raw.to_string()),
            };
            let cfg = resolve(FileConfig::default(), &env).expect("valid");
            assert_eq!(cfg.host, expected, "OLLAMA_HOST={}", raw);
        }
    }

    #[test]
    fn host_with_scheme_keeps_its_port() {
        let cfg = resolve(parse(r#"{"host":"https://ollama.example.com"}"#), &EnvOverrides::default())
            .expect("valid");
        assert_eq!(cfg.host, "https://ollama.example.com");
    }

    #[test]
    fn non_http_host_is_rejected() {
        let err = resolve(parse(r#"{"host":"ftp://x"}"#), &EnvOverrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn bad_color_is_rejected() {
        let err = resolve(parse(r#"{"colors":{"text":"green"}}"#), &EnvOverrides::default())
            .unwrap_err();
        assert!(err.to_string().contains("green"));
    }

    #[test]
    fn configured_values_are_used() {
        let cfg = resolve(
            parse(
                r#"{"executable":"/opt/ollama/bin/ollama","catalog_ttl_secs":5,"default_model":" llama3.2 ","session_dir":"/tmp/s","icon":"O"}"#,
            ),
            &EnvOverrides::default(),
        )
        .expect("valid");
        assert_eq!(cfg.executable, PathBuf::from("/opt/ollama/bin/ollama"));
        assert_eq!(cfg.catalog_ttl, Duration::from_secs(5));
        assert_eq!(cfg.default_model.as_deref(), Some("llama3.2"));
        assert_eq!(cfg.session_dir, PathBuf::from("/tmp/s"));
        assert_eq!(cfg.icon, "O");
    }

    #[test]
    fn missing_file_is_empty_config() {
        let tmp = tempfile::TempDir::new().expect("temp dir");
        let file = read_file(&tmp.path().join("absent.json")).expect("missing is ok");
        assert!(file.host.is_none());
    }

    #[test]
    fn invalid_json_file_is_an_error() {
        let tmp = tempfile::TempDir::new().expect("temp dir");
        let path = tmp.path().join("config.json");
        fs::write(&path, "{not json").expect("write");
        assert!(matches!(read_file(&path), Err(ConfigError::Json(_))));
    }
}
