//! CLI-only commands: config info, models list, sessions list, tmux snippet.
//!
//! These run without opening the picker and produce plain text output.

use std::path::Path;
use std::time::SystemTime;

use crate::core::config::ResolvedConfig;
use crate::core::models;
use crate::core::paths;
use crate::core::probe::CurlProbe;
use crate::core::sessions;
use crate::core::status::StatusCache;

/// Run the `config` command: display paths and the resolved settings.
pub fn run_config(config: &ResolvedConfig, json: bool) {
    if json {
        match serde_json::to_string_pretty(config) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let shown = |p: Option<std::path::PathBuf>| {
        p.map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    let enabled = |b: bool| if b { "on" } else { "off" };
    let key = |k: &Option<String>| k.clone().unwrap_or_else(|| "disabled".to_string());

    println!("Config file:   {}", shown(paths::config_file()));
    println!("Cache:         {}", shown(paths::cache_dir()));
    println!("Sessions:      {}", config.session_dir.display());
    println!("Host:          {}", config.host);
    println!("Executable:    {}", config.executable.display());
    println!("Catalog TTL:   {}s", config.catalog_ttl.as_secs());
    println!(
        "Default model: {}",
        config.default_model.as_deref().unwrap_or("-")
    );
    println!("Show status:   {}", enabled(config.features.show_status));
    println!("Save sessions: {}", enabled(config.features.save_sessions));
    println!("Select model:  {}", key(&config.keys.select_model));
    println!("Quick chat:    {}", key(&config.keys.quick_chat));
    println!("Resume:        {}", key(&config.keys.resume_session));
}

/// Run the `models` command: list the catalog, optionally filtered.
pub fn run_models(config: &ResolvedConfig, query: Option<&str>) {
    let mut cache = StatusCache::from_config(CurlProbe::new(&config.host), config);
    let catalog = cache.get_catalog(SystemTime::now());

    let filtered: Vec<_> = match query {
        Some(q) => models::filter_models(&catalog, q),
        None => catalog.iter().collect(),
    };

    if filtered.is_empty() {
        println!("No models found.");
        return;
    }

    let name_w = filtered
        .iter()
        .map(|m| m.name.len())
        .max()
        .unwrap_or(30)
        .max(30);

    println!("{:<name_w$}  {:>8}  {:>8}", "Name", "Params", "Size");
    println!("{}  --------  --------", "-".repeat(name_w));

    for m in &filtered {
        let params = if m.parameter_size.is_empty() {
            "-"
        } else {
            m.parameter_size.as_str()
        };
        let size = if m.size_bytes == 0 {
            "-".to_string()
        } else {
            models::format_size(m.size_bytes)
        };
        println!("{:<name_w$}  {:>8}  {:>8}", m.name, params, size);
    }

    println!("\n{} model(s) listed", filtered.len());
}

/// Run the `sessions list` command: one session per line, newest first.
pub fn run_sessions_list(config: &ResolvedConfig, limit: Option<usize>) {
    let entries = match sessions::list_sessions(&config.session_dir) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let take = limit.unwrap_or(entries.len());
    for s in entries.into_iter().take(take) {
        println!("{}\t{}\t{}", s.model(), s.derived_name, s.path.display());
    }
}

/// Run the `tmux` command: print config lines wiring the status line and key bindings.
pub fn run_tmux(config: &ResolvedConfig) {
    let exe = std::env::current_exe()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| crate::core::app::NAME.to_string());
    print!("{}", tmux_snippet(config, Path::new(&exe)));
}

fn tmux_snippet(config: &ResolvedConfig, exe: &Path) -> String {
    let exe = exe.display();
    let mut out = String::new();
    if config.features.show_status {
        out.push_str("set -g status-interval 5\n");
        out.push_str(&format!(
            "set -g status-right '#({} status --format tmux)'\n",
            exe
        ));
    }
    let bindings = [
        (&config.keys.select_model, "pick"),
        (&config.keys.quick_chat, "chat"),
        (&config.keys.resume_session, "resume"),
    ];
    for (key, command) in bindings {
        if let Some(key) = key {
            out.push_str(&format!(
                "bind-key {} display-popup -E \"{} {}\"\n",
                key, exe, command
            ));
        }
    }
    out
}
