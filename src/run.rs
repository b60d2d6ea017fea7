//! Application run modes: logger init, status output, interactive workflows.

use std::io::{self, Write};
use std::thread;
use std::time::{Duration, SystemTime};

use chrono::Local;

use crate::cli::{Args, Commands};
use crate::core;
use crate::core::actions::{self, ActionOutcome, Notice};
use crate::core::config::ResolvedConfig;
use crate::core::launch::Launcher;
use crate::core::present::{self, OutputFormat};
use crate::core::probe::CurlProbe;
use crate::core::status::{self, StatusCache};
use crate::tui::TerminalHost;

/// Interactive workflow selected on the command line.
#[derive(Clone, Copy, Debug)]
pub enum Action {
    SelectModel,
    QuickChat,
    ResumeSession,
}

/// Initialize env_logger. Host-facing commands write to a file so the status line and the
/// picker stay clean.
pub fn init_logger(args: &Args) {
    let log_level = args.log_level();
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level));

    let host_facing = args
        .command
        .as_ref()
        .is_none_or(Commands::is_host_facing);
    if host_facing {
        let log_path = core::paths::cache_dir().and_then(|d| {
            std::fs::create_dir_all(&d).ok()?;
            Some(d.join(format!("{}.log", core::app::NAME)))
        });
        if let Some(path) = log_path
            && let Ok(file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
        {
            logger.target(env_logger::Target::Pipe(Box::new(file)));
        }
    }
    let _ = logger.try_init();
}

/// Status cache for the configured host, seeded from the last snapshot.
fn open_cache(config: &ResolvedConfig) -> StatusCache<CurlProbe> {
    let mut cache = StatusCache::from_config(CurlProbe::new(&config.host), config);
    if let Some(path) = status::snapshot_path()
        && let Some(snap) = status::load_snapshot(&path, &config.host)
    {
        cache.restore(snap);
    }
    cache
}

/// Persist the cache for the next process. Failure only costs an extra probe next time.
fn persist_cache(cache: &StatusCache<CurlProbe>, config: &ResolvedConfig) {
    let Some(path) = status::snapshot_path() else {
        return;
    };
    if let Err(e) = status::save_snapshot(&path, &cache.snapshot(&config.host)) {
        log::warn!("Failed to save status snapshot: {}", e);
    }
}

/// One status line: status block (when enabled) and the date/time block.
fn status_line(
    cache: &mut StatusCache<CurlProbe>,
    config: &ResolvedConfig,
    format: OutputFormat,
    no_time: bool,
) -> String {
    let mut segments = Vec::new();
    if config.features.show_status {
        let (state, loaded) = cache.get_status(SystemTime::now());
        segments.extend(present::format_status(
            state,
            loaded.as_deref(),
            &config.palette,
            &config.icon,
        ));
    }
    if !no_time {
        segments.extend(present::format_time_segments(
            &Local::now(),
            &config.palette,
        ));
    }
    present::render(&segments, format)
}

/// Run `status`: print one line and exit.
pub fn run_status(config: &ResolvedConfig, format: OutputFormat, no_time: bool) {
    let mut cache = open_cache(config);
    let line = status_line(&mut cache, config, format, no_time);
    println!("{}", line);
    persist_cache(&cache, config);
}

/// Run `watch`: one line per tick from a single in-process cache. Stops when stdout closes.
pub fn run_watch(config: &ResolvedConfig, interval: u64, format: OutputFormat, no_time: bool) {
    let mut cache = open_cache(config);
    let tick = Duration::from_secs(interval.max(1));
    let mut stdout = io::stdout();
    loop {
        let line = status_line(&mut cache, config, format, no_time);
        if writeln!(stdout, "{}", line).and_then(|_| stdout.flush()).is_err() {
            log::info!("stdout closed; stopping watch");
            break;
        }
        thread::sleep(tick);
    }
    persist_cache(&cache, config);
}

/// Run one interactive workflow in the terminal.
pub fn run_action(config: &ResolvedConfig, action: Action) -> ActionOutcome {
    let mut host = TerminalHost::new(Launcher::detect());
    let outcome = match action {
        Action::SelectModel => {
            let mut cache = open_cache(config);
            let outcome = actions::select_model(&mut cache, config, &mut host, SystemTime::now());
            persist_cache(&cache, config);
            outcome
        }
        Action::QuickChat => {
            let mut cache = open_cache(config);
            let outcome = actions::quick_chat(&mut cache, config, &mut host, SystemTime::now());
            persist_cache(&cache, config);
            outcome
        }
        Action::ResumeSession => actions::resume_session(config, &mut host),
    };
    log::debug!("{:?} finished: {:?}", action, outcome);
    outcome
}

/// Exit code for a finished workflow: only a failed launch is an error.
pub fn exit_code(outcome: &ActionOutcome) -> i32 {
    match outcome {
        ActionOutcome::Notified(Notice::LaunchFailed(_)) => 1,
        _ => 0,
    }
}
