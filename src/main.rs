//! # ollama-bar
//!
//! Ollama server status for terminal status bars (tmux, WezTerm, anything that runs a
//! command), plus three launchers: pick a model, quick chat, and resume a saved session.

mod cli;
mod core;
mod run;
mod tui;

use clap::{CommandFactory, Parser};
use dotenv::dotenv;

use cli::{Args, Commands, SessionsSubcommand};
use run::Action;

fn main() {
    dotenv().ok();

    let args = Args::parse();
    run::init_logger(&args);

    let command = args.command.clone().unwrap_or_else(Commands::default_command);

    if let Commands::Completions { shell } = command {
        let mut cmd = Args::command();
        let name = cmd.get_name().to_string();
        cli::generate(shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    let config = core::config::load().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    log::debug!("Resolved config for host {}", config.host);

    let action = match command {
        Commands::Status { format, no_time } => {
            run::run_status(&config, format, no_time);
            return;
        }
        Commands::Watch {
            interval,
            format,
            no_time,
        } => {
            run::run_watch(&config, interval, format, no_time);
            return;
        }
        Commands::Models { query } => {
            core::cli::run_models(&config, query.as_deref());
            return;
        }
        Commands::Sessions {
            subcommand: SessionsSubcommand::List { limit },
        } => {
            core::cli::run_sessions_list(&config, limit);
            return;
        }
        Commands::Config { json } => {
            core::cli::run_config(&config, json);
            return;
        }
        Commands::Tmux => {
            core::cli::run_tmux(&config);
            return;
        }
        Commands::Completions { .. } => return,
        Commands::Pick => Action::SelectModel,
        Commands::Chat => Action::QuickChat,
        Commands::Resume => Action::ResumeSession,
    };

    let outcome = run::run_action(&config, action);
    let code = run::exit_code(&outcome);
    if code != 0 {
        std::process::exit(code);
    }
}
