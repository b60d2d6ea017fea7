//! CLI definitions: argument parsing, subcommands, and help text.

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;

pub use clap_complete::generate;

use crate::core::present::OutputFormat;

const AFTER_HELP: &str = "\
EXAMPLES:
  ollama-bar                          Print the status line (same as `status`)
  ollama-bar status --format tmux     Status segments as tmux markup
  ollama-bar watch --interval 2       One status line every 2 seconds
  ollama-bar pick                     Choose a model and run it in a new tab
  ollama-bar chat                     Run the default model (or pick one)
  ollama-bar resume                   Resume a saved session
  ollama-bar tmux >> ~/.tmux.conf     Wire the status line and key bindings into tmux
  ollama-bar completions zsh          Generate zsh completions
";

/// Command-line arguments for the application.
#[derive(Parser)]
#[command(
    author,
    version,
    about = "Ollama server status for terminal status bars, with model and session launchers",
    after_help = AFTER_HELP
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase log verbosity (use multiple times for debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce log output (errors only)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Print the status segments once
    Status {
        /// Output flavor
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Ansi)]
        format: OutputFormat,
        /// Leave out the trailing date/time block
        #[arg(long)]
        no_time: bool,
    },
    /// Print a status line on every tick until interrupted
    Watch {
        /// Seconds between lines
        #[arg(short, long, default_value_t = 1)]
        interval: u64,
        /// Output flavor
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Ansi)]
        format: OutputFormat,
        /// Leave out the trailing date/time block
        #[arg(long)]
        no_time: bool,
    },
    /// List available models
    Models {
        /// Fuzzy filter on model name
        #[arg(long)]
        query: Option<String>,
    },
    /// Choose a model and run it in a new terminal tab
    Pick,
    /// Run the default model, or choose one when none is configured
    Chat,
    /// Choose a saved session and run its model again
    Resume,
    /// Manage saved sessions
    Sessions {
        #[command(subcommand)]
        subcommand: SessionsSubcommand,
    },
    /// Show config paths and the resolved configuration
    Config {
        /// Print the resolved configuration as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print tmux configuration for the status line and key bindings
    Tmux,
    /// Generate shell completion script
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        #[arg(value_parser = clap::value_parser!(Shell))]
        shell: Shell,
    },
}

#[derive(Subcommand, Clone)]
pub enum SessionsSubcommand {
    /// List saved sessions, newest first
    List {
        /// Maximum number of sessions to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

impl Commands {
    /// Command run when none is given.
    pub fn default_command() -> Self {
        Commands::Status {
            format: OutputFormat::Ansi,
            no_time: false,
        }
    }

    /// Commands whose stdout or terminal belongs to a host (status bar, picker). Their logs
    /// go to a file.
    pub fn is_host_facing(&self) -> bool {
        matches!(
            self,
            Commands::Status { .. }
                | Commands::Watch { .. }
                | Commands::Pick
                | Commands::Chat
                | Commands::Resume
        )
    }
}

impl Args {
    /// Log level based on -v/-q flags: error, warn, info, or debug.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose >= 2 {
            "debug"
        } else if self.verbose >= 1 {
            "info"
        } else {
            "warn"
        }
    }
}
