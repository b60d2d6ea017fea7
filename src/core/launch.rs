//! Start `<ollama> run <model>` in a new terminal tab.
//!
//! Inside tmux a new window is opened, inside WezTerm a new tab; anywhere else the session
//! runs in the current terminal. The launched process is not tracked afterwards.

use std::io;
use std::path::PathBuf;
use std::process::Command;

use crate::core::models::display_name;

/// Environment variable carrying the model name into the launched session.
pub const MODEL_ENV: &str = "OLLAMA_MODEL";

/// One interactive session to start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchRequest {
    pub executable: PathBuf,
    pub model: String,
}

impl LaunchRequest {
    pub fn new(executable: impl Into<PathBuf>, model: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            model: model.into(),
        }
    }
}

/// Error starting a session process.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program} exited with {status}")]
    Exit { program: String, status: String },
}

/// Where a session gets its terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Launcher {
    Tmux,
    Wezterm,
    Inline,
}

impl Launcher {
    /// Pick the launcher from the environment the binary runs in.
    pub fn detect() -> Self {
        let set = |name: &str| std::env::var_os(name).is_some_and(|v| !v.is_empty());
        if set("TMUX") {
            Launcher::Tmux
        } else if set("WEZTERM_PANE") {
            Launcher::Wezterm
        } else {
            Launcher::Inline
        }
    }

    /// Command that starts the session for this launcher.
    pub fn command(&self, req: &LaunchRequest) -> Command {
        let env_pair = format!("{}={}", MODEL_ENV, req.model);
        match self {
            Launcher::Tmux => {
                let mut cmd = Command::new("tmux");
                cmd.args(["new-window", "-n", display_name(&req.model), "-e", &env_pair])
                    .arg(&req.executable)
                    .args(["run", &req.model]);
                cmd
            }
            Launcher::Wezterm => {
                let mut cmd = Command::new("wezterm");
                cmd.args(["cli", "spawn", "--", "env", &env_pair])
                    .arg(&req.executable)
                    .args(["run", &req.model]);
                cmd
            }
            Launcher::Inline => {
                let mut cmd = Command::new(&req.executable);
                cmd.args(["run", &req.model]).env(MODEL_ENV, &req.model);
                cmd
            }
        }
    }

    /// Run the launch command. Tab launchers return once the tab exists; inline waits for
    /// the session to end.
    pub fn launch(&self, req: &LaunchRequest) -> Result<(), LaunchError> {
        let mut cmd = self.command(req);
        let program = cmd.get_program().to_string_lossy().into_owned();
        log::info!("Launching {} via {:?}", req.model, self);
        let status = cmd.status().map_err(|source| LaunchError::Spawn {
            program: program.clone(),
            source,
        })?;
        if status.success() {
            Ok(())
        } else {
            Err(LaunchError::Exit {
                program,
                status: status.to_string(),
            })
        }
    }
}
