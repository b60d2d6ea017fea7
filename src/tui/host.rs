//! Host for the interactive workflows when running in a terminal.

use std::process::Command;

use crate::core::actions::{Host, Notice};
use crate::core::launch::{LaunchError, LaunchRequest, Launcher};

/// Picker in the terminal, notices on stderr (and the tmux message line), sessions through
/// the detected launcher.
pub struct TerminalHost {
    launcher: Launcher,
}

impl TerminalHost {
    pub fn new(launcher: Launcher) -> Self {
        Self { launcher }
    }
}

impl Host for TerminalHost {
    fn notify(&mut self, notice: &Notice) {
        eprintln!("{}", notice);
        if self.launcher == Launcher::Tmux {
            // Popups close on exit; the message line outlives them.
            let _ = Command::new("tmux")
                .args(["display-message", &notice.to_string()])
                .status();
        }
    }

    fn choose(&mut self, title: &str, labels: &[String]) -> Option<usize> {
        super::pick(title, labels).unwrap_or_else(|e| {
            log::error!("Picker failed: {}", e);
            None
        })
    }

    fn launch(&mut self, request: &LaunchRequest) -> Result<(), LaunchError> {
        self.launcher.launch(request)
    }
}
