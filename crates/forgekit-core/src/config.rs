use crate::project::{Command, Mode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Runtime configuration for the forgekit CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Project root.
    pub cwd: PathBuf,

    /// Whether to emit JSON logs.
    pub json_logs: bool,

    /// Verbosity level (0 = INFO, 1 = DEBUG, 2+ = TRACE).
    pub verbosity: u8,

    /// Command the configurations are resolved for.
    pub command: Command,

    /// Explicit mode; defaults from `command` when absent.
    pub mode: Option<Mode>,

    /// Explicit project configuration file, relative to `cwd`.
    pub project_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            json_logs: false,
            verbosity: 0,
            command: Command::Build,
            mode: None,
            project_file: None,
        }
    }
}

impl Config {
    /// Create a new config with the given working directory.
    #[must_use]
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            cwd,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    #[must_use]
    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }

    #[must_use]
    pub fn with_command(mut self, command: Command) -> Self {
        self.command = command;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: Option<Mode>) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_project_file(mut self, path: Option<PathBuf>) -> Self {
        self.project_file = path;
        self
    }

    /// The effective mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode.unwrap_or_else(|| self.command.default_mode())
    }
}
