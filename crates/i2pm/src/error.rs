//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! install and recovery hints for the current platform.

use miette::Diagnostic;
use thiserror::Error;

use i2pm_config::ConfigError;
use i2pm_core::{CoreError, Program};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Missing programs ─────────────────────────────────────────────
    #[error("i2pd is not installed")]
    #[diagnostic(code(i2pm::daemon_not_installed))]
    DaemonNotInstalled {
        #[help]
        help: String,
    },

    #[error("Firefox not found")]
    #[diagnostic(code(i2pm::browser_not_found))]
    BrowserNotFound {
        #[help]
        help: String,
    },

    #[error("{tool} not found")]
    #[diagnostic(code(i2pm::tool_not_found))]
    ToolNotFound {
        tool: String,
        #[help]
        help: String,
    },

    // ── Router control ───────────────────────────────────────────────
    #[error("i2pd failed to start")]
    #[diagnostic(code(i2pm::start_failed))]
    DaemonStartFailed {
        #[help]
        help: String,
    },

    #[error("Failed to {operation}: {message}")]
    #[diagnostic(code(i2pm::operation_failed))]
    OperationFailed { operation: String, message: String },

    #[error("Log file not found")]
    #[diagnostic(
        code(i2pm::log_not_found),
        help("Searched: {searched}\nIs i2pd installed and has it run at least once?")
    )]
    LogNotFound { searched: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(i2pm::config),
        help("Inspect the file with: i2p-manager config show")
    )]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Dashboard failed: {message}")]
    #[diagnostic(code(i2pm::dashboard))]
    Dashboard { message: String },

    #[error("Prompt failed: {message}")]
    #[diagnostic(
        code(i2pm::prompt),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    Prompt { message: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render JSON: {0}")]
    #[diagnostic(code(i2pm::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Every caught error exits with the same code; clap keeps its own for
    /// usage errors.
    #[allow(clippy::unused_self)]
    pub fn exit_code(&self) -> i32 {
        exit_code::GENERAL
    }

    pub fn start_failed() -> Self {
        Self::DaemonStartFailed {
            help: format!(
                "Try starting it manually: {}\nCheck logs: i2p-manager logs",
                manual_start_hint()
            ),
        }
    }

    pub fn daemon_not_installed() -> Self {
        Self::DaemonNotInstalled {
            help: format!("Install i2pd: {}", daemon_install_hint()),
        }
    }

    pub fn tool_not_found(tool: &str) -> Self {
        Self::ToolNotFound {
            tool: tool.to_owned(),
            help: tool_install_hint(tool),
        }
    }

    pub fn browser_not_found() -> Self {
        Self::BrowserNotFound {
            help: format!("Install Firefox: {}", browser_install_hint()),
        }
    }
}

// ── Platform hints ───────────────────────────────────────────────────

pub fn daemon_install_hint() -> &'static str {
    if cfg!(target_os = "macos") {
        "brew install i2pd"
    } else if cfg!(windows) {
        "download it from https://i2pd.website"
    } else {
        "sudo apt install i2pd"
    }
}

pub fn browser_install_hint() -> &'static str {
    if cfg!(target_os = "macos") || cfg!(windows) {
        "download it from https://mozilla.org/firefox/"
    } else {
        "sudo apt install firefox"
    }
}

fn tool_install_hint(tool: &str) -> String {
    match tool {
        "brew" => "Install Homebrew from https://brew.sh, then run: brew install i2pd".into(),
        other => format!(
            "i2p-manager needs `{other}` to control i2pd here. Install it or {}",
            manual_start_hint()
        ),
    }
}

fn manual_start_hint() -> &'static str {
    if cfg!(target_os = "macos") {
        "brew services start i2pd"
    } else if cfg!(windows) {
        "run i2pd.exe"
    } else {
        "sudo systemctl start i2pd"
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { program } => match program {
                Program::Daemon => Self::daemon_not_installed(),
                Program::Browser => Self::browser_not_found(),
                Program::Tool(tool) => Self::tool_not_found(&tool),
            },

            CoreError::OperationFailed { operation, message } => {
                Self::OperationFailed { operation, message }
            }

            CoreError::LogNotFound { searched } => Self::LogNotFound {
                searched: searched
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            },

            err @ CoreError::Fs { .. } => Self::OperationFailed {
                operation: "update files".into(),
                message: err.to_string(),
            },

            CoreError::Io(e) => Self::Io(e),
        }
    }
}
