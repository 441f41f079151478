//! Process-control and filesystem failures surfaced to the CLI and dashboard.
//!
//! Status probing never produces one of these; it degrades to default values.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::browser::BROWSER;
use crate::process::DAEMON;

/// Which executable a [`CoreError::NotFound`] is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Program {
    /// The i2pd router.
    Daemon,
    /// Firefox.
    Browser,
    /// A helper such as `brew`, `sudo`, or `taskkill`.
    Tool(String),
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daemon => f.write_str(DAEMON),
            Self::Browser => f.write_str(BROWSER),
            Self::Tool(name) => f.write_str(name),
        }
    }
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Process control ──────────────────────────────────────────────
    /// An executable this tool needs is not installed.
    #[error("{program} not found")]
    NotFound { program: Program },

    /// The executable exists but the operation did not succeed.
    #[error("Failed to {operation}: {message}")]
    OperationFailed { operation: String, message: String },

    // ── Logs ─────────────────────────────────────────────────────────
    #[error("Log file not found")]
    LogNotFound { searched: Vec<PathBuf> },

    // ── Filesystem ───────────────────────────────────────────────────
    #[error("{action} {}: {source}", path.display())]
    Fs {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub(crate) fn not_found(program: Program) -> Self {
        Self::NotFound { program }
    }

    pub(crate) fn failed(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::OperationFailed {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub(crate) fn fs(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Fs {
            action,
            path: path.into(),
            source,
        }
    }

    /// Map a spawn failure: a missing binary is `NotFound`, anything else
    /// is an operation failure.
    pub(crate) fn from_spawn(program: Program, operation: &str, err: &std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::not_found(program)
        } else {
            Self::failed(operation, err.to_string())
        }
    }

    /// Returns `true` if a required executable is missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
