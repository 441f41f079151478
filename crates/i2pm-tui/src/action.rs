//! All possible UI actions. Actions are the sole mechanism for state mutation.

use i2pm_core::StatusReport;

/// Informational overlay opened from the quick-actions menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoPanel {
    Config,
    Logs,
    Reset,
    Help,
}

impl InfoPanel {
    pub fn title(self) -> &'static str {
        match self {
            Self::Config => " Configuration ",
            Self::Logs => " Logs ",
            Self::Reset => " Reset ",
            Self::Help => " Help & About ",
        }
    }
}

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A one-line result message shown above the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Warning,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ── Lifecycle ──
    Quit,
    Tick,
    Render,

    // ── Status polling ──
    /// Probe the router now instead of waiting for the next interval.
    Refresh,
    StatusUpdated(StatusReport),

    // ── Router & browser control ──
    StartDaemon,
    StopDaemon,
    RestartDaemon,
    LaunchBrowser,
    /// A spawned control task finished.
    TaskFinished(Notification),

    // ── Overlays ──
    ShowInfo(InfoPanel),
    CloseOverlay,
}
