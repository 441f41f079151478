//! `i2pm-tui`: terminal dashboard for a local i2pd router.
//!
//! Built on [ratatui](https://ratatui.rs). The dashboard polls the router
//! console on a fixed interval and offers quick actions on keys 1-8:
//! start, stop, restart, launch Firefox, and four info panels.
//!
//! Logs go to a file, never the terminal. Control operations run on
//! background tasks and report back through the action channel, so the
//! UI keeps rendering while the router starts or stops.

mod action;
mod app;
mod component;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::ffi::OsStr;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub use crate::app::DashboardContext;
use crate::app::App;

/// Run the interactive dashboard until the user quits.
///
/// Installs panic and error hooks that restore the terminal first.
pub async fn run_dashboard(ctx: DashboardContext) -> color_eyre::Result<()> {
    tui::install_hooks()?;
    let mut app = App::new(ctx);
    app.run().await
}

/// Set up file-based tracing for the dashboard.
///
/// Logging to stdout/stderr would corrupt the UI. The returned guard must
/// be held for the lifetime of the dashboard so buffered lines get flushed.
pub fn init_file_logging(log_file: &Path, verbose: u8) -> WorkerGuard {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "i2pm_tui={log_level},i2pm_core={log_level},i2pm_config={log_level}"
        ))
    });

    let log_dir = log_file.parent().unwrap_or_else(|| Path::new("."));
    let log_filename = log_file
        .file_name()
        .unwrap_or_else(|| OsStr::new("i2p-manager.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .try_init();

    guard
}
