//! No subcommand: open the interactive dashboard.

use i2pm_tui::DashboardContext;

use crate::commands::Context;
use crate::error::CliError;

pub async fn handle() -> Result<(), CliError> {
    let ctx = Context::load()?;
    let dashboard = DashboardContext {
        config_path: ctx.store.path().to_path_buf(),
        daemon: ctx.daemon,
        browser: ctx.browser,
        settings: ctx.settings,
    };

    i2pm_tui::run_dashboard(dashboard)
        .await
        .map_err(|e| CliError::Dashboard {
            message: e.to_string(),
        })
}
