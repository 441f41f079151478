//! `restart`: stop, pause, start. Never opens the browser.

use i2pm_core::daemon::RESTART_PAUSE;

use crate::cli::GlobalOpts;
use crate::commands::Context;
use crate::commands::start::start_router;
use crate::commands::stop::stop_router;
use crate::error::CliError;
use crate::output::Printer;

pub async fn handle(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let out = Printer::new(global.quiet);
    out.blank();
    out.heading("Restarting I2P Manager");
    out.blank();

    stop_router(ctx, out).await?;
    tokio::time::sleep(RESTART_PAUSE).await;
    start_router(ctx, out).await?;

    out.success("Restart complete");
    out.blank();
    Ok(())
}
