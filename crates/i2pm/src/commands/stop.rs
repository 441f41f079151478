//! `stop`: shut the router down and check that it went.

use crate::cli::GlobalOpts;
use crate::commands::Context;
use crate::commands::util::{STOP_SETTLE, spinner};
use crate::error::CliError;
use crate::output::Printer;

pub async fn handle(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let out = Printer::new(global.quiet);
    out.blank();
    out.heading("Stopping I2P Manager");
    out.blank();

    stop_router(ctx, out).await?;
    out.blank();
    Ok(())
}

/// Stop the router if it is up. Still answering afterwards is a warning.
pub async fn stop_router(ctx: &Context, out: Printer) -> Result<(), CliError> {
    let pb = spinner("Checking I2Pd status...", out.is_quiet());
    if !ctx.daemon.is_running().await {
        pb.finish_and_clear();
        out.warning("I2Pd is not running");
        return Ok(());
    }

    pb.set_message("Stopping I2Pd...");
    if let Err(e) = ctx.daemon.stop().await {
        pb.finish_and_clear();
        return Err(e.into());
    }
    tokio::time::sleep(STOP_SETTLE).await;
    let still_up = ctx.daemon.is_running().await;
    pb.finish_and_clear();

    if still_up {
        out.warning("I2Pd may still be running");
    } else {
        out.success("I2Pd stopped successfully");
    }
    Ok(())
}
