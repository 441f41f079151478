//! `start`: bring the router up, then open the browser.

use crate::cli::{GlobalOpts, StartArgs};
use crate::commands::Context;
use crate::commands::util::{START_SETTLE, spinner};
use crate::error::CliError;
use crate::output::Printer;

pub async fn handle(ctx: &Context, args: StartArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let out = Printer::new(global.quiet);
    out.blank();
    out.heading("Starting I2P Manager");
    out.blank();

    start_router(ctx, out).await?;

    if !args.no_browser {
        let pb = spinner("Launching Firefox...", out.is_quiet());
        let launched = ctx.browser.launch(ctx.profile_name());
        pb.finish_and_clear();
        launched?;
        out.success("Firefox launched");
    }

    out.blank();
    out.success("I2P is running!");
    out.line(format!("Router console: {}", ctx.daemon.endpoint()));
    out.blank();
    out.line("First time?");
    out.hint("• Wait 10-30 minutes for network integration");
    out.hint("• Check status: i2p-manager status");
    out.hint("• Try visiting: http://planet.i2p");
    out.blank();
    Ok(())
}

/// Start the router unless it is already up, then confirm it answers.
pub async fn start_router(ctx: &Context, out: Printer) -> Result<(), CliError> {
    let pb = spinner("Checking I2Pd status...", out.is_quiet());
    if ctx.daemon.is_running().await {
        pb.finish_and_clear();
        out.success("I2Pd is already running");
        return Ok(());
    }

    pb.set_message("Starting I2Pd...");
    if let Err(e) = ctx.daemon.start().await {
        pb.finish_and_clear();
        return Err(e.into());
    }
    tokio::time::sleep(START_SETTLE).await;
    let up = ctx.daemon.is_running().await;
    pb.finish_and_clear();

    if !up {
        return Err(CliError::start_failed());
    }
    out.success("I2Pd started successfully");
    Ok(())
}
