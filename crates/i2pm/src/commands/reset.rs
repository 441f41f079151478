//! `reset`: stop the router, remove the profile and the configuration.
//! Each step is best effort; failures are reported and the next step runs.

use crate::cli::{GlobalOpts, ResetArgs};
use crate::commands::Context;
use crate::commands::util::{confirm, spinner};
use crate::error::CliError;
use crate::output::Printer;

pub async fn handle(ctx: &mut Context, args: ResetArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let out = Printer::new(global.quiet);
    out.blank();
    out.heading("Reset I2P Manager");
    out.blank();
    out.line("This will remove:");
    out.hint("• Firefox I2P profile");
    out.hint("• Configuration file");
    if !args.keep_data {
        out.dim("Router data (e.g. ~/.i2pd) belongs to i2pd and is left in place.");
    }
    out.blank();

    if !confirm("Reset everything?", global.yes)? {
        out.dim("Cancelled");
        return Ok(());
    }

    let pb = spinner("Stopping I2Pd...", global.quiet);
    let running = ctx.daemon.is_running().await;
    let stopped = if running { Some(ctx.daemon.stop().await) } else { None };
    pb.finish_and_clear();
    match stopped {
        Some(Ok(())) => out.success("I2Pd stopped"),
        Some(Err(e)) => out.warning(&format!("Could not stop I2Pd: {e}")),
        None => out.dim("I2Pd not running"),
    }

    let name = ctx.profile_name().to_owned();
    if ctx.browser.profile_exists(&name) {
        match ctx.browser.delete_profile(&name) {
            Ok(()) => out.success("Firefox profile removed"),
            Err(e) => out.warning(&format!("Could not remove profile: {e}")),
        }
    } else {
        out.dim("Profile not found");
    }

    match ctx.store.remove() {
        Ok(true) => out.success("Configuration removed"),
        Ok(false) => out.dim("No configuration file"),
        Err(e) => out.warning(&format!("Could not remove config: {e}")),
    }

    out.blank();
    out.success("Reset complete");
    out.line("Run i2p-manager init to set up again.");
    out.blank();
    Ok(())
}
