//! `browser`: open Firefox on the I2P profile.

use crate::cli::GlobalOpts;
use crate::commands::Context;
use crate::commands::util::confirm;
use crate::error::CliError;
use crate::output::Printer;

pub async fn handle(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let out = Printer::new(global.quiet);
    out.blank();
    out.heading("Launching I2P Browser");
    out.blank();

    if !ctx.daemon.is_running().await {
        out.warning("I2P is not running");
        out.dim("The browser will open but can't reach I2P sites.");
        out.hint("Start I2P first: i2p-manager start");
        out.blank();
        if !confirm("Launch browser anyway?", global.yes)? {
            out.dim("Cancelled");
            return Ok(());
        }
    }

    let name = ctx.profile_name();
    if !ctx.browser.profile_exists(name) {
        out.warning(&format!("Profile '{name}' not found. Run: i2p-manager init"));
    }
    ctx.browser.launch(name)?;

    out.success("Browser launched!");
    out.blank();
    out.line("Try these I2P sites:");
    out.hint("• http://planet.i2p - News aggregator");
    out.hint("• http://i2pforum.i2p - Community forum");
    out.hint(&format!("• {} - Router console", ctx.daemon.endpoint()));
    out.blank();
    Ok(())
}
