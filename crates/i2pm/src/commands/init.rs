//! `init`: configuration file plus a hardened Firefox profile pointed at
//! the router's proxy.

use crate::cli::{GlobalOpts, InitArgs};
use crate::commands::Context;
use crate::commands::util::spinner;
use crate::error::{CliError, daemon_install_hint};
use crate::output::Printer;

pub fn handle(ctx: &mut Context, args: InitArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let out = Printer::new(global.quiet);
    out.blank();
    out.heading("I2P Easy Manager - Initialization");
    out.blank();

    let pb = spinner("Checking dependencies...", global.quiet);
    if !ctx.browser.is_installed() {
        pb.finish_and_clear();
        return Err(CliError::browser_not_found());
    }
    if !ctx.daemon.is_installed() {
        pb.suspend(|| {
            out.warning("I2Pd not found (optional for now)");
            out.hint(&format!("Install it with: {}", daemon_install_hint()));
            out.dim("Continuing without I2Pd...");
        });
    }

    pb.set_message("Creating configuration...");
    ctx.store.init()?;
    ctx.settings = ctx.store.settings()?;
    let name = ctx.settings.firefox.profile_name.clone();

    if ctx.browser.profile_exists(&name) {
        if !args.force {
            pb.finish_and_clear();
            out.warning("I2P profile already exists");
            out.dim("Use --force to reinitialize");
            out.blank();
            return Ok(());
        }
        pb.set_message("Removing old profile...");
        ctx.browser.delete_profile(&name)?;
    }

    pb.set_message("Creating Firefox profile...");
    let profile = ctx.browser.create_profile(&name)?;

    if ctx.settings.firefox.harden_with_arkenfox {
        pb.set_message("Applying hardening preferences...");
        ctx.browser.apply_hardening(&profile.path)?;
    }

    pb.set_message("Configuring I2P proxy...");
    ctx.browser.configure_proxy(&profile.path, &ctx.proxy())?;
    pb.finish_and_clear();

    out.success(&format!("Profile created: {}", profile.path.display()));
    out.success(&format!("Configuration: {}", ctx.store.path().display()));
    out.blank();
    out.success("Initialization complete!");
    out.blank();
    out.line("Next steps:");
    out.hint("1. Start I2P: i2p-manager start");
    out.hint("2. Check status: i2p-manager status");
    out.hint("3. Wait 10-30 minutes for I2P network integration");
    out.hint("4. Visit I2P sites (e.g., http://planet.i2p)");
    out.blank();
    Ok(())
}
