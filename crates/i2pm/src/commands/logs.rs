//! `logs`: print the tail of the router log, optionally following it.

use i2pm_core::LogFollower;
use i2pm_core::logs::FOLLOW_INTERVAL;

use crate::cli::{GlobalOpts, LogsArgs};
use crate::commands::Context;
use crate::error::CliError;
use crate::output::{Printer, print_output};

pub async fn handle(ctx: &Context, args: LogsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let lines = ctx.daemon.read_logs(args.lines)?;
    print_output(&lines.join("\n"), global.quiet);

    if !args.follow {
        return Ok(());
    }
    let Some(path) = ctx.daemon.log_path() else {
        return Ok(());
    };

    let out = Printer::new(global.quiet);
    out.dim(&format!("Following {}... Press Ctrl+C to exit", path.display()));

    let mut follower = LogFollower::from_end(&path)?;
    let mut ticker = tokio::time::interval(FOLLOW_INTERVAL);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            _ = ticker.tick() => {
                for line in follower.poll()? {
                    print_output(&line, false);
                }
            }
        }
    }

    out.blank();
    out.dim("Stopped following logs");
    Ok(())
}
