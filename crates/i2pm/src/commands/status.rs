//! `status`: one probe, classified and rendered.

use serde::Serialize;

use i2pm_core::StatusReport;

use crate::cli::{GlobalOpts, OutputFormat, StatusArgs};
use crate::commands::Context;
use crate::error::CliError;
use crate::output::{self, Printer};

/// What `status` reports, in every output format.
#[derive(Debug, Serialize)]
struct StatusView<'a> {
    #[serde(flatten)]
    report: StatusReport,
    console: String,
    proxy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Details<'a>>,
}

#[derive(Debug, Serialize)]
struct Details<'a> {
    config: String,
    profile: &'a str,
    hardening: bool,
}

impl<'a> StatusView<'a> {
    fn new(ctx: &'a Context, report: StatusReport, verbose: bool) -> Self {
        let i2pd = &ctx.settings.i2pd;
        Self {
            report,
            console: ctx.daemon.endpoint().to_string(),
            proxy: format!("{}:{}", i2pd.host, i2pd.http_port),
            details: verbose.then(|| Details {
                config: ctx.store.path().display().to_string(),
                profile: ctx.profile_name(),
                hardening: ctx.settings.firefox.harden_with_arkenfox,
            }),
        }
    }
}

pub async fn handle(ctx: &Context, args: StatusArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let report = ctx.daemon.get_status().await;
    let view = StatusView::new(ctx, report, global.verbose > 0);

    match args.output {
        OutputFormat::Table => print_human(&view, Printer::new(global.quiet)),
        format => output::print_output(&output::render_structured(format, &view)?, global.quiet),
    }
    Ok(())
}

fn print_human(view: &StatusView<'_>, out: Printer) {
    let StatusView { report, .. } = view;
    let class = report.class;

    out.blank();
    out.heading("I2P Manager Status");
    out.blank();

    if report.status.running {
        out.success("I2Pd is running");
        out.line(output::render_properties(&[
            ("Status", class.to_string()),
            ("Router Console", view.console.clone()),
            ("HTTP Proxy", view.proxy.clone()),
            ("Known Peers", report.status.peers.to_string()),
            ("Active Tunnels", report.status.tunnels.to_string()),
        ]));
        out.blank();
        out.line(class.headline());
        out.dim(class.hint());
    } else {
        out.failure("I2Pd is not running");
        out.blank();
        out.hint(class.hint());
    }

    if let Some(details) = &view.details {
        out.blank();
        out.heading("Details");
        out.line(output::render_properties(&[
            ("Config", details.config.clone()),
            ("Profile", details.profile.to_owned()),
            (
                "Hardening",
                if details.hardening { "enabled" } else { "disabled" }.to_owned(),
            ),
        ]));
    }
    out.blank();
}
