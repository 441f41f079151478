//! Command dispatch: bridges CLI args -> core operations -> output.

pub mod browser;
pub mod config_cmd;
pub mod dashboard;
pub mod init;
pub mod logs;
pub mod reset;
pub mod restart;
pub mod start;
pub mod status;
pub mod stop;
pub mod util;

use i2pm_config::{ConfigStore, Settings};
use i2pm_core::{BrowserProfiles, Daemon, ProxySettings};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Everything a router-bound command needs, built once per invocation.
pub struct Context {
    pub store: ConfigStore,
    pub settings: Settings,
    pub daemon: Daemon,
    pub browser: BrowserProfiles,
}

impl Context {
    /// Load the configuration (with environment overrides) and build the
    /// daemon controller for this platform.
    pub fn load() -> Result<Self, CliError> {
        let store = ConfigStore::open();
        let settings = store.settings()?;
        let daemon = Daemon::for_console(settings.i2pd.console_port)?;
        let browser = BrowserProfiles::new()?;
        tracing::debug!(
            config = %store.path().display(),
            manager = daemon.manager_name(),
            "context loaded"
        );
        Ok(Self {
            store,
            settings,
            daemon,
            browser,
        })
    }

    pub fn profile_name(&self) -> &str {
        &self.settings.firefox.profile_name
    }

    pub fn proxy(&self) -> ProxySettings {
        let i2pd = &self.settings.i2pd;
        ProxySettings {
            host: i2pd.host.clone(),
            http_port: i2pd.http_port,
            https_port: i2pd.https_port,
            socks_port: i2pd.socks_port,
        }
    }
}

/// Dispatch a subcommand to its handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    tracing::debug!(command = ?cmd, "dispatching command");
    match cmd {
        Command::Config(args) => config_cmd::handle(args, global),
        Command::Completions(args) => {
            use clap::CommandFactory;

            let mut cmd = crate::cli::Cli::command();
            clap_complete::generate(args.shell, &mut cmd, "i2p-manager", &mut std::io::stdout());
            Ok(())
        }
        Command::Init(args) => init::handle(&mut Context::load()?, args, global),
        Command::Start(args) => start::handle(&Context::load()?, args, global).await,
        Command::Stop => stop::handle(&Context::load()?, global).await,
        Command::Status(args) => status::handle(&Context::load()?, args, global).await,
        Command::Restart => restart::handle(&Context::load()?, global).await,
        Command::Browser => browser::handle(&Context::load()?, global).await,
        Command::Logs(args) => logs::handle(&Context::load()?, args, global).await,
        Command::Reset(args) => reset::handle(&mut Context::load()?, args, global).await,
    }
}
