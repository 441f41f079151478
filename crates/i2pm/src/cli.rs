//! Clap derive structures for the `i2p-manager` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// i2p-manager -- run an I2P router and a private Firefox profile
#[derive(Debug, Parser)]
#[command(
    name = "i2p-manager",
    version,
    about = "Simplified access to the I2P network",
    long_about = "Starts and supervises a local i2pd router, keeps an isolated Firefox\n\
        profile pointed at its proxy, and reports how far the router has\n\
        integrated into the network.\n\n\
        Run without a command to open the interactive dashboard.",
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Option<Command>,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Increase verbosity (-v, -vv, -vvv). `status -v` also shows details
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Dashboard log file (defaults to i2p-manager.log in the temp dir)
    #[arg(long, env = "I2PM_LOG_FILE", global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

// ── Output Format ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table (default)
    Table,
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the configuration and the hardened Firefox profile
    Init(InitArgs),

    /// Start the I2P router and launch the browser
    Start(StartArgs),

    /// Stop the I2P router
    Stop,

    /// Show router status and network integration
    #[command(alias = "st")]
    Status(StatusArgs),

    /// Stop, pause, and start the router again
    Restart,

    /// Launch Firefox with the I2P profile
    Browser,

    /// View or edit the configuration
    Config(ConfigArgs),

    /// Show router logs
    Logs(LogsArgs),

    /// Remove the Firefox profile and configuration
    Reset(ResetArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Command Arguments ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Recreate the profile even if it already exists
    #[arg(long, short = 'f')]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct StartArgs {
    /// Don't launch Firefox
    #[arg(long)]
    pub no_browser: bool,
}

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Output format
    #[arg(long, short = 'o', default_value = "table")]
    pub output: OutputFormat,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: Option<ConfigCommand>,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the merged configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Print a single value by dotted key (e.g. i2pd.http_port)
    Get {
        /// Dotted key
        key: String,
    },

    /// Set a value by dotted key. Parsed as JSON when possible
    Set {
        /// Dotted key
        key: String,
        /// New value
        value: String,
    },

    /// Open the configuration in $EDITOR (the default)
    Edit,
}

#[derive(Debug, Args)]
pub struct LogsArgs {
    /// Keep printing new lines as they are written
    #[arg(long, short = 'f')]
    pub follow: bool,

    /// Number of lines to show
    #[arg(long, short = 'n', default_value_t = 50)]
    pub lines: usize,
}

#[derive(Debug, Args)]
pub struct ResetArgs {
    /// Leave the router's own network data in place
    #[arg(long, alias = "keep-i2pd-data")]
    pub keep_data: bool,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
