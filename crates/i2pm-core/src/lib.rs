//! Router supervision and status reconciliation for the i2p-manager CLI
//! and dashboard.
//!
//! [`Daemon`] ties a platform [`ProcessManager`] to a [`StatusProbe`];
//! [`BrowserProfiles`] owns the isolated Firefox profile.

pub mod browser;
pub mod daemon;
pub mod error;
pub mod logs;
pub mod probe;
pub mod process;
pub mod scrape;
pub mod status;

// ── Primary re-exports ──────────────────────────────────────────────
pub use browser::{BrowserProfiles, Profile, ProxySettings};
pub use daemon::Daemon;
pub use error::{CoreError, Program};
pub use logs::LogFollower;
pub use probe::{ConsoleProbe, Endpoint, StatusProbe};
pub use process::{DAEMON, ProcessManager, for_current_platform};
pub use status::{ConnectivityClass, DaemonStatus, StatusReport, Uptime, classify};
