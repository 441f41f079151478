// ── Router status model ──
//
// A `DaemonStatus` is rebuilt on every probe and thrown away once rendered.
// `ConnectivityClass` is derived from it with no hidden state.

use std::fmt;

use serde::{Serialize, Serializer};
use strum::{Display, EnumIter};

/// Peers below this count mean the router is still bootstrapping.
pub const CONNECTING_BELOW: u32 = 10;

/// Peers at or above this count mean the router is fully integrated.
pub const CONNECTED_AT: u32 = 50;

/// Router uptime as reported by a probe.
///
/// The console page does not expose a parseable uptime, so this stays
/// opaque: zero when the router is down, unknown when it is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Uptime {
    #[default]
    Zero,
    Unknown,
}

impl fmt::Display for Uptime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => f.write_str("0"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

/// Serialized as `0` or `"unknown"`.
impl Serialize for Uptime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Zero => serializer.serialize_u8(0),
            Self::Unknown => serializer.serialize_str("unknown"),
        }
    }
}

/// Snapshot of the router daemon taken by a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DaemonStatus {
    pub running: bool,
    pub peers: u32,
    pub tunnels: u32,
    pub uptime: Uptime,
}

impl DaemonStatus {
    /// The router did not answer the liveness request.
    pub const fn stopped() -> Self {
        Self {
            running: false,
            peers: 0,
            tunnels: 0,
            uptime: Uptime::Zero,
        }
    }

    /// The router is alive but its counters could not be read.
    pub const fn running_without_detail() -> Self {
        Self {
            running: true,
            peers: 0,
            tunnels: 0,
            uptime: Uptime::Unknown,
        }
    }

    /// The router is alive and reported its counters.
    pub const fn running_with(tunnels: u32, peers: u32) -> Self {
        Self {
            running: true,
            peers,
            tunnels,
            uptime: Uptime::Unknown,
        }
    }
}

/// How far the router has integrated into the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum ConnectivityClass {
    Disconnected,
    Connecting,
    Integrating,
    Connected,
}

impl ConnectivityClass {
    /// Upper-case badge text used by the dashboard.
    pub fn badge(self) -> &'static str {
        match self {
            Self::Disconnected => "DISCONNECTED",
            Self::Connecting => "CONNECTING",
            Self::Integrating => "INTEGRATING",
            Self::Connected => "CONNECTED",
        }
    }

    /// One-line progress message shown next to the peer counters.
    pub fn headline(self) -> &'static str {
        match self {
            Self::Disconnected => "I2P is not running",
            Self::Connecting => "Building connections...",
            Self::Integrating => "Integrating...",
            Self::Connected => "Fully Integrated",
        }
    }

    /// Secondary hint printed under the headline.
    pub fn hint(self) -> &'static str {
        match self {
            Self::Disconnected => "Start I2P with: i2p-manager start",
            Self::Connecting => "(10-30 min on first run)",
            Self::Integrating => "(May take a few minutes)",
            Self::Connected => "Ready to browse I2P",
        }
    }

    pub fn is_running(self) -> bool {
        self != Self::Disconnected
    }
}

/// Classify a probe result.
///
/// Bands are inclusive on their lower bound: 9 peers is still connecting,
/// 10 is integrating, 49 is integrating, 50 is connected.
pub fn classify(status: &DaemonStatus) -> ConnectivityClass {
    if !status.running {
        return ConnectivityClass::Disconnected;
    }
    match status.peers {
        p if p < CONNECTING_BELOW => ConnectivityClass::Connecting,
        p if p < CONNECTED_AT => ConnectivityClass::Integrating,
        _ => ConnectivityClass::Connected,
    }
}

/// Raw status fused with its classification, for callers that need both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    #[serde(flatten)]
    pub status: DaemonStatus,
    pub class: ConnectivityClass,
}

impl From<DaemonStatus> for StatusReport {
    fn from(status: DaemonStatus) -> Self {
        Self {
            class: classify(&status),
            status,
        }
    }
}
