// ── Console page scraping ──
//
// The i2pd web console has no structured API, so the counters are pulled
// from its HTML by label text. Anything that doesn't match reads as zero.

use std::sync::LazyLock;

use regex::Regex;

/// Label of the client tunnel counter on the console status page.
pub const TUNNELS_LABEL: &str = "Client Tunnels";

/// Label of the known-router counter on the console status page.
pub const PEERS_LABEL: &str = "Known Routers";

static TUNNELS: LazyLock<Regex> = LazyLock::new(|| counter_pattern(TUNNELS_LABEL));
static PEERS: LazyLock<Regex> = LazyLock::new(|| counter_pattern(PEERS_LABEL));

/// Label, then any run of non-digits, then the first run of digits.
fn counter_pattern(label: &str) -> Regex {
    Regex::new(&format!(r"(?i){}[^0-9]*([0-9]+)", regex::escape(label)))
        .unwrap_or_else(|e| unreachable!("counter pattern for {label:?} is invalid: {e}"))
}

fn extract(pattern: &Regex, body: &str) -> u32 {
    pattern
        .captures(body)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Counters read from a console status page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConsoleCounters {
    pub tunnels: u32,
    pub peers: u32,
}

/// Extract the tunnel and peer counters from a console page body.
pub fn parse_console_counters(body: &str) -> ConsoleCounters {
    ConsoleCounters {
        tunnels: extract(&TUNNELS, body),
        peers: extract(&PEERS, body),
    }
}

/// Find the first number following `label`, case-insensitively.
pub fn extract_counter(body: &str, label: &str) -> u32 {
    extract(&counter_pattern(label), body)
}
