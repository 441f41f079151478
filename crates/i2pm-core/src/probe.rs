// Router console probing.
//
// A probe is two plain GETs against the router's web console: one to see
// whether anything answers, one to scrape counters from the status page.
// Failures never escape; they collapse into the status value instead.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tracing::{debug, trace};
use url::Url;

use crate::error::CoreError;
use crate::scrape::parse_console_counters;
use crate::status::DaemonStatus;

/// Timeout for the liveness request.
pub const LIVENESS_TIMEOUT: Duration = Duration::from_secs(2);

/// Timeout for the status page request.
pub const DETAIL_TIMEOUT: Duration = Duration::from_secs(5);

/// Host the router console listens on.
pub const LOOPBACK: &str = "127.0.0.1";

/// Where the router console can be reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// The console on the loopback interface.
    pub fn console(port: u16) -> Self {
        Self::new(LOOPBACK, port)
    }

    /// Root URL of the console, e.g. `http://127.0.0.1:7070/`.
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!("http://{}:{}/", self.host, self.port))
    }

    /// URL of the status page that carries the counters.
    pub fn status_url(&self) -> Result<Url, url::ParseError> {
        let mut url = self.base_url()?;
        url.set_query(Some("page=status"));
        Ok(url)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "http://{}:{}", self.host, self.port)
    }
}

/// Source of router status.
///
/// The console scrape is one implementation; a structured API could replace
/// it without callers noticing.
pub trait StatusProbe: Send + Sync {
    /// Whether the router answers at all.
    fn is_alive(&self, endpoint: &Endpoint) -> impl Future<Output = bool> + Send;

    /// Full status. Never fails: unreachable routers read as stopped.
    fn probe(&self, endpoint: &Endpoint) -> impl Future<Output = DaemonStatus> + Send;
}

/// Probe backed by the i2pd web console.
#[derive(Debug, Clone)]
pub struct ConsoleProbe {
    http: reqwest::Client,
    liveness_timeout: Duration,
    detail_timeout: Duration,
}

impl ConsoleProbe {
    pub fn new() -> Result<Self, CoreError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("i2p-manager/", env!("CARGO_PKG_VERSION")))
            .no_proxy()
            .build()
            .map_err(|e| CoreError::failed("build HTTP client", e.to_string()))?;
        Ok(Self::with_client(http))
    }

    /// Build a probe around an existing client.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self {
            http,
            liveness_timeout: LIVENESS_TIMEOUT,
            detail_timeout: DETAIL_TIMEOUT,
        }
    }

    /// Override the per-request timeouts.
    pub fn with_timeouts(mut self, liveness: Duration, detail: Duration) -> Self {
        self.liveness_timeout = liveness;
        self.detail_timeout = detail;
        self
    }

    async fn get_ok(&self, url: Url, timeout: Duration) -> Option<reqwest::Response> {
        match self.http.get(url.clone()).timeout(timeout).send().await {
            Ok(resp) if resp.status() == reqwest::StatusCode::OK => Some(resp),
            Ok(resp) => {
                debug!(%url, status = %resp.status(), "console answered with non-200");
                None
            }
            Err(e) => {
                trace!(%url, error = %e, "console request failed");
                None
            }
        }
    }

    async fn fetch_status_page(&self, endpoint: &Endpoint) -> Option<String> {
        let url = endpoint.status_url().ok()?;
        let resp = self.get_ok(url, self.detail_timeout).await?;
        match resp.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                debug!(error = %e, "failed to read console status body");
                None
            }
        }
    }
}

impl StatusProbe for ConsoleProbe {
    async fn is_alive(&self, endpoint: &Endpoint) -> bool {
        let Ok(url) = endpoint.base_url() else {
            return false;
        };
        self.get_ok(url, self.liveness_timeout).await.is_some()
    }

    async fn probe(&self, endpoint: &Endpoint) -> DaemonStatus {
        if !self.is_alive(endpoint).await {
            return DaemonStatus::stopped();
        }

        // Liveness is already established; a failed detail fetch only
        // loses the counters.
        match self.fetch_status_page(endpoint).await {
            Some(body) => {
                let counters = parse_console_counters(&body);
                debug!(
                    tunnels = counters.tunnels,
                    peers = counters.peers,
                    "console status scraped"
                );
                DaemonStatus::running_with(counters.tunnels, counters.peers)
            }
            None => DaemonStatus::running_without_detail(),
        }
    }
}
