#![allow(clippy::unwrap_used)]
// Console probe tests against a mock i2pd web console.

use std::time::Duration;

use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use i2pm_core::{ConnectivityClass, ConsoleProbe, DaemonStatus, Endpoint, StatusProbe, StatusReport, Uptime};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Endpoint, ConsoleProbe) {
    let server = MockServer::start().await;
    let addr = server.address();
    let endpoint = Endpoint::new(addr.ip().to_string(), addr.port());
    let probe = ConsoleProbe::with_client(reqwest::Client::new())
        .with_timeouts(Duration::from_millis(500), Duration::from_millis(500));
    (server, endpoint, probe)
}

async fn mount_root(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(status).set_body_string("<html>i2pd webconsole</html>"))
        .mount(server)
        .await;
}

async fn mount_status_page(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("page", "status"))
        .respond_with(template)
        .mount(server)
        .await;
}

fn console_page(tunnels: u32, peers: u32) -> String {
    format!(
        "<html><body><div class=\"content\">\
         <b>Network status:</b> OK<br>\
         <b>Known Routers:</b> {peers}<br>\
         <b>Client Tunnels:</b> {tunnels}<br>\
         </div></body></html>"
    )
}

// ── Liveness ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_connection_refused_reads_as_stopped() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let probe = ConsoleProbe::new().unwrap();
    let endpoint = Endpoint::console(port);

    assert!(!probe.is_alive(&endpoint).await);
    assert_eq!(probe.probe(&endpoint).await, DaemonStatus::stopped());
}

#[tokio::test]
async fn test_non_200_liveness_reads_as_stopped() {
    let (server, endpoint, probe) = setup().await;
    mount_root(&server, 503).await;

    let status = probe.probe(&endpoint).await;
    assert_eq!(status, DaemonStatus::stopped());
    assert_eq!(status.uptime, Uptime::Zero);
}

#[tokio::test]
async fn test_slow_console_times_out_as_stopped() {
    let (server, endpoint, probe) = setup().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    assert_eq!(probe.probe(&endpoint).await, DaemonStatus::stopped());
}

// ── Detail ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_counters_are_scraped() {
    let (server, endpoint, probe) = setup().await;
    mount_root(&server, 200).await;
    mount_status_page(&server, ResponseTemplate::new(200).set_body_string(console_page(8, 156))).await;

    let status = probe.probe(&endpoint).await;
    assert_eq!(
        status,
        DaemonStatus {
            running: true,
            peers: 156,
            tunnels: 8,
            uptime: Uptime::Unknown,
        }
    );
}

#[tokio::test]
async fn test_failed_detail_keeps_running_with_zeros() {
    let (server, endpoint, probe) = setup().await;
    mount_root(&server, 200).await;
    mount_status_page(&server, ResponseTemplate::new(500)).await;

    assert_eq!(probe.probe(&endpoint).await, DaemonStatus::running_without_detail());
}

#[tokio::test]
async fn test_page_without_labels_reads_zero() {
    let (server, endpoint, probe) = setup().await;
    mount_root(&server, 200).await;
    mount_status_page(&server, ResponseTemplate::new(200).set_body_string("Some text")).await;

    let status = probe.probe(&endpoint).await;
    assert!(status.running);
    assert_eq!((status.peers, status.tunnels), (0, 0));
}

#[tokio::test]
async fn test_is_alive_does_not_fetch_status_page() {
    let (server, endpoint, probe) = setup().await;
    mount_root(&server, 200).await;
    Mock::given(method("GET"))
        .and(query_param("page", "status"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    assert!(probe.is_alive(&endpoint).await);
}

// ── Classification over the wire ────────────────────────────────────

#[tokio::test]
async fn test_router_progresses_through_classes() {
    let cases = [
        (5, ConnectivityClass::Connecting),
        (25, ConnectivityClass::Integrating),
        (60, ConnectivityClass::Connected),
    ];

    for (peers, expected) in cases {
        let (server, endpoint, probe) = setup().await;
        mount_root(&server, 200).await;
        mount_status_page(&server, ResponseTemplate::new(200).set_body_string(console_page(3, peers))).await;

        let report = StatusReport::from(probe.probe(&endpoint).await);
        assert_eq!(report.class, expected, "peers = {peers}");
        assert_eq!(report.status.peers, peers);
    }
}
