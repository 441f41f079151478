// ── Daemon controller ──
//
// Ties a platform `ProcessManager` to a `StatusProbe`. Process commands are
// blocking, so they run on tokio's blocking pool; probes are plain async.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument};

use crate::error::CoreError;
use crate::logs;
use crate::probe::{ConsoleProbe, Endpoint, StatusProbe};
use crate::process::{self, ProcessManager};
use crate::status::StatusReport;

/// Pause between stop and start during a restart.
pub const RESTART_PAUSE: Duration = Duration::from_secs(2);

/// Handle on the local i2pd router.
#[derive(Debug)]
pub struct Daemon<P = ConsoleProbe> {
    manager: Arc<dyn ProcessManager>,
    probe: Arc<P>,
    endpoint: Endpoint,
}

impl<P> Clone for Daemon<P> {
    fn clone(&self) -> Self {
        Self {
            manager: Arc::clone(&self.manager),
            probe: Arc::clone(&self.probe),
            endpoint: self.endpoint.clone(),
        }
    }
}

impl Daemon<ConsoleProbe> {
    /// Controller for this platform, probing the console on `console_port`.
    pub fn for_console(console_port: u16) -> Result<Self, CoreError> {
        Ok(Self::new(
            process::for_current_platform(),
            ConsoleProbe::new()?,
            Endpoint::console(console_port),
        ))
    }
}

impl<P: StatusProbe + 'static> Daemon<P> {
    pub fn new(manager: Arc<dyn ProcessManager>, probe: P, endpoint: Endpoint) -> Self {
        Self {
            manager,
            probe: Arc::new(probe),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Name of the platform process manager in use.
    pub fn manager_name(&self) -> &'static str {
        self.manager.name()
    }

    /// Whether an i2pd binary can be found.
    pub fn is_installed(&self) -> bool {
        self.manager.locate().is_some()
    }

    /// Liveness only; no status page fetch.
    pub async fn is_running(&self) -> bool {
        self.probe.is_alive(&self.endpoint).await
    }

    /// Probe and classify.
    pub async fn get_status(&self) -> StatusReport {
        StatusReport::from(self.probe.probe(&self.endpoint).await)
    }

    #[instrument(skip(self), fields(manager = self.manager.name()))]
    pub async fn start(&self) -> Result<(), CoreError> {
        self.blocking("start i2pd", |pm| pm.start()).await?;
        info!("start requested");
        Ok(())
    }

    #[instrument(skip(self), fields(manager = self.manager.name()))]
    pub async fn stop(&self) -> Result<(), CoreError> {
        self.blocking("stop i2pd", |pm| pm.stop()).await?;
        info!("stop requested");
        Ok(())
    }

    /// Stop, wait `RESTART_PAUSE`, start.
    pub async fn restart(&self) -> Result<(), CoreError> {
        self.stop().await?;
        tokio::time::sleep(RESTART_PAUSE).await;
        self.start().await
    }

    /// First log file that exists on this platform.
    pub fn log_path(&self) -> Option<PathBuf> {
        logs::first_existing(&self.manager.log_candidates())
    }

    /// Last `lines` lines of the daemon log.
    pub fn read_logs(&self, lines: usize) -> Result<Vec<String>, CoreError> {
        let candidates = self.manager.log_candidates();
        let path = logs::first_existing(&candidates)
            .ok_or(CoreError::LogNotFound { searched: candidates })?;
        logs::tail(&path, lines)
    }

    async fn blocking<F>(&self, operation: &'static str, f: F) -> Result<(), CoreError>
    where
        F: FnOnce(&dyn ProcessManager) -> Result<(), CoreError> + Send + 'static,
    {
        let manager = Arc::clone(&self.manager);
        tokio::task::spawn_blocking(move || f(manager.as_ref()))
            .await
            .map_err(|e| CoreError::failed(operation, e.to_string()))?
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::status::{ConnectivityClass, DaemonStatus};

    #[derive(Debug, Default)]
    struct Recorder {
        calls: Mutex<Vec<&'static str>>,
        logs: Vec<PathBuf>,
        fail_stop: bool,
    }

    impl ProcessManager for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }
        fn locate(&self) -> Option<PathBuf> {
            None
        }
        fn start(&self) -> Result<(), CoreError> {
            self.calls.lock().unwrap().push("start");
            Ok(())
        }
        fn stop(&self) -> Result<(), CoreError> {
            self.calls.lock().unwrap().push("stop");
            if self.fail_stop {
                return Err(CoreError::failed("stop i2pd", "refused"));
            }
            Ok(())
        }
        fn log_candidates(&self) -> Vec<PathBuf> {
            self.logs.clone()
        }
    }

    struct Fixed(DaemonStatus);

    impl StatusProbe for Fixed {
        async fn is_alive(&self, _: &Endpoint) -> bool {
            self.0.running
        }
        async fn probe(&self, _: &Endpoint) -> DaemonStatus {
            self.0
        }
    }

    fn daemon(manager: Arc<Recorder>, status: DaemonStatus) -> Daemon<Fixed> {
        Daemon::new(manager, Fixed(status), Endpoint::console(7070))
    }

    #[tokio::test(start_paused = true)]
    async fn restart_stops_pauses_then_starts() {
        let rec = Arc::new(Recorder::default());
        let d = daemon(Arc::clone(&rec), DaemonStatus::stopped());

        let before = tokio::time::Instant::now();
        d.restart().await.unwrap();

        assert_eq!(*rec.calls.lock().unwrap(), vec!["stop", "start"]);
        assert!(before.elapsed() >= RESTART_PAUSE);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_does_not_start_after_failed_stop() {
        let rec = Arc::new(Recorder {
            fail_stop: true,
            ..Recorder::default()
        });
        let d = daemon(Arc::clone(&rec), DaemonStatus::stopped());

        assert!(d.restart().await.is_err());
        assert_eq!(*rec.calls.lock().unwrap(), vec!["stop"]);
    }

    #[tokio::test]
    async fn status_is_classified() {
        let d = daemon(Arc::default(), DaemonStatus::running_with(8, 25));
        let report = d.get_status().await;
        assert_eq!(report.class, ConnectivityClass::Integrating);
        assert!(d.is_running().await);
        assert!(!d.is_installed());
    }

    #[test]
    fn missing_logs_report_searched_paths() {
        let dir = tempfile::tempdir().unwrap();
        let rec = Arc::new(Recorder {
            logs: vec![dir.path().join("a.log"), dir.path().join("b.log")],
            ..Recorder::default()
        });
        let d = daemon(rec, DaemonStatus::stopped());

        assert_eq!(d.log_path(), None);
        match d.read_logs(10).unwrap_err() {
            CoreError::LogNotFound { searched } => assert_eq!(searched.len(), 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn logs_come_from_first_existing_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let second = dir.path().join("b.log");
        std::fs::write(&second, "one\ntwo\nthree\n").unwrap();
        let rec = Arc::new(Recorder {
            logs: vec![dir.path().join("a.log"), second.clone()],
            ..Recorder::default()
        });
        let d = daemon(rec, DaemonStatus::stopped());

        assert_eq!(d.log_path(), Some(second));
        assert_eq!(d.read_logs(2).unwrap(), vec!["two", "three"]);
    }
}
