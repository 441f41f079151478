//! Platform process control.
//!
//! Each platform starts and stops i2pd through its own service manager.
//! One [`ProcessManager`] is chosen at startup by [`for_current_platform`].
//! All commands here are blocking and never retried.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{CoreError, Program};

/// Name of the router daemon binary.
pub const DAEMON: &str = "i2pd";

/// Starts, stops, and finds the router daemon on one platform.
pub trait ProcessManager: Send + Sync + fmt::Debug {
    /// Short name for logs and `status --verbose`.
    fn name(&self) -> &'static str;

    /// Path of the installed daemon binary, if any.
    fn locate(&self) -> Option<PathBuf>;

    /// Ask the platform to start the daemon. Returns once the request has
    /// been issued; the daemon may still be booting.
    fn start(&self) -> Result<(), CoreError>;

    /// Ask the platform to stop the daemon.
    fn stop(&self) -> Result<(), CoreError>;

    /// Places the daemon log may live, most likely first.
    fn log_candidates(&self) -> Vec<PathBuf>;
}

/// Pick the manager for the platform this binary was built for.
pub fn for_current_platform() -> Arc<dyn ProcessManager> {
    if cfg!(windows) {
        Arc::new(WindowsManager)
    } else if cfg!(target_os = "macos") {
        Arc::new(HomebrewManager)
    } else {
        Arc::new(SystemdManager)
    }
}

// ── Command helpers ──────────────────────────────────────────────────

/// Run a command to completion with output discarded. A non-zero exit is
/// an `OperationFailed`; a missing binary is `NotFound`.
pub(crate) fn run<S: AsRef<OsStr>>(program: &str, args: &[S], operation: &str) -> Result<(), CoreError> {
    debug!(program, "running command");
    let status = Command::new(program)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| CoreError::from_spawn(Program::Tool(program.to_owned()), operation, &e))?;

    if status.success() {
        Ok(())
    } else {
        Err(CoreError::failed(
            operation,
            format!("{program} exited with {status}"),
        ))
    }
}

/// Run a command and ignore how it went.
fn run_ignoring_status(program: &str, args: &[&str]) {
    if let Err(e) = run(program, args, program) {
        debug!(program, error = %e, "command failed, ignoring");
    }
}

/// Spawn a process that outlives us: its own process group, no stdio.
///
/// The caller never waits; a background thread reaps the child when it exits.
pub(crate) fn spawn_detached<S: AsRef<OsStr>>(
    subject: Program,
    program: &Path,
    args: &[S],
    operation: &str,
) -> Result<(), CoreError> {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
        cmd.creation_flags(CREATE_NEW_PROCESS_GROUP);
    }

    let mut child = cmd
        .spawn()
        .map_err(|e| CoreError::from_spawn(subject, operation, &e))?;
    let pid = child.id();
    info!(pid, program = %program.display(), "spawned detached process");

    let reaper = std::thread::Builder::new()
        .name(format!("reap-{pid}"))
        .spawn(move || match child.wait() {
            Ok(status) => debug!(pid, %status, "detached process exited"),
            Err(e) => debug!(pid, error = %e, "could not wait on detached process"),
        });
    if let Err(e) = reaper {
        warn!(pid, error = %e, "no reaper thread for detached process");
    }
    Ok(())
}

fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

fn start_directly() -> Result<(), CoreError> {
    spawn_detached(Program::Daemon, Path::new(DAEMON), &["--daemon"], "start i2pd")
}

// ── Linux / other unix ───────────────────────────────────────────────

/// systemd unit, with a direct spawn when `systemctl` refuses.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemdManager;

impl ProcessManager for SystemdManager {
    fn name(&self) -> &'static str {
        "systemd"
    }

    fn locate(&self) -> Option<PathBuf> {
        which::which(DAEMON).ok()
    }

    fn start(&self) -> Result<(), CoreError> {
        match run("sudo", &["systemctl", "start", DAEMON], "start i2pd") {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(error = %e, "systemctl start failed, launching i2pd directly");
                start_directly()
            }
        }
    }

    fn stop(&self) -> Result<(), CoreError> {
        if let Err(e) = run("sudo", &["systemctl", "stop", DAEMON], "stop i2pd") {
            warn!(error = %e, "systemctl stop failed, falling back to pkill");
            run_ignoring_status("pkill", &[DAEMON]);
        }
        Ok(())
    }

    fn log_candidates(&self) -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("/var/log/i2pd/i2pd.log")];
        if let Some(home) = home_dir() {
            paths.push(home.join(".i2pd").join("i2pd.log"));
        }
        paths
    }
}

// ── macOS ────────────────────────────────────────────────────────────

/// `brew services`, with a direct spawn when starting fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct HomebrewManager;

impl ProcessManager for HomebrewManager {
    fn name(&self) -> &'static str {
        "homebrew"
    }

    fn locate(&self) -> Option<PathBuf> {
        which::which(DAEMON).ok()
    }

    fn start(&self) -> Result<(), CoreError> {
        match run("brew", &["services", "start", DAEMON], "start i2pd") {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(error = %e, "brew services start failed, launching i2pd directly");
                start_directly()
            }
        }
    }

    fn stop(&self) -> Result<(), CoreError> {
        run("brew", &["services", "stop", DAEMON], "stop i2pd")
    }

    fn log_candidates(&self) -> Vec<PathBuf> {
        vec![
            PathBuf::from("/usr/local/var/log/i2pd/i2pd.log"),
            PathBuf::from("/opt/homebrew/var/log/i2pd/i2pd.log"),
        ]
    }
}

// ── Windows ──────────────────────────────────────────────────────────

/// Direct spawn of `i2pd.exe`, stopped with `taskkill`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsManager;

impl WindowsManager {
    fn install_candidates() -> Vec<PathBuf> {
        let program_files = std::env::var_os("ProgramFiles")
            .map_or_else(|| PathBuf::from(r"C:\Program Files"), PathBuf::from);
        let program_files_x86 = std::env::var_os("ProgramFiles(x86)")
            .map_or_else(|| PathBuf::from(r"C:\Program Files (x86)"), PathBuf::from);

        let mut paths = vec![
            program_files.join("i2pd").join("i2pd.exe"),
            program_files_x86.join("i2pd").join("i2pd.exe"),
        ];
        if let Some(dirs) = directories::BaseDirs::new() {
            paths.push(dirs.data_local_dir().join("i2pd").join("i2pd.exe"));
        }
        paths
    }
}

impl ProcessManager for WindowsManager {
    fn name(&self) -> &'static str {
        "windows"
    }

    fn locate(&self) -> Option<PathBuf> {
        Self::install_candidates()
            .into_iter()
            .find(|p| p.is_file())
            .or_else(|| which::which(DAEMON).ok())
    }

    fn start(&self) -> Result<(), CoreError> {
        let exe = self.locate().ok_or_else(|| CoreError::not_found(Program::Daemon))?;
        spawn_detached(Program::Daemon, &exe, &["--daemon"], "start i2pd")
    }

    fn stop(&self) -> Result<(), CoreError> {
        run_ignoring_status("taskkill", &["/F", "/IM", "i2pd.exe"]);
        Ok(())
    }

    fn log_candidates(&self) -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(r"C:\ProgramData\i2pd\i2pd.log")];
        if let Some(dirs) = directories::BaseDirs::new() {
            paths.push(dirs.data_dir().join("i2pd").join("i2pd.log"));
        }
        paths
    }
}
