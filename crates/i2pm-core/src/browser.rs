// ── Firefox profile management ──
//
// An isolated Firefox profile with hardening and proxy preferences written
// to its `user.js`. Profiles live in Firefox's own profiles directory as
// `<name>.default`.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{CoreError, Program};
use crate::process::spawn_detached;

/// How long `firefox -CreateProfile` may take before it is killed.
pub const CREATE_PROFILE_TIMEOUT: Duration = Duration::from_secs(10);

/// Display name of the browser in messages.
pub const BROWSER: &str = "Firefox";
const USER_JS: &str = "user.js";

// ── Preferences ──────────────────────────────────────────────────────

/// Value of a single `user_pref` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefValue<'a> {
    Bool(bool),
    Int(u32),
    Str(&'a str),
}

impl fmt::Display for PrefValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
        }
    }
}

/// Built-in hardening set written by `apply_hardening`.
pub const HARDENING_PREFS: &[(&str, PrefValue<'static>)] = &[
    ("privacy.resistFingerprinting", PrefValue::Bool(true)),
    ("privacy.trackingprotection.enabled", PrefValue::Bool(true)),
    ("media.peerconnection.enabled", PrefValue::Bool(false)),
    ("webgl.disabled", PrefValue::Bool(true)),
    ("geo.enabled", PrefValue::Bool(false)),
    ("network.dns.disablePrefetch", PrefValue::Bool(true)),
    ("network.prefetch-next", PrefValue::Bool(false)),
    ("toolkit.telemetry.enabled", PrefValue::Bool(false)),
    ("datareporting.healthreport.uploadEnabled", PrefValue::Bool(false)),
    ("dom.security.https_only_mode", PrefValue::Bool(true)),
];

fn render_prefs(header: &str, prefs: &[(&str, PrefValue<'_>)]) -> String {
    let mut out = format!("\n// {header}\n");
    for (key, value) in prefs {
        out.push_str(&format!("user_pref(\"{key}\", {value});\n"));
    }
    out
}

/// Router proxy ports the browser is pointed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxySettings {
    pub host: String,
    pub http_port: u16,
    pub https_port: u16,
    pub socks_port: u16,
}

impl ProxySettings {
    fn prefs(&self) -> Vec<(&'static str, PrefValue<'_>)> {
        let host = PrefValue::Str(&self.host);
        vec![
            ("network.proxy.type", PrefValue::Int(1)),
            ("network.proxy.http", host),
            ("network.proxy.http_port", PrefValue::Int(self.http_port.into())),
            ("network.proxy.ssl", host),
            ("network.proxy.ssl_port", PrefValue::Int(self.https_port.into())),
            ("network.proxy.socks", host),
            ("network.proxy.socks_port", PrefValue::Int(self.socks_port.into())),
            ("network.proxy.socks_version", PrefValue::Int(5)),
            ("network.proxy.no_proxies_on", PrefValue::Str("")),
            ("network.proxy.socks_remote_dns", PrefValue::Bool(true)),
            ("media.peerconnection.ice.proxy_only", PrefValue::Bool(true)),
        ]
    }
}

// ── Profiles ─────────────────────────────────────────────────────────

/// A created browser profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub name: String,
    pub path: PathBuf,
}

/// Firefox's profiles directory for this platform.
pub fn default_profiles_dir() -> Option<PathBuf> {
    let dirs = directories::BaseDirs::new()?;
    let dir = if cfg!(target_os = "macos") {
        dirs.home_dir()
            .join("Library")
            .join("Application Support")
            .join("Firefox")
            .join("Profiles")
    } else if cfg!(windows) {
        dirs.data_dir().join("Mozilla").join("Firefox").join("Profiles")
    } else {
        dirs.home_dir().join(".mozilla").join("firefox")
    };
    Some(dir)
}

/// Where Firefox is installed, if it is.
pub fn locate_firefox() -> Option<PathBuf> {
    if cfg!(target_os = "macos") {
        let app = PathBuf::from("/Applications/Firefox.app/Contents/MacOS/firefox");
        app.is_file().then_some(app)
    } else if cfg!(windows) {
        [
            r"C:\Program Files\Mozilla Firefox\firefox.exe",
            r"C:\Program Files (x86)\Mozilla Firefox\firefox.exe",
        ]
        .into_iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
    } else {
        which::which("firefox").ok()
    }
}

/// Creates, configures, and launches Firefox profiles.
#[derive(Debug, Clone)]
pub struct BrowserProfiles {
    profiles_dir: PathBuf,
    executable: Option<PathBuf>,
}

impl BrowserProfiles {
    /// Use Firefox's real profiles directory and installation.
    pub fn new() -> Result<Self, CoreError> {
        let profiles_dir = default_profiles_dir()
            .ok_or_else(|| CoreError::failed("locate profiles directory", "no home directory"))?;
        Ok(Self {
            profiles_dir,
            executable: None,
        })
    }

    /// Use an explicit profiles directory.
    pub fn with_profiles_dir(profiles_dir: impl Into<PathBuf>) -> Self {
        Self {
            profiles_dir: profiles_dir.into(),
            executable: None,
        }
    }

    /// Use this executable instead of searching for Firefox.
    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = Some(executable.into());
        self
    }

    pub fn profiles_dir(&self) -> &Path {
        &self.profiles_dir
    }

    pub fn executable(&self) -> Result<PathBuf, CoreError> {
        self.executable
            .clone()
            .or_else(locate_firefox)
            .ok_or_else(|| CoreError::not_found(Program::Browser))
    }

    pub fn is_installed(&self) -> bool {
        self.executable().is_ok()
    }

    pub fn profile_path(&self, name: &str) -> PathBuf {
        self.profiles_dir.join(format!("{name}.default"))
    }

    pub fn profile_exists(&self, name: &str) -> bool {
        self.profile_path(name).is_dir()
    }

    /// Register the profile with Firefox and make sure its directory
    /// exists. Registration is best effort; the directory is not.
    pub fn create_profile(&self, name: &str) -> Result<Profile, CoreError> {
        let exe = self.executable()?;
        std::fs::create_dir_all(&self.profiles_dir)
            .map_err(|e| CoreError::fs("create", &self.profiles_dir, e))?;

        let path = self.profile_path(name);
        let spec = format!("{name} {}", path.display());
        if let Err(e) = run_with_timeout(&exe, &["-CreateProfile", &spec], CREATE_PROFILE_TIMEOUT) {
            debug!(error = %e, "firefox -CreateProfile failed, continuing");
        }

        std::fs::create_dir_all(&path).map_err(|e| CoreError::fs("create", &path, e))?;
        info!(name, path = %path.display(), "browser profile ready");
        Ok(Profile {
            name: name.to_owned(),
            path,
        })
    }

    /// Remove the profile directory. Missing profiles are not an error.
    pub fn delete_profile(&self, name: &str) -> Result<(), CoreError> {
        let path = self.profile_path(name);
        if path.exists() {
            std::fs::remove_dir_all(&path).map_err(|e| CoreError::fs("remove", &path, e))?;
            info!(path = %path.display(), "browser profile deleted");
        }
        Ok(())
    }

    /// Replace the profile's `user.js` with the hardening set.
    pub fn apply_hardening(&self, profile_path: &Path) -> Result<(), CoreError> {
        let user_js = profile_path.join(USER_JS);
        let body = render_prefs("Minimal I2P Firefox Hardening", HARDENING_PREFS);
        std::fs::write(&user_js, body).map_err(|e| CoreError::fs("write", &user_js, e))
    }

    /// Append proxy preferences to the profile's `user.js`.
    pub fn configure_proxy(&self, profile_path: &Path, proxy: &ProxySettings) -> Result<(), CoreError> {
        let user_js = profile_path.join(USER_JS);
        let body = render_prefs("I2P Proxy Configuration", &proxy.prefs());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&user_js)
            .map_err(|e| CoreError::fs("open", &user_js, e))?;
        file.write_all(body.as_bytes())
            .map_err(|e| CoreError::fs("write", &user_js, e))
    }

    /// Start Firefox on the profile and return immediately.
    pub fn launch(&self, name: &str) -> Result<(), CoreError> {
        let exe = self.executable()?;
        spawn_detached(Program::Browser, &exe, &["-P", name, "-no-remote"], "launch Firefox")?;
        info!(profile = name, "browser launched");
        Ok(())
    }
}

fn run_with_timeout(program: &Path, args: &[&str], timeout: Duration) -> Result<(), CoreError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| CoreError::from_spawn(Program::Browser, "create profile", &e))?;

    let deadline = Instant::now() + timeout;
    loop {
        if child.try_wait()?.is_some() {
            return Ok(());
        }
        if Instant::now() >= deadline {
            warn!(program = %program.display(), "timed out, killing");
            let _ = child.kill();
            let _ = child.wait();
            return Err(CoreError::failed("create profile", "timed out"));
        }
        std::thread::sleep(Duration::from_millis(100));
    }
}
