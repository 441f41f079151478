//! Configuration for the i2p-manager CLI and dashboard.
//!
//! A JSON document on disk, backfilled from built-in defaults on every load.
//! Keys are addressed with dotted paths (`i2pd.http_port`). A typed
//! [`Settings`] view adds an environment overlay that is never written back.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use thiserror::Error;
use tracing::{debug, warn};

/// Directory name under the platform config root.
pub const APP_NAME: &str = "i2p-manager";

/// File name of the configuration document.
pub const CONFIG_FILE: &str = "config.json";

/// Prefix of environment overrides, e.g. `I2PM_I2PD__CONSOLE_PORT`.
pub const ENV_PREFIX: &str = "I2PM_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl ConfigError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

// ── Typed settings ──────────────────────────────────────────────────

/// Typed view of the configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub i2pd: I2pdSettings,
    pub firefox: FirefoxSettings,
    pub dashboard: DashboardSettings,
    pub version: String,
}

/// Router proxy and console ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct I2pdSettings {
    pub host: String,
    pub http_port: u16,
    pub https_port: u16,
    pub socks_port: u16,
    pub console_port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirefoxSettings {
    pub profile_name: String,
    pub harden_with_arkenfox: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSettings {
    /// Seconds between status polls.
    pub refresh_interval: u64,
    pub show_welcome: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            i2pd: I2pdSettings {
                host: "127.0.0.1".into(),
                http_port: 4444,
                https_port: 4444,
                socks_port: 4447,
                console_port: 7070,
            },
            firefox: FirefoxSettings {
                profile_name: "i2p-secure".into(),
                harden_with_arkenfox: true,
            },
            dashboard: DashboardSettings {
                refresh_interval: 5,
                show_welcome: true,
            },
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

impl Settings {
    fn from_document(doc: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(doc)
    }
}

/// The default document, as written by `init` and `reset`.
pub fn defaults() -> Value {
    let s = Settings::default();
    json!({
        "i2pd": {
            "host": s.i2pd.host,
            "http_port": s.i2pd.http_port,
            "https_port": s.i2pd.https_port,
            "socks_port": s.i2pd.socks_port,
            "console_port": s.i2pd.console_port,
        },
        "firefox": {
            "profile_name": s.firefox.profile_name,
            "harden_with_arkenfox": s.firefox.harden_with_arkenfox,
        },
        "dashboard": {
            "refresh_interval": s.dashboard.refresh_interval,
            "show_welcome": s.dashboard.show_welcome,
        },
        "version": s.version,
    })
}

// ── Merge & dotted keys ─────────────────────────────────────────────

/// Recursively overlay `custom` on `default`.
///
/// Objects merge key by key; anywhere else the custom value wins. Keys only
/// in `custom` are kept, keys only in `default` are filled in.
pub fn merge(default: &Value, custom: &Value) -> Value {
    match (default, custom) {
        (Value::Object(base), Value::Object(over)) => {
            let mut out = base.clone();
            for (key, value) in over {
                let merged = match base.get(key) {
                    Some(existing) => merge(existing, value),
                    None => value.clone(),
                };
                out.insert(key.clone(), merged);
            }
            Value::Object(out)
        }
        (_, custom) => custom.clone(),
    }
}

fn split_key(key: &str) -> Result<Vec<&str>, ConfigError> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(ConfigError::InvalidKey {
            key: key.into(),
            reason: "empty path segment".into(),
        });
    }
    Ok(parts)
}

/// Look up a dotted key. Missing keys and paths through scalars are `None`.
pub fn lookup<'a>(doc: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(doc, |node, part| node.as_object()?.get(part))
}

/// Set a dotted key, creating intermediate objects. A scalar in the way is
/// replaced by an object.
pub fn assign(doc: &mut Value, key: &str, value: Value) -> Result<(), ConfigError> {
    let parts = split_key(key)?;
    let Some((last, parents)) = parts.split_last() else {
        return Err(ConfigError::InvalidKey {
            key: key.into(),
            reason: "empty key".into(),
        });
    };

    let mut node = doc;
    for part in parents {
        node = object_mut(node).entry((*part).to_owned()).or_insert_with(|| Value::Object(Map::new()));
    }
    object_mut(node).insert((*last).to_owned(), value);
    Ok(())
}

fn object_mut(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!("node was just made an object"),
    }
}

/// Interpret a command-line value: JSON when it parses, a string otherwise.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", APP_NAME).map_or_else(
        || dirs_fallback().join(CONFIG_FILE),
        |dirs| dirs.config_dir().join(CONFIG_FILE),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push(APP_NAME);
    p
}

// ── Store ───────────────────────────────────────────────────────────

/// Handle on one configuration file and its merged contents.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    doc: Value,
    env_prefix: Option<String>,
}

impl ConfigStore {
    /// Store at the platform path, with environment overrides enabled.
    pub fn open() -> Self {
        Self::at(config_path()).with_env_prefix(ENV_PREFIX)
    }

    /// Store at an explicit path, without environment overrides.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        let mut store = Self {
            path: path.into(),
            doc: defaults(),
            env_prefix: None,
        };
        store.load();
        store
    }

    /// Read `<prefix><SECTION>__<KEY>` variables in [`Self::settings`].
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The merged document.
    pub fn document(&self) -> &Value {
        &self.doc
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Create the config directory, and the file with defaults if it is
    /// missing. An existing file is loaded, never overwritten.
    pub fn init(&mut self) -> Result<&Value, ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
        }
        if self.exists() {
            self.load();
        } else {
            self.save(defaults())?;
        }
        Ok(&self.doc)
    }

    /// Re-read the file and backfill defaults. A missing, unreadable, or
    /// corrupt file yields the defaults.
    pub fn load(&mut self) -> &Value {
        self.doc = match self.read_stored() {
            Ok(Some(stored)) => merge(&defaults(), &stored),
            Ok(None) => defaults(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable config");
                defaults()
            }
        };
        &self.doc
    }

    fn read_stored(&self) -> Result<Option<Value>, ConfigError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ConfigError::io(&self.path, e)),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Write `doc` as the whole configuration, pretty-printed.
    pub fn save(&mut self, doc: Value) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
        }
        let mut body = serde_json::to_string_pretty(&doc)?;
        body.push('\n');
        std::fs::write(&self.path, body).map_err(|e| ConfigError::io(&self.path, e))?;
        debug!(path = %self.path.display(), "config saved");
        self.doc = doc;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        lookup(&self.doc, key)
    }

    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.get(key).cloned().unwrap_or(default)
    }

    /// Set a dotted key and persist the document.
    ///
    /// The edited document must still read as [`Settings`]; a value of the
    /// wrong type is rejected and nothing is written.
    pub fn set(&mut self, key: &str, value: Value) -> Result<(), ConfigError> {
        let mut doc = self.doc.clone();
        assign(&mut doc, key, value)?;
        if let Err(e) = Settings::from_document(&doc) {
            return Err(ConfigError::InvalidKey {
                key: key.into(),
                reason: e.to_string(),
            });
        }
        self.save(doc)
    }

    /// Overwrite the file with the defaults.
    pub fn reset(&mut self) -> Result<(), ConfigError> {
        self.save(defaults())
    }

    /// Delete the file. Returns whether there was one.
    pub fn remove(&mut self) -> Result<bool, ConfigError> {
        self.doc = defaults();
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ConfigError::io(&self.path, e)),
        }
    }

    /// Typed settings with environment overrides applied.
    ///
    /// A stored document that does not fit [`Settings`] is ignored in favour
    /// of the defaults, like an unreadable file in [`Self::load`]. Only a bad
    /// environment override is an error.
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        let base = match Settings::from_document(&self.doc) {
            Ok(_) => self.doc.clone(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring mistyped config");
                defaults()
            }
        };
        let mut figment = Figment::from(Serialized::defaults(base));
        if let Some(prefix) = &self.env_prefix {
            figment = figment.merge(Env::prefixed(prefix).split("__"));
        }
        Ok(figment.extract()?)
    }
}
