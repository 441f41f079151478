//! Integration tests for the `i2p-manager` binary.
//!
//! Every test runs with HOME and XDG_CONFIG_HOME pointed at a temporary
//! directory and the console port pointed at a closed local port, so no
//! real configuration, profile, or router is touched.
#![allow(clippy::unwrap_used)]

use std::net::TcpListener;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

/// A port nothing listens on.
fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Build a [`Command`] for the binary with an isolated home directory.
fn i2pm_cmd(home: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("i2p-manager");
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env("NO_COLOR", "1")
        .env("I2PM_I2PD__CONSOLE_PORT", closed_port().to_string())
        .env_remove("I2PM_LOG_FILE")
        .env_remove("RUST_LOG");
    cmd
}

fn home() -> TempDir {
    tempfile::tempdir().unwrap()
}

fn config_file(home: &TempDir) -> std::path::PathBuf {
    home.path().join(".config").join("i2p-manager").join("config.json")
}

/// A directory to use as the whole PATH, optionally holding a `firefox`
/// script that exits immediately.
#[cfg(unix)]
fn bin_dir(home: &TempDir, with_firefox: bool) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let bin = home.path().join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    if with_firefox {
        let firefox = bin.join("firefox");
        std::fs::write(&firefox, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&firefox, std::fs::Permissions::from_mode(0o755)).unwrap();
    }
    bin
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_help_lists_commands() {
    let home = home();
    i2pm_cmd(&home).arg("--help").assert().success().stdout(
        predicate::str::contains("I2P")
            .and(predicate::str::contains("start"))
            .and(predicate::str::contains("status"))
            .and(predicate::str::contains("logs"))
            .and(predicate::str::contains("reset")),
    );
}

#[test]
fn test_version_flag() {
    let home = home();
    i2pm_cmd(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("i2p-manager"));
}

#[test]
fn test_subcommand_flags_in_help() {
    let home = home();
    i2pm_cmd(&home)
        .args(["start", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--no-browser"));
    i2pm_cmd(&home)
        .args(["logs", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--follow").and(predicate::str::contains("--lines")));
}

#[test]
fn test_unknown_subcommand_is_usage_error() {
    let home = home();
    i2pm_cmd(&home).arg("frobnicate").assert().code(2);
}

#[test]
fn test_completions_bash() {
    let home = home();
    i2pm_cmd(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Status ──────────────────────────────────────────────────────────

#[test]
fn test_status_without_router_is_disconnected() {
    let home = home();
    i2pm_cmd(&home)
        .arg("status")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("I2Pd is not running")
                .and(predicate::str::contains("i2p-manager start")),
        );
}

#[test]
fn test_status_json_reports_class() {
    let home = home();
    let output = i2pm_cmd(&home)
        .args(["status", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["running"], false);
    assert_eq!(json["class"], "disconnected");
    assert_eq!(json["peers"], 0);
    assert!(json.get("details").is_none());
}

#[test]
fn test_status_honours_env_overlay() {
    let home = home();
    let port = closed_port();
    let output = i2pm_cmd(&home)
        .env("I2PM_I2PD__CONSOLE_PORT", port.to_string())
        .env("I2PM_FIREFOX__PROFILE_NAME", "from-env")
        .args(["status", "--verbose", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["console"], format!("http://127.0.0.1:{port}"));
    assert_eq!(json["details"]["profile"], "from-env");
}

#[test]
fn test_status_yaml() {
    let home = home();
    i2pm_cmd(&home)
        .args(["status", "-o", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("class: disconnected"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_mistyped_config_file_falls_back_to_defaults() {
    let home = home();
    let path = config_file(&home);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, r#"{"i2pd": {"console_port": 70000}}"#).unwrap();

    let output = i2pm_cmd(&home)
        .env_remove("I2PM_I2PD__CONSOLE_PORT")
        .args(["status", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["console"], "http://127.0.0.1:7070");

    i2pm_cmd(&home)
        .args(["reset", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reset complete"));
    assert!(!path.exists());
}

// ── Stop ────────────────────────────────────────────────────────────

#[test]
fn test_stop_without_router_is_a_note() {
    let home = home();
    i2pm_cmd(&home)
        .arg("stop")
        .assert()
        .success()
        .stdout(predicate::str::contains("I2Pd is not running"));
}

// ── Config ──────────────────────────────────────────────────────────

#[cfg(target_os = "linux")]
#[test]
fn test_config_path_follows_xdg() {
    let home = home();
    let expected = home.path().join(".config").join("i2p-manager").join("config.json");
    i2pm_cmd(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.display().to_string()));
}

#[cfg(target_os = "linux")]
#[test]
fn test_config_set_then_get() {
    let home = home();
    i2pm_cmd(&home)
        .args(["config", "set", "i2pd.http_port", "8080"])
        .assert()
        .success();

    i2pm_cmd(&home)
        .args(["config", "get", "i2pd.http_port"])
        .assert()
        .success()
        .stdout("8080\n");

    let on_disk = std::fs::read_to_string(
        home.path().join(".config").join("i2p-manager").join("config.json"),
    )
    .unwrap();
    let doc: serde_json::Value = serde_json::from_str(&on_disk).unwrap();
    assert_eq!(doc["i2pd"]["http_port"], 8080);
    assert_eq!(doc["i2pd"]["socks_port"], 4447);
}

#[cfg(target_os = "linux")]
#[test]
fn test_config_set_rejects_mistyped_value() {
    let home = home();
    i2pm_cmd(&home)
        .args(["config", "set", "i2pd.console_port", "70000"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("i2pd.console_port"));
    assert!(!config_file(&home).exists());

    i2pm_cmd(&home).arg("status").assert().success();
}

#[test]
fn test_config_get_missing_key_fails() {
    let home = home();
    i2pm_cmd(&home)
        .args(["config", "get", "i2pd.nope"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("i2pd.nope"));
}

#[test]
fn test_config_show_has_defaults() {
    let home = home();
    i2pm_cmd(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"profile_name\": \"i2p-secure\"")
                .and(predicate::str::contains("\"console_port\": 7070")),
        );
}

#[cfg(unix)]
#[test]
fn test_config_edit_runs_editor_on_file() {
    let home = home();
    i2pm_cmd(&home)
        .env("EDITOR", "true")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Config editor closed"));
}

// ── Init, browser, logs ─────────────────────────────────────────────

#[cfg(target_os = "linux")]
#[test]
fn test_init_writes_config_and_profile() {
    let home = home();
    let bin = bin_dir(&home, true);
    i2pm_cmd(&home)
        .env("PATH", &bin)
        .arg("init")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("I2Pd not found")
                .and(predicate::str::contains("Initialization complete!")),
        );

    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(config_file(&home)).unwrap()).unwrap();
    assert_eq!(doc["i2pd"]["console_port"], 7070);
    assert_eq!(doc["firefox"]["profile_name"], "i2p-secure");

    let user_js = std::fs::read_to_string(
        home.path()
            .join(".mozilla")
            .join("firefox")
            .join("i2p-secure.default")
            .join("user.js"),
    )
    .unwrap();
    assert!(user_js.contains(r#"user_pref("privacy.resistFingerprinting", true);"#), "{user_js}");
    assert!(user_js.contains(r#"user_pref("network.proxy.type", 1);"#), "{user_js}");
    assert!(user_js.contains(r#"user_pref("network.proxy.http_port", 4444);"#), "{user_js}");
    assert!(user_js.contains(r#"user_pref("network.proxy.socks_port", 4447);"#), "{user_js}");

    i2pm_cmd(&home)
        .env("PATH", &bin)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("I2P profile already exists"));
}

#[cfg(unix)]
#[test]
fn test_init_without_firefox_fails() {
    let home = home();
    let bin = bin_dir(&home, false);
    i2pm_cmd(&home)
        .env("PATH", &bin)
        .arg("init")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Firefox not found"));
    assert!(!config_file(&home).exists());
}

#[cfg(unix)]
#[test]
fn test_browser_without_firefox_fails() {
    let home = home();
    let bin = bin_dir(&home, false);
    i2pm_cmd(&home)
        .env("PATH", &bin)
        .args(["browser", "--yes"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Firefox not found"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_browser_launches_stub_firefox() {
    let home = home();
    let bin = bin_dir(&home, true);
    i2pm_cmd(&home)
        .env("PATH", &bin)
        .args(["browser", "--yes"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("I2P is not running")
                .and(predicate::str::contains("Browser launched!")),
        );
}

#[cfg(target_os = "linux")]
#[test]
fn test_logs_without_log_file_fails() {
    if std::path::Path::new("/var/log/i2pd/i2pd.log").exists() {
        return;
    }
    let home = home();
    i2pm_cmd(&home)
        .arg("logs")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Log file not found"));
}

// ── Reset ───────────────────────────────────────────────────────────

#[cfg(target_os = "linux")]
#[test]
fn test_reset_removes_config_and_profile() {
    let home = home();
    i2pm_cmd(&home)
        .args(["config", "set", "dashboard.refresh_interval", "10"])
        .assert()
        .success();

    let profile = home.path().join(".mozilla").join("firefox").join("i2p-secure.default");
    std::fs::create_dir_all(&profile).unwrap();

    i2pm_cmd(&home)
        .args(["reset", "--yes"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Firefox profile removed")
                .and(predicate::str::contains("Configuration removed"))
                .and(predicate::str::contains("Reset complete")),
        );

    assert!(!profile.exists());
    assert!(
        !home
            .path()
            .join(".config")
            .join("i2p-manager")
            .join("config.json")
            .exists()
    );
}

#[test]
fn test_quiet_suppresses_output() {
    let home = home();
    i2pm_cmd(&home)
        .args(["--quiet", "stop"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}
