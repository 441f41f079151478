//! Config subcommand handlers.

use std::process::Command;

use serde_json::Value;

use i2pm_config::{ConfigError, ConfigStore, parse_value};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output::{Printer, print_output};

// ── Helpers ─────────────────────────────────────────────────────────

/// Strings print bare, everything else as JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `$EDITOR`, then `$VISUAL`, then the platform default.
fn editor() -> String {
    std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .ok()
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| if cfg!(windows) { "notepad" } else { "nano" }.to_owned())
}

fn edit(store: &mut ConfigStore, out: Printer) -> Result<(), CliError> {
    store.init()?;
    let path = store.path().to_path_buf();
    out.dim(&format!("Config file: {}", path.display()));

    let editor = editor();
    let mut words = editor.split_whitespace();
    let program = words.next().unwrap_or("nano");

    let status = Command::new(program)
        .args(words)
        .arg(&path)
        .status()
        .map_err(|e| CliError::OperationFailed {
            operation: format!("open {program}"),
            message: format!("{e}. Edit manually: {}", path.display()),
        })?;

    if status.success() {
        out.success("Config editor closed");
    } else {
        out.warning(&format!("{program} exited with {status}"));
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut store = ConfigStore::open();
    let out = Printer::new(global.quiet);

    match args.command.unwrap_or(ConfigCommand::Edit) {
        ConfigCommand::Show => {
            print_output(&serde_json::to_string_pretty(store.document())?, global.quiet);
        }

        ConfigCommand::Path => {
            print_output(&store.path().display().to_string(), global.quiet);
        }

        ConfigCommand::Get { key } => {
            let value = store.get(&key).ok_or_else(|| ConfigError::InvalidKey {
                key: key.clone(),
                reason: "not set".into(),
            })?;
            print_output(&display_value(value), global.quiet);
        }

        ConfigCommand::Set { key, value } => {
            let value = parse_value(&value);
            let shown = display_value(&value);
            store.set(&key, value)?;
            out.success(&format!("Set {key} = {shown}"));
        }

        ConfigCommand::Edit => edit(&mut store, out)?,
    }
    Ok(())
}
