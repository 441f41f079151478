//! Output formatting: status lines, tables, JSON, YAML.
//!
//! Human output goes through [`Printer`], which honours `--quiet` and
//! `NO_COLOR`. Structured formats are rendered with serde.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::OutputFormat;
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Color only when stdout is an interactive terminal and NO_COLOR is unset.
pub fn should_color() -> bool {
    io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Prints human-facing progress and result lines to stdout.
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    quiet: bool,
    color: bool,
}

impl Printer {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            color: should_color(),
        }
    }

    pub fn is_quiet(self) -> bool {
        self.quiet
    }

    pub fn line(self, text: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{}", text.as_ref());
    }

    pub fn blank(self) {
        self.line("");
    }

    /// Bold section title.
    pub fn heading(self, text: &str) {
        let text = if self.color { text.bold().blue().to_string() } else { text.to_owned() };
        self.line(text);
    }

    pub fn success(self, text: &str) {
        let mark = if self.color { "✓".green().to_string() } else { "✓".to_owned() };
        self.line(format!("{mark} {text}"));
    }

    pub fn warning(self, text: &str) {
        let mark = if self.color { "!".yellow().to_string() } else { "!".to_owned() };
        self.line(format!("{mark} {text}"));
    }

    pub fn failure(self, text: &str) {
        let mark = if self.color { "✗".red().to_string() } else { "✗".to_owned() };
        self.line(format!("{mark} {text}"));
    }

    /// Indented command or URL the user can act on.
    pub fn hint(self, text: &str) {
        let text = if self.color { text.cyan().to_string() } else { text.to_owned() };
        self.line(format!("  {text}"));
    }

    pub fn dim(self, text: &str) {
        let text = if self.color { text.dimmed().to_string() } else { text.to_owned() };
        self.line(text);
    }
}

// ── Key/value tables ─────────────────────────────────────────────────

#[derive(Tabled)]
struct Row<'a> {
    #[tabled(rename = "Property")]
    property: &'a str,
    #[tabled(rename = "Value")]
    value: String,
}

/// Two-column table for detail views.
pub fn render_properties(rows: &[(&str, String)]) -> String {
    let rows: Vec<Row<'_>> = rows
        .iter()
        .map(|row| Row {
            property: row.0,
            value: row.1.clone(),
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

// ── Structured formats ───────────────────────────────────────────────

/// Render a single item as JSON or YAML. Tables are built by the caller.
pub fn render_structured<T>(format: OutputFormat, data: &T) -> Result<String, CliError>
where
    T: serde::Serialize + ?Sized,
{
    match format {
        OutputFormat::Json | OutputFormat::Table => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::Yaml => serde_yaml::to_string(data).map_err(|e| CliError::OperationFailed {
            operation: "render YAML".into(),
            message: e.to_string(),
        }),
    }
}

/// Print rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", output.trim_end());
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn properties_render_as_rows() {
        let table = render_properties(&[("Known Peers", "156".into()), ("Active Tunnels", "8".into())]);
        assert!(table.contains("Property"));
        assert!(table.contains("Known Peers"));
        assert!(table.contains("156"));
    }

    #[test]
    fn yaml_and_json_render_the_same_data() {
        let data = json!({"running": false, "peers": 0});
        let yaml = render_structured(OutputFormat::Yaml, &data).unwrap();
        assert!(yaml.contains("running: false"));

        let json = render_structured(OutputFormat::Json, &data).unwrap();
        assert!(json.contains("\"running\": false"));
    }
}
