//! Output formatting: table or JSON.
//!
//! Lists render through `tabled`, single views as aligned key/value
//! lines. JSON serializes the underlying view as the box reported it.

use std::fmt::Write as _;
use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Render an on/off flag, green when on.
pub fn flag(value: bool, color: bool) -> String {
    let text = if value { "on" } else { "off" };
    match (color, value) {
        (true, true) => text.green().to_string(),
        (true, false) => text.dimmed().to_string(),
        (false, _) => text.to_owned(),
    }
}

// ── Detail view ──────────────────────────────────────────────────────

/// Aligned `label  value` lines for a single item.
pub struct Detail {
    color: bool,
    rows: Vec<(String, String)>,
}

impl Detail {
    pub fn new(color: bool) -> Self {
        Self {
            color,
            rows: Vec::new(),
        }
    }

    pub fn row(mut self, label: &str, value: impl ToString) -> Self {
        self.rows.push((label.to_owned(), value.to_string()));
        self
    }

    /// Add a row only when `value` is present.
    pub fn opt_row<V: ToString>(self, label: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.row(label, v),
            None => self,
        }
    }

    pub fn render(&self) -> String {
        let width = self.rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
        let mut out = String::new();
        for (label, value) in &self.rows {
            let padded = format!("{label:<width$}");
            if self.color {
                let _ = writeln!(out, "{}  {value}", padded.cyan());
            } else {
                let _ = writeln!(out, "{padded}  {value}");
            }
        }
        out.trim_end().to_owned()
    }
}

/// Section heading between detail blocks.
pub fn heading(title: &str, color: bool) -> String {
    if color {
        title.bold().to_string()
    } else {
        title.to_owned()
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a single item with `detail_fn`, or as JSON.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

pub(crate) fn render_json<T: serde::Serialize + ?Sized>(
    data: &T,
    compact: bool,
) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    Ok(rendered)
}
