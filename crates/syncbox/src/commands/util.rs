//! Shared helpers for command handlers.

use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::error::CliError;

pub const MODES: &[&str] = &["powersave", "passthrough", "video", "game", "music"];
pub const SOURCES: &[&str] = &["input1", "input2", "input3", "input4"];
pub const INTENSITIES: &[&str] = &["subtle", "moderate", "high", "intense"];

/// Fail unless the box reported the view.
pub fn require<T>(view: Option<Arc<T>>, name: &str) -> Result<Arc<T>, CliError> {
    view.ok_or_else(|| CliError::UnexpectedResponse {
        message: format!("the box did not report its {name} state"),
    })
}

/// Check `value` against a fixed set of accepted names.
pub fn one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), CliError> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(CliError::Validation {
        field: field.into(),
        reason: format!("'{value}' is not one of {}", allowed.join(", ")),
    })
}

pub fn in_range(field: &str, value: i64, min: i64, max: i64) -> Result<(), CliError> {
    if (min..=max).contains(&value) {
        return Ok(());
    }
    Err(CliError::Validation {
        field: field.into(),
        reason: format!("{value} is outside {min}..={max}"),
    })
}

/// Spinner on stderr while waiting for the user, hidden in quiet mode.
pub fn spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} ({elapsed})") {
        bar.set_style(style);
    }
    bar.set_message(message.to_owned());
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}
