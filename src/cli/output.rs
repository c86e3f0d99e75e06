//! Terminal rendering shared by the commands
//!
//! Human output only; JSON responses are serialized by each command.
//! Colour follows `colored`, so `NO_COLOR` turns it off.

use colored::{ColoredString, Colorize};
use std::error::Error;
use std::fmt::Display;
use std::time::Duration;

use crate::core::error::MathdexError;
use crate::core::types::{SubmitTally, WriteOutcome};

/// Width of the label column in [`print_field`]
const LABEL_WIDTH: usize = 14;

/// Style `text` by the write outcome it describes
pub fn outcome_style(outcome: WriteOutcome, text: &str) -> ColoredString {
    match outcome {
        WriteOutcome::Created => text.green(),
        WriteOutcome::Updated => text.cyan(),
        WriteOutcome::Conflict => text.yellow(),
        WriteOutcome::Failed => text.red().bold(),
    }
}

/// One-line outcome breakdown, e.g. `created 4, updated 1, conflicts 0, failed 0`
///
/// Zero counts are dimmed so the outcomes that happened stand out.
pub fn format_tally(tally: &SubmitTally) -> String {
    let parts = [
        (WriteOutcome::Created, "created", tally.created),
        (WriteOutcome::Updated, "updated", tally.updated),
        (WriteOutcome::Conflict, "conflicts", tally.conflicts),
        (WriteOutcome::Failed, "failed", tally.failed),
    ];

    parts
        .iter()
        .map(|&(outcome, label, n)| {
            let text = format!("{label} {n}");
            if n == 0 {
                text.dimmed().to_string()
            } else {
                outcome_style(outcome, &text).to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Style for file and index locations
pub fn location(s: &str) -> ColoredString {
    s.blue()
}

/// Style for counts and sizes
pub fn count(n: impl Display) -> ColoredString {
    n.to_string().yellow()
}

/// Byte count in binary units (`1.5 KB`)
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

/// Compact duration: `250ms`, `3.10s`, `2m 5.0s`
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", duration.as_millis())
    } else if secs < 60.0 {
        format!("{secs:.2}s")
    } else {
        let mins = duration.as_secs() / 60;
        format!("{mins}m {:.1}s", secs - (mins * 60) as f64)
    }
}

/// Print a bold section title
pub fn print_header(title: &str) {
    println!("{}", title.bold());
}

/// Print an indented `label: value` line with aligned values
pub fn print_field(label: &str, value: impl Display) {
    let label = format!("{label}:");
    println!("  {} {}", format!("{label:<LABEL_WIDTH$}").bold(), value);
}

pub fn print_success(message: &str) {
    println!("{}", message.green());
}

pub fn print_warning(message: &str) {
    eprintln!("{}: {}", "Warning".yellow(), message);
}

/// Print a command failure to stderr
///
/// Errors that abort an indexing run get a second line saying that
/// nothing was committed.
pub fn print_failure(err: &(dyn Error + 'static)) {
    eprintln!("{}: {}", "Error".red().bold(), err);
    if let Some(note) = failure_note(err) {
        eprintln!("  {}", note.dimmed());
    }
}

/// Follow-up line for errors that abort a run before commit
pub fn failure_note(err: &(dyn Error + 'static)) -> Option<&'static str> {
    err.downcast_ref::<MathdexError>()
        .filter(|e| e.is_fatal())
        .map(|_| "Run aborted before commit; no records were written.")
}
