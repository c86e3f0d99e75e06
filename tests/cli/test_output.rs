//! Tests for CLI output rendering
//!
//! - Outcome tally line
//! - Byte and duration formatting
//! - Failure notes for run-aborting errors

use mathdex::cli::output::{
    count, failure_note, format_bytes, format_duration, format_tally, outcome_style,
    print_failure, print_field, print_header, print_success, print_warning,
};
use mathdex::core::types::{SubmitTally, WriteOutcome};
use mathdex::MathdexError;
use serial_test::serial;
use std::time::Duration;

#[test]
#[serial]
fn test_tally_lists_every_outcome_in_order() {
    colored::control::set_override(false);
    let mut tally = SubmitTally::default();
    for outcome in [
        WriteOutcome::Created,
        WriteOutcome::Created,
        WriteOutcome::Updated,
        WriteOutcome::Failed,
    ] {
        tally.record(outcome);
    }

    assert_eq!(format_tally(&tally), "created 2, updated 1, conflicts 0, failed 1");
    assert_eq!(format_tally(&SubmitTally::default()), "created 0, updated 0, conflicts 0, failed 0");
    colored::control::unset_override();
}

#[test]
#[serial]
fn test_outcome_styles_differ_when_colored() {
    colored::control::set_override(true);
    let created = outcome_style(WriteOutcome::Created, "x").to_string();
    let failed = outcome_style(WriteOutcome::Failed, "x").to_string();
    let conflict = outcome_style(WriteOutcome::Conflict, "x").to_string();
    assert_ne!(created, failed);
    assert_ne!(created, conflict);
    assert!(created.contains('x'));

    colored::control::set_override(false);
    assert_eq!(outcome_style(WriteOutcome::Updated, "x").to_string(), "x");
    assert_eq!(count(42).to_string(), "42");
    colored::control::unset_override();
}

#[test]
fn test_format_bytes_boundaries() {
    assert_eq!(format_bytes(0), "0 B");
    assert_eq!(format_bytes(1023), "1023 B");
    assert_eq!(format_bytes(1024), "1.0 KB");
    assert_eq!(format_bytes(1048576), "1.0 MB");
    assert_eq!(format_bytes(1610612736), "1.5 GB");
}

#[test]
fn test_format_duration_ranges() {
    assert_eq!(format_duration(Duration::ZERO), "0ms");
    assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
    assert_eq!(format_duration(Duration::from_secs(1)), "1.00s");
    assert_eq!(format_duration(Duration::from_millis(59_500)), "59.50s");
    assert_eq!(format_duration(Duration::from_secs(125)), "2m 5.0s");
}

#[test]
fn test_failure_note_for_missing_root() {
    let err: Box<dyn std::error::Error> =
        Box::new(MathdexError::PathError("/corpus/missing".to_string()));
    assert!(failure_note(err.as_ref()).is_some());

    let backend: Box<dyn std::error::Error> = Box::new(MathdexError::Backend("locked".to_string()));
    assert!(failure_note(backend.as_ref()).is_none());
}

#[test]
fn test_print_helpers_do_not_panic() {
    print_header("Title");
    print_field("documents", 3);
    print_success("ok");
    print_warning("careful");
    let err: Box<dyn std::error::Error> = Box::new(MathdexError::Scheduler("gone".to_string()));
    print_failure(err.as_ref());
}
