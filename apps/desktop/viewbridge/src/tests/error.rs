// Unit tests for error module

use crate::error::ViewbridgeError;

use common::ErrorLocation;

use std::panic::Location;

/// **VALUE**: Tests that errors render the message and the source location.
///
/// **WHY THIS MATTERS**: These errors surface in the log file operators read
/// when startup fails. A message without its location turns every report
/// into a search through the codebase.
///
/// **BUG THIS CATCHES**: Would catch the location field being dropped from
/// the Display format string.
#[test]
fn given_app_error_when_displayed_then_message_and_location_present() {
    // GIVEN: An error created on this line
    let err = ViewbridgeError::App {
        message: String::from("Failed to create log directory"),
        location: ErrorLocation::from(Location::caller()),
    };

    // WHEN: Rendering for the log
    let rendered = err.to_string();

    // THEN: Both the message and this file appear
    assert!(rendered.contains("Failed to create log directory"));
    assert!(
        rendered.contains("tests/error.rs"),
        "location should name this file: {rendered}"
    );
}

/// **VALUE**: Tests that the logger variant is distinguishable in logs.
#[test]
fn given_logger_error_when_displayed_then_prefixed() {
    let err = ViewbridgeError::Logger {
        message: String::from("Failed to create log file"),
        location: ErrorLocation::from(Location::caller()),
    };

    assert!(err.to_string().starts_with("Logger Error:"));
}
