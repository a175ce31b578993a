//! Tests for error classification and messages.

use std::time::Duration;
use ward::error::WardError;

#[test]
fn test_security_errors() {
    assert!(WardError::path_escape("../x").is_security_related());
    assert!(WardError::command_not_allowed("rm", ["ls"]).is_security_related());
    assert!(!WardError::not_found("x").is_security_related());
    assert!(!WardError::EmptyCommand.is_security_related());
}

#[test]
fn test_validation_errors_are_not_retryable() {
    for err in [
        WardError::path_escape("../x"),
        WardError::invalid_range(3, 1, 2),
        WardError::EmptyCommand,
        WardError::malformed_command("missing closing quotation"),
        WardError::invalid_arguments("read.file", "missing field `path`"),
    ] {
        assert!(!err.is_retryable(), "{}", err.kind());
    }
    assert!(WardError::command_timeout("sleep 9", Duration::from_secs(1)).is_retryable());
}

#[test]
fn test_allowed_list_is_sorted_in_message() {
    let err = WardError::command_not_allowed("rm", ["wc", "cat", "ls"]);
    assert_eq!(
        err.to_string(),
        "Command 'rm' is not allowed. Valid options: cat, ls, wc."
    );
    assert_eq!(err.kind(), "command_not_allowed");
}

#[test]
fn test_timeout_message_formats() {
    assert_eq!(
        WardError::command_timeout("x", Duration::from_secs(5)).to_string(),
        "Command timed out after 5s."
    );
    assert_eq!(
        WardError::command_timeout("x", Duration::from_millis(1500)).to_string(),
        "Command timed out after 1.500s."
    );
}
