//! Error message quality tests
//!
//! Tests that verify error messages are helpful and distinguishable.

use uis_probe::error::ProbeError;

#[test]
fn test_config_error_message_clarity() {
    // Given: A configuration error
    let error = ProbeError::Config("cycle must be between 0 and 4, got 7".to_string());

    // When: Converting to string
    let message = format!("{}", error);

    // Then: Message should clearly indicate a configuration issue
    assert!(message.contains("Configuration error"));
    assert!(message.contains("got 7"));
}

#[test]
fn test_invalid_url_message_clarity() {
    // Given: An invalid base URL error
    let error = ProbeError::InvalidUrl("https://: empty host".to_string());

    // When: Converting to string
    let message = format!("{}", error);

    // Then: Message should name the URL problem
    assert!(message.contains("Invalid URL"));
    assert!(message.contains("empty host"));
}

#[test]
fn test_json_error_conversion() {
    // Given: A serde_json parse failure
    let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();

    // When: Converting into ProbeError
    let error: ProbeError = json_err.into();

    // Then: The JSON variant is used with a descriptive prefix
    assert!(matches!(error, ProbeError::Json(_)));
    assert!(error.to_string().starts_with("JSON error:"));
}

#[test]
fn test_io_error_conversion() {
    // Given: An IO failure
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only target");

    // When: Converting into ProbeError
    let error: ProbeError = io_err.into();

    // Then: The IO variant keeps the original message
    assert!(matches!(error, ProbeError::Io(_)));
    assert!(error.to_string().contains("read-only target"));
}

#[test]
fn test_error_variants_are_distinguishable() {
    // Given: One error of each string-carrying variant with the same detail
    let detail = "same detail".to_string();
    let errors = [
        ProbeError::Config(detail.clone()),
        ProbeError::InvalidUrl(detail.clone()),
        ProbeError::Io(std::io::Error::other(detail)),
    ];

    // When: Rendering them
    let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();

    // Then: Every message is distinct
    for (i, a) in messages.iter().enumerate() {
        for b in &messages[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn test_errors_work_with_anyhow_context() {
    use anyhow::Context;

    // Given: A ProbeError inside a Result
    let result: Result<(), ProbeError> = Err(ProbeError::Config("bad".to_string()));

    // When: Adding context at the binary edge
    let err = result.context("Failed to validate configuration").unwrap_err();

    // Then: Both layers are in the chain
    let chain = format!("{:#}", err);
    assert!(chain.contains("Failed to validate configuration"));
    assert!(chain.contains("Configuration error: bad"));
}
