use std::time::Duration;

use ddc_lib::{DdcError, ErrorCategory, Stage};

#[test]
fn config_error_display_includes_message() {
    let err = DdcError::Config("chunk_size must be at least 1".to_string());

    assert_eq!(
        format!("{}", err),
        "Configuration error: chunk_size must be at least 1"
    );
}

#[test]
fn io_error_display_wraps_source() {
    let io_err = std::io::Error::other("disk full");
    let err: DdcError = io_err.into();
    let rendered = format!("{}", err);

    assert!(rendered.starts_with("IO error: "));
    assert!(rendered.contains("disk full"));
}

#[test]
fn serde_error_maps_to_validation_category() {
    let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: DdcError = parse_err.into();

    assert!(format!("{}", err).starts_with("Serialization error: "));
    assert_eq!(err.to_payload().category, ErrorCategory::Validation);
}

#[test]
fn stage_error_names_stage_and_input_kinds() {
    let err = DdcError::validation("implementation input is missing an `elements` array")
        .at_stage(Stage::Validate, "object", "array");

    assert_eq!(
        format!("{}", err),
        "Failed during validate (design input: object, implementation input: array): \
         Validation error: implementation input is missing an `elements` array"
    );
    assert!(matches!(err.root(), DdcError::Validation(_)));
}

#[test]
fn timeout_display_includes_duration() {
    let err = DdcError::Timeout(Duration::from_secs(30));

    assert_eq!(format!("{}", err), "Comparison timed out after 30s");
}

#[test]
fn snapshot_error_has_remediation() {
    let payload = DdcError::snapshot("snapshot 'run-1' already exists").to_payload();

    assert_eq!(payload.category, ErrorCategory::Snapshot);
    assert!(payload.remediation.is_some());
}
