use brandcheck_lib::error::ErrorCategory;
use brandcheck_lib::BrandError;

#[test]
fn config_error_display_includes_message() {
    let err = BrandError::Config("missing design".to_string());

    assert_eq!(format!("{}", err), "Configuration error: missing design");
}

#[test]
fn io_error_display_wraps_source() {
    let io_err = std::io::Error::other("disk full");
    let err: BrandError = io_err.into();
    let rendered = format!("{}", err);

    assert!(rendered.starts_with("IO error: "));
    assert!(rendered.contains("disk full"));
}

#[test]
fn backend_helper_includes_status_and_message() {
    let err = BrandError::backend(Some(reqwest::StatusCode::UNAUTHORIZED), "bad key");

    assert_eq!(
        format!("{}", err),
        "Backend error (status: Some(401)): bad key"
    );
    assert_eq!(err.to_payload().category, ErrorCategory::Backend);
}

#[test]
fn backend_helper_handles_missing_status() {
    let err = BrandError::backend(None, "connection reset");

    assert_eq!(
        format!("{}", err),
        "Backend error (status: None): connection reset"
    );
}

#[test]
fn kit_errors_point_at_the_kit_store() {
    let err = BrandError::KitNotFound("kit-404".to_string());
    assert_eq!(format!("{}", err), "Brand kit not found: kit-404");

    let payload = err.to_payload();
    assert_eq!(payload.category, ErrorCategory::Kit);
    assert!(payload
        .remediation
        .as_deref()
        .unwrap_or_default()
        .contains("kit list"));
}

#[test]
fn invalid_kit_helper_uses_message() {
    let err = BrandError::invalid_kit("heading font must not be empty");

    assert_eq!(
        format!("{}", err),
        "Invalid brand kit: heading font must not be empty"
    );
}
