//! Unit tests for error display and conversions.

use percolate::coro::DriveError;
use percolate::AppError;

#[test]
fn app_error_display_prefixes_the_domain() {
    assert_eq!(
        AppError::Config("bad value".into()).to_string(),
        "config: bad value"
    );
    assert_eq!(AppError::Db("locked".into()).to_string(), "db: locked");
    assert_eq!(
        AppError::NotFound("ticket 7".into()).to_string(),
        "not found: ticket 7"
    );
    assert_eq!(
        AppError::AlreadyArchived("ticket 7".into()).to_string(),
        "already archived: ticket 7"
    );
    assert_eq!(
        AppError::Unsupported("Priority.delete".into()).to_string(),
        "unsupported: Priority.delete"
    );
    assert_eq!(AppError::Io("denied".into()).to_string(), "io: denied");
}

#[test]
fn sqlx_errors_convert_to_db() {
    let err: AppError = sqlx::Error::RowNotFound.into();
    assert!(matches!(err, AppError::Db(_)));
}

#[test]
fn toml_errors_convert_to_config() {
    let parsed: Result<toml::Value, toml::de::Error> = toml::from_str("= broken");
    let err: AppError = parsed.expect_err("must not parse").into();
    assert!(matches!(err, AppError::Config(_)));
}

#[test]
fn drive_error_display_distinguishes_classes() {
    let failed: DriveError<AppError> = DriveError::Failed(AppError::Db("locked".into()));
    assert_eq!(failed.to_string(), "computation failed: db: locked");

    let defect: DriveError<AppError> = DriveError::Defect("boom".into());
    assert_eq!(defect.to_string(), "computation defect: boom");
}

#[test]
fn drive_error_failed_and_defect_never_compare_equal() {
    let failed: DriveError<String> = DriveError::Failed("boom".into());
    let defect: DriveError<String> = DriveError::Defect("boom".into());
    assert_ne!(failed, defect);
}
