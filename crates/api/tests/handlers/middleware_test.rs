use axum::{http::StatusCode, response::IntoResponse};
use rstest::rstest;
use slotwise_api::middleware::error_handling::AppError;
use slotwise_core::errors::ScheduleError;

#[rstest]
#[case(ScheduleError::NotFound("Booking not found".to_string()), StatusCode::NOT_FOUND)]
#[case(ScheduleError::Validation("Invalid input".to_string()), StatusCode::BAD_REQUEST)]
#[case(ScheduleError::Consistency("Slot is booked".to_string()), StatusCode::CONFLICT)]
#[case(ScheduleError::Conflict("Slot changed".to_string()), StatusCode::CONFLICT)]
#[case(ScheduleError::Database(eyre::eyre!("Database error")), StatusCode::INTERNAL_SERVER_ERROR)]
fn test_error_status_mapping(#[case] error: ScheduleError, #[case] expected: StatusCode) {
    let error = AppError::from(error);

    assert_eq!(error.status(), expected);
    assert_eq!(error.into_response().status(), expected);
}

#[test]
fn test_report_maps_to_database_error() {
    let error = AppError::from(eyre::eyre!("connection reset"));

    assert!(matches!(error.0, ScheduleError::Database(_)));
    assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
