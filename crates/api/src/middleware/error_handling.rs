//! # Error Handling Middleware
//!
//! Maps scheduling errors to HTTP status codes and JSON error bodies so every
//! handler reports failures the same way.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use slotwise_core::errors::ScheduleError;
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// Handlers return `Result<_, AppError>` and use `?` on anything yielding a
/// [`ScheduleError`] or an `eyre::Report`.
#[derive(Debug)]
pub struct AppError(pub ScheduleError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ScheduleError::NotFound(_) => StatusCode::NOT_FOUND,
            ScheduleError::Validation(_) => StatusCode::BAD_REQUEST,
            ScheduleError::Consistency(_) => StatusCode::CONFLICT,
            ScheduleError::Conflict(_) => StatusCode::CONFLICT,
            ScheduleError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ScheduleError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {:?}", self.0);
        }

        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        AppError(err)
    }
}

/// Wraps an `eyre::Report` as a database error.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(ScheduleError::Database(err))
    }
}
