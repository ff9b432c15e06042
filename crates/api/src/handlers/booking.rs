use axum::{
    extract::{Path, State},
    Json,
};
use slotwise_core::models::assignment::{AssignRequest, AssignmentReport, AvailabilityReport, ReleaseResponse};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

/// Assigns staff to every item of the booking. The body is optional and
/// defaults to partial assignment without overrides.
#[axum::debug_handler]
pub async fn assign_staff(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    payload: Option<Json<AssignRequest>>,
) -> Result<Json<AssignmentReport>, AppError> {
    let request = payload.map(|Json(request)| request).unwrap_or_default();
    debug!("Assigning staff for booking {} ({:?})", id, request.policy);

    Ok(Json(state.scheduler.assign_all(id, request).await?))
}

#[axum::debug_handler]
pub async fn check_availability(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<AvailabilityReport>, AppError> {
    Ok(Json(state.scheduler.check_availability(id).await?))
}

#[axum::debug_handler]
pub async fn release_booking(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReleaseResponse>, AppError> {
    Ok(Json(state.scheduler.release(id).await?))
}

#[axum::debug_handler]
pub async fn cancel_booking(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReleaseResponse>, AppError> {
    Ok(Json(state.scheduler.cancel_booking(id).await?))
}
