use axum::{extract::State, Json};
use slotwise_core::models::assignment::{
    AvailabilityReport, DraftAvailabilityRequest, GlobalSlotsRequest, GlobalSlotsResponse,
};
use std::sync::Arc;

use crate::{middleware::error_handling::AppError, ApiState};

/// Availability of a sequence of services before a booking exists.
#[axum::debug_handler]
pub async fn check_draft(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<DraftAvailabilityRequest>,
) -> Result<Json<AvailabilityReport>, AppError> {
    Ok(Json(state.scheduler.check_draft_availability(payload).await?))
}

/// Every start time in the day at which the whole sequence fits.
#[axum::debug_handler]
pub async fn find_slots(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<GlobalSlotsRequest>,
) -> Result<Json<GlobalSlotsResponse>, AppError> {
    Ok(Json(state.scheduler.find_global_slots(payload).await?))
}
