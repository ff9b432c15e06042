use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use slotwise_core::models::shift::{
    CreateShiftBatchRequest, CreateShiftBatchResponse, CreateShiftRequest, ShiftWithSlots, Slot,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn create_shift(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateShiftRequest>,
) -> Result<(StatusCode, Json<ShiftWithSlots>), AppError> {
    let created = state.scheduler.generate_shift(payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[axum::debug_handler]
pub async fn create_shift_batch(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateShiftBatchRequest>,
) -> Result<(StatusCode, Json<CreateShiftBatchResponse>), AppError> {
    let response = state.scheduler.generate_shift_batch(payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[axum::debug_handler]
pub async fn get_shift_slots(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Slot>>, AppError> {
    Ok(Json(state.scheduler.shift_slots(id).await?))
}

#[axum::debug_handler]
pub async fn delete_shift(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.scheduler.delete_shift(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
