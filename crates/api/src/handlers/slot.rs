use axum::{
    extract::{Path, State},
    Json,
};
use slotwise_core::models::shift::Slot;
use std::sync::Arc;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn block_slot(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Slot>, AppError> {
    Ok(Json(state.scheduler.block_slot(id).await?))
}

#[axum::debug_handler]
pub async fn unblock_slot(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Slot>, AppError> {
    Ok(Json(state.scheduler.unblock_slot(id).await?))
}
