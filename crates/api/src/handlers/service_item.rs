use axum::{
    extract::{Path, State},
    Json,
};
use slotwise_core::models::assignment::{ReassignOutcome, ReassignRequest};
use std::sync::Arc;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn reassign(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReassignRequest>,
) -> Result<Json<ReassignOutcome>, AppError> {
    Ok(Json(state.scheduler.reassign(id, payload.staff_id).await?))
}
