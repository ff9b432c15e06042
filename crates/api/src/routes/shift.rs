use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/shifts", post(handlers::shift::create_shift))
        .route("/api/shifts/batch", post(handlers::shift::create_shift_batch))
        .route("/api/shifts/:id", delete(handlers::shift::delete_shift))
        .route("/api/shifts/:id/slots", get(handlers::shift::get_shift_slots))
}
