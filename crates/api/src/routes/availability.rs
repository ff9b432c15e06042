use axum::{routing::post, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/availability/check", post(handlers::availability::check_draft))
        .route("/api/availability/slots", post(handlers::availability::find_slots))
}
