use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/bookings/:id/assign", post(handlers::booking::assign_staff))
        .route(
            "/api/bookings/:id/availability",
            get(handlers::booking::check_availability),
        )
        .route("/api/bookings/:id/release", post(handlers::booking::release_booking))
        .route("/api/bookings/:id/cancel", post(handlers::booking::cancel_booking))
}
