use axum::{routing::post, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/slots/:id/block", post(handlers::slot::block_slot))
        .route("/api/slots/:id/unblock", post(handlers::slot::unblock_slot))
}
