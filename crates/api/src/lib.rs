//! # Slotwise API
//!
//! HTTP surface of the Slotwise scheduling engine: shift and slot
//! management, staff assignment for bookings, availability checks and
//! reassignment.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate requests into [`Scheduler`] calls
//! - **Middleware**: Error mapping
//! - **Config**: Environment configuration
//!
//! The API uses Axum as the web framework; persistence sits behind the
//! scheduler's store.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Error handling middleware
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;

use axum::{error_handling::HandleErrorLayer, http::StatusCode, BoxError, Router};
use eyre::{Result, WrapErr};
use slotwise_core::Scheduler;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    pub scheduler: Scheduler,
}

/// Builds the router with every endpoint and the shared state attached.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Shift and slot management
        .merge(routes::shift::routes())
        .merge(routes::slot::routes())
        // Staff assignment per booking
        .merge(routes::booking::routes())
        .merge(routes::service_item::routes())
        // Availability checks
        .merge(routes::availability::routes())
        .with_state(state)
}

/// Starts the API server with the provided configuration and scheduler
///
/// # Example
///
/// ```no_run
/// # async fn run(store: std::sync::Arc<dyn slotwise_core::SchedulingStore>) -> eyre::Result<()> {
/// let config = slotwise_api::config::ApiConfig::from_env()?;
/// let scheduler = slotwise_core::Scheduler::new(store, config.scheduling.clone());
/// slotwise_api::start_server(config, scheduler).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, scheduler: Scheduler) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = Arc::new(ApiState { scheduler });
    let app = build_router(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins = origins
            .iter()
            .map(|origin| origin.parse())
            .collect::<Result<Vec<axum::http::HeaderValue>, _>>()
            .wrap_err("Invalid origin in API_CORS_ORIGINS")?;

        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(origins)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Request tracing and timeout
    let app = app
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(
            tower::ServiceBuilder::new()
                .layer(HandleErrorLayer::new(|_: BoxError| async { StatusCode::REQUEST_TIMEOUT }))
                .timeout(std::time::Duration::from_secs(config.request_timeout)),
        );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
