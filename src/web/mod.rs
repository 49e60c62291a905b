use std::sync::Arc;

use axum::{Router, routing::get};
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};

use crate::monitor::MonitorScheduler;

pub mod error;
pub mod routes;

pub use error::AppError;

/// Shared state for all handlers.
pub struct AppState {
    pub pool: SqlitePool,
    pub scheduler: Arc<MonitorScheduler>,
}

async fn health_check_handler() -> &'static str {
    "OK"
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check_handler))
        .merge(routes::source_routes::router())
        .merge(routes::monitor_routes::router())
        .merge(routes::settings_routes::router())
        .layer(cors)
        .with_state(state)
}
