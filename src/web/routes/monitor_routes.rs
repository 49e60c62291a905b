use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
};
use serde::Deserialize;

use crate::db::services::settings_service::{self, keys};
use crate::monitor::MonitorStatus;
use crate::web::{AppError, AppState};

#[derive(Deserialize)]
pub struct SetIntervalRequest {
    pub interval_ms: i64,
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/status", get(get_status))
        .route("/api/check-now", post(check_now))
        .route("/api/monitor/interval", put(set_interval))
}

async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MonitorStatus>, AppError> {
    Ok(Json(state.scheduler.status().await?))
}

/// Manual sweep, independent of the timer. Runs to completion before
/// responding so callers can observe the effects immediately.
async fn check_now(State(state): State<Arc<AppState>>) -> StatusCode {
    state.scheduler.check_now().await;
    StatusCode::OK
}

async fn set_interval(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SetIntervalRequest>,
) -> Result<Json<MonitorStatus>, AppError> {
    settings_service::update_setting(
        &state.pool,
        keys::NOTIFICATION_CHECK_INTERVAL,
        &payload.interval_ms.to_string(),
    )
    .await?;
    state.scheduler.set_interval(payload.interval_ms).await;
    Ok(Json(state.scheduler.status().await?))
}
