use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde::Deserialize;

use crate::db::models::Setting;
use crate::db::services::settings_service;
use crate::web::{AppError, AppState};

#[derive(Deserialize)]
pub struct UpdateSettingRequest {
    pub value: String,
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/settings/{key}", get(get_setting).put(put_setting))
}

async fn get_setting(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<Setting>, AppError> {
    settings_service::get_setting(&state.pool, &key)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("setting {key}")))
}

async fn put_setting(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Json(payload): Json<UpdateSettingRequest>,
) -> Result<Json<Setting>, AppError> {
    settings_service::update_setting(&state.pool, &key, &payload.value).await?;
    settings_service::get_setting(&state.pool, &key)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::InternalServerError("setting vanished after write".to_string()))
}
