use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;

use crate::db::models::{Source, VersionRecord};
use crate::db::services::{source_service, version_service};
use crate::web::{AppError, AppState};

#[derive(Deserialize)]
pub struct CreateSourceRequest {
    pub name: String,
    pub url: String,
}

#[derive(Deserialize)]
pub struct UpdateSourceRequest {
    pub name: Option<String>,
    pub url: Option<String>,
    pub active: Option<bool>,
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/sources", post(create_source).get(list_sources))
        .route(
            "/api/sources/{id}",
            get(get_source).put(update_source).delete(delete_source),
        )
        .route("/api/sources/{id}/deactivate", post(deactivate_source))
        .route("/api/sources/{id}/history", get(source_history))
}

async fn create_source(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateSourceRequest>,
) -> Result<(StatusCode, Json<Source>), AppError> {
    if payload.name.trim().is_empty() || payload.url.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "name and url must not be empty".to_string(),
        ));
    }
    let source = source_service::create_source(&state.pool, &payload.name, &payload.url).await?;
    Ok((StatusCode::CREATED, Json(source)))
}

async fn list_sources(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Source>>, AppError> {
    Ok(Json(source_service::list_sources(&state.pool).await?))
}

async fn get_source(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Source>, AppError> {
    source_service::get_source(&state.pool, &id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("source {id}")))
}

async fn update_source(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateSourceRequest>,
) -> Result<Json<Source>, AppError> {
    source_service::update_source(
        &state.pool,
        &id,
        payload.name.as_deref(),
        payload.url.as_deref(),
        payload.active,
    )
    .await?
    .map(Json)
    .ok_or_else(|| AppError::NotFound(format!("source {id}")))
}

async fn deactivate_source(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if source_service::deactivate_source(&state.pool, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("source {id}")))
    }
}

async fn delete_source(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if source_service::delete_source(&state.pool, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("source {id}")))
    }
}

async fn source_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<VersionRecord>>, AppError> {
    if source_service::get_source(&state.pool, &id).await?.is_none() {
        return Err(AppError::NotFound(format!("source {id}")));
    }
    Ok(Json(
        version_service::history_for_source(&state.pool, &id).await?,
    ))
}
