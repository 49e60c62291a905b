use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// One monitored changelog origin.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub id: String,
    pub name: String,
    pub url: String,
    pub active: bool,
    pub last_version: Option<String>,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Durable record of one observed (source, version) pair.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord {
    pub id: i64,
    pub source_id: String,
    pub version: String,
    pub detected_at: DateTime<Utc>,
    pub notified: bool,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}
