use chrono::Utc;
use sqlx::SqlitePool;

use crate::db::models::VersionRecord;

/// Most recently detected version, per source or globally.
pub async fn last_known_version(
    pool: &SqlitePool,
    source_id: Option<&str>,
) -> Result<Option<String>, sqlx::Error> {
    match source_id {
        Some(id) => {
            sqlx::query_scalar::<_, String>(
                "SELECT version FROM version_history WHERE source_id = ? \
                 ORDER BY detected_at DESC, id DESC LIMIT 1",
            )
            .bind(id)
            .fetch_optional(pool)
            .await
        }
        None => {
            sqlx::query_scalar::<_, String>(
                "SELECT version FROM version_history ORDER BY detected_at DESC, id DESC LIMIT 1",
            )
            .fetch_optional(pool)
            .await
        }
    }
}

/// Idempotent insert of a (source, version) observation.
///
/// The source's cached last-version and last-checked fields are updated
/// on every call, known version or not; this is the check heartbeat.
pub async fn record_if_new(
    pool: &SqlitePool,
    version: &str,
    source_id: &str,
) -> Result<(), sqlx::Error> {
    let now = Utc::now();
    sqlx::query(
        "INSERT INTO version_history (source_id, version, detected_at, notified) \
         VALUES (?, ?, ?, 0) ON CONFLICT (source_id, version) DO NOTHING",
    )
    .bind(source_id)
    .bind(version)
    .bind(now)
    .execute(pool)
    .await?;

    sqlx::query("UPDATE sources SET last_version = ?, last_checked_at = ? WHERE id = ?")
        .bind(version)
        .bind(now)
        .bind(source_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Flip the notified flag. A missing row is a no-op, never an error.
pub async fn mark_notified(
    pool: &SqlitePool,
    version: &str,
    source_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE version_history SET notified = 1 WHERE source_id = ? AND version = ?")
        .bind(source_id)
        .bind(version)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn history_for_source(
    pool: &SqlitePool,
    source_id: &str,
) -> Result<Vec<VersionRecord>, sqlx::Error> {
    sqlx::query_as::<_, VersionRecord>(
        "SELECT * FROM version_history WHERE source_id = ? ORDER BY detected_at DESC, id DESC",
    )
    .bind(source_id)
    .fetch_all(pool)
    .await
}
