use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::Source;

pub async fn create_source(
    pool: &SqlitePool,
    name: &str,
    url: &str,
) -> Result<Source, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now();
    sqlx::query(
        "INSERT INTO sources (id, name, url, active, created_at) VALUES (?, ?, ?, 1, ?)",
    )
    .bind(&id)
    .bind(name)
    .bind(url)
    .bind(now)
    .execute(pool)
    .await?;

    get_source(pool, &id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

pub async fn get_source(pool: &SqlitePool, id: &str) -> Result<Option<Source>, sqlx::Error> {
    sqlx::query_as::<_, Source>("SELECT * FROM sources WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_sources(pool: &SqlitePool) -> Result<Vec<Source>, sqlx::Error> {
    sqlx::query_as::<_, Source>("SELECT * FROM sources ORDER BY name")
        .fetch_all(pool)
        .await
}

pub async fn list_active_sources(pool: &SqlitePool) -> Result<Vec<Source>, sqlx::Error> {
    sqlx::query_as::<_, Source>("SELECT * FROM sources WHERE active = 1 ORDER BY name")
        .fetch_all(pool)
        .await
}

/// Apply the provided fields to an existing source.
pub async fn update_source(
    pool: &SqlitePool,
    id: &str,
    name: Option<&str>,
    url: Option<&str>,
    active: Option<bool>,
) -> Result<Option<Source>, sqlx::Error> {
    let Some(existing) = get_source(pool, id).await? else {
        return Ok(None);
    };

    let name = name.unwrap_or(&existing.name);
    let url = url.unwrap_or(&existing.url);
    let active = active.unwrap_or(existing.active);

    sqlx::query("UPDATE sources SET name = ?, url = ?, active = ? WHERE id = ?")
        .bind(name)
        .bind(url)
        .bind(active)
        .bind(id)
        .execute(pool)
        .await?;

    get_source(pool, id).await
}

/// Deactivation stops monitoring without losing history.
pub async fn deactivate_source(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE sources SET active = 0 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete a source and all of its version history.
pub async fn delete_source(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    sqlx::query("DELETE FROM version_history WHERE source_id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    let result = sqlx::query("DELETE FROM sources WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::services::version_service;
    use crate::db::test_pool;

    #[tokio::test]
    async fn create_and_list_roundtrip() {
        let pool = test_pool().await;
        let source = create_source(&pool, "Example", "https://example.com/CHANGELOG.md")
            .await
            .unwrap();
        assert!(source.active);
        assert!(source.last_version.is_none());

        let all = list_sources(&pool).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, source.id);
    }

    #[tokio::test]
    async fn deactivated_sources_drop_out_of_the_active_list() {
        let pool = test_pool().await;
        let source = create_source(&pool, "Example", "https://example.com/c.md")
            .await
            .unwrap();

        assert!(deactivate_source(&pool, &source.id).await.unwrap());
        assert!(list_active_sources(&pool).await.unwrap().is_empty());
        // Still present, just inactive.
        let fetched = get_source(&pool, &source.id).await.unwrap().unwrap();
        assert!(!fetched.active);
    }

    #[tokio::test]
    async fn update_applies_only_provided_fields() {
        let pool = test_pool().await;
        let source = create_source(&pool, "Old", "https://example.com/c.md")
            .await
            .unwrap();

        let updated = update_source(&pool, &source.id, Some("New"), None, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "New");
        assert_eq!(updated.url, source.url);
        assert!(updated.active);
    }

    #[tokio::test]
    async fn delete_cascades_to_history() {
        let pool = test_pool().await;
        let source = create_source(&pool, "Example", "https://example.com/c.md")
            .await
            .unwrap();
        version_service::record_if_new(&pool, "1.0.0", &source.id)
            .await
            .unwrap();

        assert!(delete_source(&pool, &source.id).await.unwrap());
        assert!(get_source(&pool, &source.id).await.unwrap().is_none());
        assert!(
            version_service::history_for_source(&pool, &source.id)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn delete_of_unknown_source_reports_false() {
        let pool = test_pool().await;
        assert!(!delete_source(&pool, "missing").await.unwrap());
    }
}
