use chrono::Utc;
use sqlx::SqlitePool;

use crate::db::models::Setting;

/// Setting keys the monitor reads.
pub mod keys {
    pub const EMAIL_NOTIFICATIONS_ENABLED: &str = "email_notifications_enabled";
    pub const ALWAYS_SEND_EMAIL: &str = "always_send_email";
    pub const NOTIFICATION_CHECK_INTERVAL: &str = "notification_check_interval";
    pub const NOTIFICATION_VOICE: &str = "notification_voice";
}

pub async fn get_setting(
    pool: &SqlitePool,
    key: &str,
) -> Result<Option<Setting>, sqlx::Error> {
    sqlx::query_as::<_, Setting>("SELECT * FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await
}

pub async fn update_setting(
    pool: &SqlitePool,
    key: &str,
    value: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO settings (key, value, updated_at) VALUES (?, ?, ?) \
         ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
    )
    .bind(key)
    .bind(value)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

/// A boolean setting is enabled iff its stored value is exactly "true".
pub async fn flag_enabled(pool: &SqlitePool, key: &str) -> Result<bool, sqlx::Error> {
    Ok(get_setting(pool, key)
        .await?
        .map(|s| s.value == "true")
        .unwrap_or(false))
}
