use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};
use tracing::{debug, info};

use super::pipeline::{CheckContext, run_sweep};
use super::schedule::CheckSchedule;
use crate::db::services::settings_service::{self, keys};
use crate::db::services::version_service;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorStatus {
    pub enabled: bool,
    pub interval_ms: i64,
    pub last_known_version: Option<String>,
    pub is_running: bool,
    pub trigger_expression: Option<String>,
}

struct RunningMonitor {
    handle: JoinHandle<()>,
    schedule: CheckSchedule,
    interval_ms: i64,
}

/// Owns the lifecycle of the single recurring check task. There is
/// never more than one live trigger: installing a new one cancels and
/// clears the previous one first.
pub struct MonitorScheduler {
    ctx: Arc<CheckContext>,
    state: Mutex<Option<RunningMonitor>>,
}

impl MonitorScheduler {
    pub fn new(ctx: Arc<CheckContext>) -> Arc<Self> {
        Arc::new(Self {
            ctx,
            state: Mutex::new(None),
        })
    }

    /// (Re)start the recurring trigger for the given period. `ms <= 0`
    /// stops monitoring entirely.
    pub async fn set_interval(&self, ms: i64) {
        let mut state = self.state.lock().await;
        if let Some(previous) = state.take() {
            previous.handle.abort();
            debug!(trigger = %previous.schedule, "previous monitor trigger cancelled");
        }

        let Some(schedule) = CheckSchedule::from_millis(ms) else {
            info!("monitoring stopped");
            return;
        };

        let ctx = Arc::clone(&self.ctx);
        let period = schedule.period();
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                run_sweep(&ctx).await;
            }
        });

        info!(trigger = %schedule, interval_ms = ms, "monitor trigger installed");
        *state = Some(RunningMonitor {
            handle,
            schedule,
            interval_ms: ms,
        });
    }

    pub async fn stop(&self) {
        self.set_interval(0).await;
    }

    /// Run one sweep immediately, independent of the timer.
    pub async fn check_now(&self) {
        run_sweep(&self.ctx).await;
    }

    pub async fn status(&self) -> Result<MonitorStatus, sqlx::Error> {
        let pool = &self.ctx.pool;
        let enabled =
            settings_service::flag_enabled(pool, keys::EMAIL_NOTIFICATIONS_ENABLED).await?;
        let last_known_version = version_service::last_known_version(pool, None).await?;

        let state = self.state.lock().await;
        let (is_running, interval_ms, trigger_expression) = match state.as_ref() {
            Some(running) => (
                true,
                running.interval_ms,
                Some(running.schedule.to_string()),
            ),
            None => (false, 0, None),
        };

        Ok(MonitorStatus {
            enabled,
            interval_ms,
            last_known_version,
            is_running,
            trigger_expression,
        })
    }

    /// Reinstall the trigger persisted in settings, if any. Called once
    /// at process start.
    pub async fn restore_from_settings(&self) -> Result<(), sqlx::Error> {
        let stored = settings_service::get_setting(&self.ctx.pool, keys::NOTIFICATION_CHECK_INTERVAL)
            .await?;
        if let Some(setting) = stored {
            match setting.value.parse::<i64>() {
                Ok(ms) => self.set_interval(ms).await,
                Err(_) => {
                    debug!(value = %setting.value, "ignoring unparseable check interval setting");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisClient;
    use crate::db::test_pool;
    use crate::fetcher::Fetcher;
    use crate::monitor::pipeline::tests::RecordingMailer;
    use crate::speech::SpeechClient;

    async fn scheduler() -> Arc<MonitorScheduler> {
        let ctx = Arc::new(CheckContext {
            pool: test_pool().await,
            fetcher: Fetcher::new(),
            analyzer: AnalysisClient::new("http://localhost:0", "k", "m"),
            speech: SpeechClient::new("http://localhost:0", "k", "tts-1"),
            mailer: RecordingMailer::new(),
            notify_email: "dev@example.com".to_string(),
        });
        MonitorScheduler::new(ctx)
    }

    #[tokio::test]
    async fn set_interval_installs_a_single_trigger() {
        let scheduler = scheduler().await;
        scheduler.set_interval(15 * 60_000).await;

        let status = scheduler.status().await.unwrap();
        assert!(status.is_running);
        assert_eq!(status.interval_ms, 15 * 60_000);
        assert_eq!(status.trigger_expression.as_deref(), Some("every 15 minutes"));

        // Replacing the trigger keeps exactly one running.
        scheduler.set_interval(3_600_000).await;
        let status = scheduler.status().await.unwrap();
        assert!(status.is_running);
        assert_eq!(status.trigger_expression.as_deref(), Some("hourly"));
    }

    #[tokio::test]
    async fn non_positive_interval_stops_monitoring() {
        let scheduler = scheduler().await;
        scheduler.set_interval(60_000).await;
        scheduler.set_interval(0).await;

        let status = scheduler.status().await.unwrap();
        assert!(!status.is_running);
        assert_eq!(status.interval_ms, 0);
        assert!(status.trigger_expression.is_none());
    }

    #[tokio::test]
    async fn restore_reads_the_persisted_interval() {
        let scheduler = scheduler().await;
        settings_service::update_setting(
            &scheduler.ctx.pool,
            keys::NOTIFICATION_CHECK_INTERVAL,
            "900000",
        )
        .await
        .unwrap();

        scheduler.restore_from_settings().await.unwrap();
        let status = scheduler.status().await.unwrap();
        assert!(status.is_running);
        assert_eq!(status.interval_ms, 900_000);
    }

    #[tokio::test]
    async fn restore_ignores_garbage_and_absent_settings() {
        let scheduler = scheduler().await;
        scheduler.restore_from_settings().await.unwrap();
        assert!(!scheduler.status().await.unwrap().is_running);

        settings_service::update_setting(
            &scheduler.ctx.pool,
            keys::NOTIFICATION_CHECK_INTERVAL,
            "soon",
        )
        .await
        .unwrap();
        scheduler.restore_from_settings().await.unwrap();
        assert!(!scheduler.status().await.unwrap().is_running);
    }
}
