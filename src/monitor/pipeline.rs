use std::sync::Arc;

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::analysis::{AnalysisClient, AnalysisError};
use crate::changelog::parser::parse_latest_only;
use crate::db::models::Source;
use crate::db::services::settings_service::{self, keys};
use crate::db::services::{source_service, version_service};
use crate::fetcher::{FetchError, Fetcher};
use crate::notifications::senders::email::render_release_email;
use crate::notifications::{EmailAttachment, ReleaseEmail, ReleaseMailer, SenderError};
use crate::speech::SpeechClient;

const DEFAULT_VOICE: &str = "alloy";

/// Everything one check needs; shared by the scheduler and manual runs.
pub struct CheckContext {
    pub pool: SqlitePool,
    pub fetcher: Fetcher,
    pub analyzer: AnalysisClient,
    pub speech: SpeechClient,
    pub mailer: Arc<dyn ReleaseMailer>,
    pub notify_email: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Version unchanged and always-send off; only the heartbeat moved.
    UpToDate,
    /// Notifications disabled; the version was recorded silently.
    RecordedOnly,
    Notified { version: String },
}

#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("no version header found in changelog")]
    NoVersionFound,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("analysis failed: {0}")]
    Analysis(#[from] AnalysisError),
    #[error("email send failed: {0}")]
    Send(#[from] SenderError),
}

/// One full pass over all active sources, strictly sequential. A
/// failing source is logged and never blocks the ones after it.
pub async fn run_sweep(ctx: &CheckContext) {
    let sources = match source_service::list_active_sources(&ctx.pool).await {
        Ok(sources) => sources,
        Err(e) => {
            warn!(error = %e, "could not load active sources; skipping sweep");
            return;
        }
    };
    if sources.is_empty() {
        debug!("no active sources to check");
        return;
    }

    info!(sources = sources.len(), "starting changelog sweep");
    for source in &sources {
        match check_source(ctx, source).await {
            Ok(CheckOutcome::Notified { version }) => {
                info!(source_id = %source.id, version, "release notification sent");
            }
            Ok(CheckOutcome::UpToDate) => {
                debug!(source_id = %source.id, "no new version");
            }
            Ok(CheckOutcome::RecordedOnly) => {
                debug!(source_id = %source.id, "notifications disabled; version recorded");
            }
            Err(e) => {
                warn!(source_id = %source.id, error = %e, "source check failed");
            }
        }
    }
}

/// The per-source pipeline: fetch, extract the latest section, diff
/// against the ledger, then analyze, synthesize and mail.
pub async fn check_source(ctx: &CheckContext, source: &Source) -> Result<CheckOutcome, CheckError> {
    let markdown = ctx.fetcher.fetch(&source.url).await?;
    let latest = parse_latest_only(&markdown).ok_or(CheckError::NoVersionFound)?;

    let notifications_enabled =
        settings_service::flag_enabled(&ctx.pool, keys::EMAIL_NOTIFICATIONS_ENABLED).await?;
    if !notifications_enabled {
        version_service::record_if_new(&ctx.pool, &latest.version, &source.id).await?;
        return Ok(CheckOutcome::RecordedOnly);
    }

    let last_known = version_service::last_known_version(&ctx.pool, Some(&source.id)).await?;
    let is_new = last_known.as_deref() != Some(latest.version.as_str());
    let always_send = settings_service::flag_enabled(&ctx.pool, keys::ALWAYS_SEND_EMAIL).await?;

    if !is_new && !always_send {
        // Heartbeat only.
        version_service::record_if_new(&ctx.pool, &latest.version, &source.id).await?;
        return Ok(CheckOutcome::UpToDate);
    }

    // Recorded before the analysis call; a failure past this point must
    // not cause the same version to be re-detected as new next cycle.
    version_service::record_if_new(&ctx.pool, &latest.version, &source.id).await?;

    let analysis = ctx.analyzer.analyze(&source.name, &latest.raw).await?;

    let voice = settings_service::get_setting(&ctx.pool, keys::NOTIFICATION_VOICE)
        .await?
        .map(|s| s.value)
        .unwrap_or_else(|| DEFAULT_VOICE.to_string());
    let audio = match ctx.speech.synthesize(&analysis.tldr, &voice).await {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            warn!(source_id = %source.id, error = %e, "speech synthesis failed; mailing without audio");
            None
        }
    };

    let html = render_release_email(&source.name, &latest.version, &latest.date, &analysis)?;
    let email = ReleaseEmail {
        to: ctx.notify_email.clone(),
        subject: format!("{} {} released", source.name, latest.version),
        html,
        attachment: audio.map(|content| EmailAttachment {
            filename: format!("release-{}.mp3", latest.version),
            content,
        }),
    };

    // A send failure leaves notified = false with no retry this cycle;
    // the next sweep sees is_new = false, so the notification is lost
    // unless always-send is enabled.
    ctx.mailer.send(&email).await?;
    version_service::mark_notified(&ctx.pool, &latest.version, &source.id).await?;

    Ok(CheckOutcome::Notified {
        version: latest.version,
    })
}
