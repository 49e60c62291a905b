use async_trait::async_trait;
use thiserror::Error;

use super::models::ReleaseEmail;

pub mod email;

#[derive(Debug, Error)]
pub enum SenderError {
    #[error("failed to send notification: {0}")]
    SendFailed(String),
    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("templating error: {0}")]
    TemplatingError(String),
}

/// Delivery backend for release notifications. Lets tests substitute a
/// recording fake for the real mail API.
#[async_trait]
pub trait ReleaseMailer: Send + Sync {
    async fn send(&self, email: &ReleaseEmail) -> Result<(), SenderError>;
}
