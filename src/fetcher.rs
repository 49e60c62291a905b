use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::warn;

/// Maximum number of attempts per fetch.
const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status} for {url}")]
    Status { status: StatusCode, url: String },
    #[error("retries exhausted without a captured error")]
    RetriesExhausted,
}

/// Retrieves raw changelog text over HTTP with bounded retries.
pub struct Fetcher {
    client: Client,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Fetch `url` as text, retrying up to three times with a 2^i-second
    /// wait between attempts. Non-2xx counts as a failure. The error
    /// returned is the last one encountered. No per-attempt timeout
    /// beyond the transport default; callers wanting one must wrap this.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut last_error: Option<FetchError> = None;

        for attempt in 0..MAX_ATTEMPTS {
            match self.try_fetch(url).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    warn!(
                        url,
                        attempt = attempt + 1,
                        error = %e,
                        "changelog fetch attempt failed"
                    );
                    last_error = Some(e);
                    if attempt + 1 < MAX_ATTEMPTS {
                        let delay = std::time::Duration::from_secs(1u64 << attempt);
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or(FetchError::RetriesExhausted))
    }

    async fn try_fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}
