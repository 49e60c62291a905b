use reqwest::Client;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("speech API returned {status}: {body}")]
    Status { status: reqwest::StatusCode, body: String },
}

/// Client for an OpenAI-style text-to-speech endpoint returning MP3 bytes.
pub struct SpeechClient {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
}

impl SpeechClient {
    pub fn new(api_base: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    pub async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, SpeechError> {
        let request = SpeechRequest {
            model: &self.model,
            input: text,
            voice,
        };

        let response = self
            .client
            .post(format!("{}/audio/speech", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(SpeechError::Status { status, body });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn returns_audio_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/audio/speech"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x49, 0x44, 0x33]))
            .mount(&server)
            .await;

        let client = SpeechClient::new(server.uri(), "k", "tts-1");
        let bytes = client.synthesize("hello", "alloy").await.unwrap();
        assert_eq!(bytes, vec![0x49, 0x44, 0x33]);
    }

    #[tokio::test]
    async fn non_success_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/audio/speech"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad voice"))
            .mount(&server)
            .await;

        let client = SpeechClient::new(server.uri(), "k", "tts-1");
        let err = client.synthesize("hello", "nope").await.unwrap_err();
        assert!(matches!(err, SpeechError::Status { .. }));
    }
}
