use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::models::ReleaseAnalysis;

const SYSTEM_PROMPT: &str = "You summarize software release notes. Respond with a single JSON \
object and nothing else, using exactly these keys: tldr (string), categories (object with \
critical_breaking_changes, removals (array of {feature, severity, why}), major_features, \
important_fixes, new_slash_commands, terminal_improvements, api_changes — all arrays), \
action_items (array of strings), sentiment (string). Empty arrays are fine; never omit a key.";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("analysis API returned {status}: {body}")]
    Status { status: reqwest::StatusCode, body: String },
    #[error("analysis API returned no choices")]
    EmptyResponse,
    #[error("analysis output was not the expected JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Client for an OpenAI-compatible chat-completions endpoint.
pub struct AnalysisClient {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl AnalysisClient {
    pub fn new(api_base: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Summarize one raw changelog section into a `ReleaseAnalysis`.
    pub async fn analyze(
        &self,
        source_name: &str,
        section_text: &str,
    ) -> Result<ReleaseAnalysis, AnalysisError> {
        let user_prompt = format!(
            "Latest release notes for {source_name}:\n\n{section_text}"
        );
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: &user_prompt },
            ],
            temperature: 0.2,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
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
            return Err(AnalysisError::Status { status, body });
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or(AnalysisError::EmptyResponse)?;

        debug!(source_name, bytes = content.len(), "analysis response received");
        let analysis = serde_json::from_str(strip_code_fences(content))?;
        Ok(analysis)
    }
}

/// Models often wrap JSON in ```json fences despite instructions.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
