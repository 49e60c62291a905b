use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use serde::Serialize;
use tera::{Context, Tera};

use super::{ReleaseMailer, SenderError};
use crate::analysis::ReleaseAnalysis;
use crate::notifications::models::ReleaseEmail;

const EMAIL_TEMPLATE: &str = r#"<html>
<body>
  <h2>{{ source_name }} {{ version }}</h2>
  {% if date %}<p>Released {{ date }}</p>{% endif %}
  <p>{{ analysis.tldr }}</p>
  {% if analysis.categories.critical_breaking_changes %}
  <h3>Breaking changes</h3>
  <ul>{% for item in analysis.categories.critical_breaking_changes %}<li>{{ item }}</li>{% endfor %}</ul>
  {% endif %}
  {% if analysis.categories.removals %}
  <h3>Removals</h3>
  <ul>{% for r in analysis.categories.removals %}<li><b>{{ r.feature }}</b> ({{ r.severity }}): {{ r.why }}</li>{% endfor %}</ul>
  {% endif %}
  {% if analysis.categories.major_features %}
  <h3>Major features</h3>
  <ul>{% for item in analysis.categories.major_features %}<li>{{ item }}</li>{% endfor %}</ul>
  {% endif %}
  {% if analysis.categories.important_fixes %}
  <h3>Important fixes</h3>
  <ul>{% for item in analysis.categories.important_fixes %}<li>{{ item }}</li>{% endfor %}</ul>
  {% endif %}
  {% if analysis.categories.new_slash_commands %}
  <h3>New slash commands</h3>
  <ul>{% for item in analysis.categories.new_slash_commands %}<li>{{ item }}</li>{% endfor %}</ul>
  {% endif %}
  {% if analysis.categories.terminal_improvements %}
  <h3>Terminal improvements</h3>
  <ul>{% for item in analysis.categories.terminal_improvements %}<li>{{ item }}</li>{% endfor %}</ul>
  {% endif %}
  {% if analysis.categories.api_changes %}
  <h3>API changes</h3>
  <ul>{% for item in analysis.categories.api_changes %}<li>{{ item }}</li>{% endfor %}</ul>
  {% endif %}
  {% if analysis.action_items %}
  <h3>Action items</h3>
  <ul>{% for item in analysis.action_items %}<li>{{ item }}</li>{% endfor %}</ul>
  {% endif %}
  {% if analysis.sentiment %}<p><i>Overall: {{ analysis.sentiment }}</i></p>{% endif %}
</body>
</html>"#;

#[derive(Serialize)]
struct EmailContext<'a> {
    source_name: &'a str,
    version: &'a str,
    date: &'a str,
    analysis: &'a ReleaseAnalysis,
}

/// Render the HTML body for a release email.
pub fn render_release_email(
    source_name: &str,
    version: &str,
    date: &str,
    analysis: &ReleaseAnalysis,
) -> Result<String, SenderError> {
    let context = Context::from_serialize(EmailContext {
        source_name,
        version,
        date,
        analysis,
    })
    .map_err(|e| SenderError::TemplatingError(e.to_string()))?;
    Tera::one_off(EMAIL_TEMPLATE, &context, true)
        .map_err(|e| SenderError::TemplatingError(e.to_string()))
}

/// Sends release emails through an HTTP mail API.
pub struct EmailApiSender {
    client: Client,
    api_base: String,
    api_key: String,
    from: String,
}

#[derive(Serialize)]
struct MailApiRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<MailApiAttachment>,
}

#[derive(Serialize)]
struct MailApiAttachment {
    filename: String,
    content: String,
}

impl EmailApiSender {
    pub fn new(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        from: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into(),
            api_key: api_key.into(),
            from: from.into(),
        }
    }
}

#[async_trait]
impl ReleaseMailer for EmailApiSender {
    async fn send(&self, email: &ReleaseEmail) -> Result<(), SenderError> {
        let attachments = email
            .attachment
            .iter()
            .map(|a| MailApiAttachment {
                filename: a.filename.clone(),
                content: BASE64.encode(&a.content),
            })
            .collect();

        let payload = MailApiRequest {
            from: &self.from,
            to: vec![&email.to],
            subject: &email.subject,
            html: &email.html,
            attachments,
        };

        let response = self
            .client
            .post(format!("{}/emails", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(SenderError::SendFailed(format!(
                "mail API returned {status}: {body}"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisCategories, RemovalNote};
    use crate::notifications::models::EmailAttachment;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_analysis() -> ReleaseAnalysis {
        ReleaseAnalysis {
            tldr: "A quick release".to_string(),
            categories: AnalysisCategories {
                critical_breaking_changes: vec!["Dropped node 16".to_string()],
                removals: vec![RemovalNote {
                    feature: "legacy flag".to_string(),
                    severity: "low".to_string(),
                    why: "unused".to_string(),
                }],
                major_features: vec!["dark mode".to_string()],
                ..Default::default()
            },
            action_items: vec!["re-run setup".to_string()],
            sentiment: "positive".to_string(),
        }
    }

    #[test]
    fn rendered_body_contains_all_sections() {
        let html =
            render_release_email("Example", "1.1.0", "2024-03-01", &sample_analysis()).unwrap();
        assert!(html.contains("Example 1.1.0"));
        assert!(html.contains("Released 2024-03-01"));
        assert!(html.contains("A quick release"));
        assert!(html.contains("Dropped node 16"));
        assert!(html.contains("legacy flag"));
        assert!(html.contains("re-run setup"));
        assert!(html.contains("positive"));
    }

    #[test]
    fn empty_sections_are_omitted() {
        let analysis = ReleaseAnalysis {
            tldr: "tiny".to_string(),
            ..Default::default()
        };
        let html = render_release_email("Example", "1.0.1", "", &analysis).unwrap();
        assert!(!html.contains("Breaking changes"));
        assert!(!html.contains("Released"));
        assert!(html.contains("tiny"));
    }

    #[tokio::test]
    async fn posts_the_expected_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(body_partial_json(serde_json::json!({
                "from": "relnotify@example.com",
                "to": ["dev@example.com"],
                "subject": "Example 1.1.0 released",
                "attachments": [{"filename": "example-1.1.0.mp3", "content": BASE64.encode(b"mp3")}]
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let sender = EmailApiSender::new(server.uri(), "key", "relnotify@example.com");
        let email = ReleaseEmail {
            to: "dev@example.com".to_string(),
            subject: "Example 1.1.0 released".to_string(),
            html: "<p>hi</p>".to_string(),
            attachment: Some(EmailAttachment {
                filename: "example-1.1.0.mp3".to_string(),
                content: b"mp3".to_vec(),
            }),
        };
        sender.send(&email).await.unwrap();
    }

    #[tokio::test]
    async fn non_success_maps_to_send_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(ResponseTemplate::new(422).set_body_string("bad address"))
            .mount(&server)
            .await;

        let sender = EmailApiSender::new(server.uri(), "key", "relnotify@example.com");
        let email = ReleaseEmail {
            to: "nope".to_string(),
            subject: "s".to_string(),
            html: "h".to_string(),
            attachment: None,
        };
        let err = sender.send(&email).await.unwrap_err();
        assert!(matches!(err, SenderError::SendFailed(_)));
    }
}
