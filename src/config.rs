use std::env;

/// Process configuration, read once at startup. API keys and mail
/// addresses are required; everything else has a sensible default.
#[derive(Clone)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub database_path: String,
    pub ai_api_base: String,
    pub ai_api_key: String,
    pub ai_model: String,
    pub tts_model: String,
    pub mail_api_base: String,
    pub mail_api_key: String,
    pub mail_from: String,
    pub mail_to: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, String> {
        let ai_api_key = env::var("AI_API_KEY").map_err(|_| "AI_API_KEY must be set".to_string())?;
        let mail_api_key =
            env::var("MAIL_API_KEY").map_err(|_| "MAIL_API_KEY must be set".to_string())?;
        let mail_from = env::var("MAIL_FROM").map_err(|_| "MAIL_FROM must be set".to_string())?;
        let mail_to = env::var("MAIL_TO").map_err(|_| "MAIL_TO must be set".to_string())?;

        Ok(ServerConfig {
            listen_addr: env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "relnotify.db".to_string()),
            ai_api_base: env::var("AI_API_BASE")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            ai_api_key,
            ai_model: env::var("AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            tts_model: env::var("TTS_MODEL").unwrap_or_else(|_| "tts-1".to_string()),
            mail_api_base: env::var("MAIL_API_BASE")
                .unwrap_or_else(|_| "https://api.resend.com".to_string()),
            mail_api_key,
            mail_from,
            mail_to,
        })
    }
}
