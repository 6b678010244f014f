use std::env;

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub openai_api_key: String,
    pub openai_api_url: String,
    pub openai_model: String,
    pub llm_timeout_secs: u64,
    pub llm_max_retries: u32,
    pub clinic_name: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            openai_api_url: env::var("OPENAI_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
            llm_timeout_secs: env::var("LLM_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            llm_max_retries: env::var("LLM_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            clinic_name: env::var("CLINIC_NAME").unwrap_or_else(|_| "Super Clinic".to_string()),
        }
    }
}
