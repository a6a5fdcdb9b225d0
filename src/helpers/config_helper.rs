use crate::config::constants::{DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, GEMINI_API_KEY_ENV, GEMINI_BASE_URL};

pub struct ConfigHelper;

impl ConfigHelper {
    pub fn default_host() -> String {
        DEFAULT_SERVER_HOST.to_string()
    }

    pub const fn default_port() -> u16 {
        DEFAULT_SERVER_PORT
    }

    pub fn default_allowed_origins() -> Vec<String> {
        vec![
            "http://localhost:8080".to_string(),
            "http://127.0.0.1:8080".to_string(),
            "http://localhost:3000".to_string(),
            "http://127.0.0.1:3000".to_string(),
        ]
    }

    pub fn default_model() -> String {
        "gemini-3-flash-preview".to_string()
    }

    pub fn default_base_url() -> String {
        GEMINI_BASE_URL.to_string()
    }

    pub fn default_api_key_env() -> String {
        GEMINI_API_KEY_ENV.to_string()
    }

    pub const fn default_timeout_ms() -> u64 {
        15_000
    }

    pub const fn default_max_retries() -> u32 {
        3
    }

    pub const fn default_max_output_tokens() -> u32 {
        2048
    }

    pub const fn default_temperature() -> f32 {
        0.2
    }

    pub const fn default_max_issue_chars() -> usize {
        10_000
    }

    pub const fn default_rate_limit_per_minute() -> u32 {
        50
    }

    pub const fn default_rate_limit_burst() -> u32 {
        5
    }

    pub const fn default_base_backoff_ms() -> u64 {
        500
    }

    pub const fn default_max_backoff_ms() -> u64 {
        8_000
    }

    pub const fn default_max_retry_after_ms() -> u64 {
        30_000
    }
}
