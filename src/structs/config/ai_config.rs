use serde::{Deserialize, Serialize};
use crate::helpers::config_helper::ConfigHelper;

/// Model and outbound-call settings. The API key itself is never stored here,
/// only the name of the environment variable that holds it.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AiConfig {
    #[serde(default = "ConfigHelper::default_model")]
    pub model: String,

    #[serde(default = "ConfigHelper::default_base_url")]
    pub base_url: String,

    #[serde(default = "ConfigHelper::default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "ConfigHelper::default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "ConfigHelper::default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "ConfigHelper::default_max_output_tokens")]
    pub max_output_tokens: u32,

    #[serde(default = "ConfigHelper::default_temperature")]
    pub temperature: f32,

    #[serde(default = "ConfigHelper::default_max_issue_chars")]
    pub max_issue_chars: usize,

    #[serde(default = "ConfigHelper::default_rate_limit_per_minute")]
    pub rate_limit_per_minute: u32,

    #[serde(default = "ConfigHelper::default_rate_limit_burst")]
    pub rate_limit_burst: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model: ConfigHelper::default_model(),
            base_url: ConfigHelper::default_base_url(),
            api_key_env: ConfigHelper::default_api_key_env(),
            timeout_ms: ConfigHelper::default_timeout_ms(),
            max_retries: ConfigHelper::default_max_retries(),
            max_output_tokens: ConfigHelper::default_max_output_tokens(),
            temperature: ConfigHelper::default_temperature(),
            max_issue_chars: ConfigHelper::default_max_issue_chars(),
            rate_limit_per_minute: ConfigHelper::default_rate_limit_per_minute(),
            rate_limit_burst: ConfigHelper::default_rate_limit_burst(),
        }
    }
}
