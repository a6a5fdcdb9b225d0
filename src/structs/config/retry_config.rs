use serde::{Deserialize, Serialize};
use crate::helpers::config_helper::ConfigHelper;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    #[serde(default = "ConfigHelper::default_base_backoff_ms")]
    pub base_backoff_ms: u64,

    #[serde(default = "ConfigHelper::default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// Longest `Retry-After` hint worth waiting for before giving up.
    #[serde(default = "ConfigHelper::default_max_retry_after_ms")]
    pub max_retry_after_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_backoff_ms: ConfigHelper::default_base_backoff_ms(),
            max_backoff_ms: ConfigHelper::default_max_backoff_ms(),
            max_retry_after_ms: ConfigHelper::default_max_retry_after_ms(),
        }
    }
}
