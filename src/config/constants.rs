use std::time::Duration;

pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 8000;
pub const SERVER_SHUTDOWN_GRACE_PERIOD_MS: u64 = 100;
pub const MAX_REQUEST_BODY_BYTES: u64 = 64 * 1024;
pub const CORS_MAX_AGE_SECS: u64 = 600;

pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const MODEL_ENV: &str = "SECURESCAN_MODEL";
pub const TIMEOUT_MS_ENV: &str = "SECURESCAN_TIMEOUT_MS";
pub const MAX_RETRIES_ENV: &str = "SECURESCAN_MAX_RETRIES";
pub const HOST_ENV: &str = "SECURESCAN_HOST";
pub const PORT_ENV: &str = "SECURESCAN_PORT";

pub const CONFIG_DIR_NAME: &str = ".securescan";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Issue analyzed by the legacy `POST /scan` route.
pub const SAMPLE_ISSUE: &str = "Hardcoded API key found in source code";

pub const fn duration_millis(milliseconds: u64) -> Duration {
    Duration::from_millis(milliseconds)
}
