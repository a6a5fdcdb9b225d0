use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use reqwest::Url;
use crate::config::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, HOST_ENV, MAX_RETRIES_ENV, MODEL_ENV, PORT_ENV, TIMEOUT_MS_ENV,
};
use crate::errors::{CopilotError, CopilotResult};
use crate::structs::config::ai_config::AiConfig;
use crate::structs::config::config::Config;

pub struct ConfigManager;

impl ConfigManager {

    pub fn default_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load from `path`, else the default location if it exists, else defaults.
    /// Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> CopilotResult<Config> {
        let mut config = match path {
            Some(path) => Self::load_file(path)?,
            None => match Self::default_config_path() {
                Some(default_path) if default_path.exists() => Self::load_file(&default_path)?,
                _ => Config::default(),
            },
        };

        Self::apply_env_overrides(&mut config)?;
        Ok(config)
    }

    pub fn load_file(path: &Path) -> CopilotResult<Config> {
        log::info!("📋 Loading config from: {}", path.display());
        let content = fs::read_to_string(path)
            .map_err(|e| CopilotError::config_file_error(&path.display().to_string(), &e.to_string()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> CopilotResult<Config> {
        Ok(toml::from_str(content)?)
    }

    pub fn apply_env_overrides(config: &mut Config) -> CopilotResult<()> {
        Self::apply_overrides(config, |key| env::var(key).ok())
    }

    /// Apply overrides from any key lookup; the environment in production, a map in tests.
    pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> CopilotResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value_of = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(model) = value_of(MODEL_ENV) {
            config.ai.model = model;
        }
        if let Some(value) = value_of(TIMEOUT_MS_ENV) {
            config.ai.timeout_ms = Self::parse_override(TIMEOUT_MS_ENV, &value)?;
        }
        if let Some(value) = value_of(MAX_RETRIES_ENV) {
            config.ai.max_retries = Self::parse_override(MAX_RETRIES_ENV, &value)?;
        }
        if let Some(host) = value_of(HOST_ENV) {
            config.server.host = host;
        }
        if let Some(value) = value_of(PORT_ENV) {
            config.server.port = Self::parse_override(PORT_ENV, &value)?;
        }
        Ok(())
    }

    fn parse_override<T: FromStr>(key: &str, value: &str) -> CopilotResult<T> {
        value.parse().map_err(|_| {
            CopilotError::config_error(
                &format!("invalid value '{}'", value),
                Some(key),
                Some("Use a non-negative integer"),
            )
        })
    }

    /// Read the API key from the environment variable named in the config.
    pub fn resolve_api_key(ai_config: &AiConfig) -> CopilotResult<String> {
        Self::resolve_api_key_with(ai_config, |key| env::var(key).ok())
    }

    pub fn resolve_api_key_with<F>(ai_config: &AiConfig, lookup: F) -> CopilotResult<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(&ai_config.api_key_env)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                CopilotError::config_error(
                    &format!("API key environment variable '{}' is not set", ai_config.api_key_env),
                    Some("ai.api_key_env"),
                    Some(&format!("export {}=<your key>", ai_config.api_key_env)),
                )
            })
    }

    pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if config.ai.model.trim().is_empty() {
            errors.push("ai.model must not be empty".to_string());
        }
        if !config.ai.base_url.starts_with("http://") && !config.ai.base_url.starts_with("https://") {
            errors.push(format!("ai.base_url must be an http(s) URL: {}", config.ai.base_url));
        }
        if config.ai.api_key_env.trim().is_empty() {
            errors.push("ai.api_key_env must name an environment variable".to_string());
        }
        if config.ai.timeout_ms == 0 {
            errors.push("ai.timeout_ms must be greater than zero".to_string());
        }
        if config.ai.max_retries == 0 {
            errors.push("ai.max_retries must allow at least one attempt".to_string());
        }
        if config.ai.max_issue_chars == 0 {
            errors.push("ai.max_issue_chars must be greater than zero".to_string());
        }
        if config.ai.rate_limit_per_minute == 0 || config.ai.rate_limit_burst == 0 {
            errors.push("ai.rate_limit_per_minute and ai.rate_limit_burst must be greater than zero".to_string());
        }
        if config.retry.base_backoff_ms > config.retry.max_backoff_ms {
            errors.push(format!(
                "retry.base_backoff_ms ({}) exceeds retry.max_backoff_ms ({})",
                config.retry.base_backoff_ms, config.retry.max_backoff_ms
            ));
        }
        if config.server.host.trim().is_empty() {
            errors.push("server.host must not be empty".to_string());
        }
        for origin in &config.server.allowed_origins {
            if !Self::is_valid_origin(origin) {
                errors.push(format!("server.allowed_origins entry is not a scheme://host[:port] origin: {}", origin));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn is_valid_origin(origin: &str) -> bool {
        Url::parse(origin).is_ok_and(|url| {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some()
                && url.path() == "/"
                && url.query().is_none()
                && !origin.ends_with('/')
        })
    }

    pub fn create_sample_config(path: &Path) -> CopilotResult<()> {
        let sample_config = r#"# SecureScan Copilot configuration

[server]
host = "0.0.0.0"
port = 8000
allowed_origins = [
    "http://localhost:8080",
    "http://127.0.0.1:8080",
    "http://localhost:3000",
    "http://127.0.0.1:3000",
]

[ai]
model = "gemini-3-flash-preview"
base_url = "https://generativelanguage.googleapis.com/v1beta"
# The key is read from this environment variable, never from this file
api_key_env = "GEMINI_API_KEY"
timeout_ms = 15000
# Total attempts per analysis, including the first one
max_retries = 3
max_output_tokens = 2048
temperature = 0.2
max_issue_chars = 10000

# Outbound rate limiting
rate_limit_per_minute = 50
rate_limit_burst = 5

[retry]
base_backoff_ms = 500
max_backoff_ms = 8000
# Give up instead of waiting when the API asks for a longer pause
max_retry_after_ms = 30000
"#;
        if path.exists() {
            return Err(CopilotError::config_file_error(
                &path.display().to_string(),
                "file already exists",
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, sample_config)?;
        log::info!("✅ Created sample config at: {}", path.display());
        Ok(())
    }

}
