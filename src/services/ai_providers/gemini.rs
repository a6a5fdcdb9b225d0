use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::Client;
use crate::config::constants::duration_millis;
use crate::enums::ai_provider_error::AiProviderError;
use crate::errors::CopilotResult;
use crate::services::rate_limiter::ApiRateLimiter;
use crate::structs::ai::gemini::gemini_content::GeminiContent;
use crate::structs::ai::gemini::gemini_generation_config::GeminiGenerationConfig;
use crate::structs::ai::gemini::gemini_request::GeminiRequest;
use crate::structs::ai::gemini::gemini_response::GeminiResponse;
use crate::structs::config::ai_config::AiConfig;
use crate::traits::ai_provider::AiProvider;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct GeminiProvider {
    api_key: String,
    base_url: String,
    client: Client,
    model: String,
    temperature: f32,
    max_output_tokens: u32,
    rate_limiter: Arc<ApiRateLimiter>,
}

impl GeminiProvider {
    /// The reqwest client is pooled and shared by every clone of the provider.
    pub fn new(api_key: String, config: &AiConfig, rate_limiter: Arc<ApiRateLimiter>) -> CopilotResult<Self> {
        let client = Client::builder()
            .timeout(duration_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            model: config.model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            rate_limiter,
        })
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn get_request(&self, prompt: &str) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent::user_text(prompt.to_string())],
            generation_config: Some(GeminiGenerationConfig {
                temperature: Some(self.temperature),
                top_p: Some(0.95),
                top_k: Some(40),
                max_output_tokens: Some(self.max_output_tokens),
                candidate_count: Some(1),
            }),
        }
    }

    async fn make_request(&self, request_body: &GeminiRequest) -> Result<reqwest::Response, AiProviderError> {
        log::debug!("📦 Request model: {}", self.model);

        self.client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(request_body)
            .send()
            .await
            .map_err(Self::classify_transport_error)
    }

    fn classify_transport_error(error: reqwest::Error) -> AiProviderError {
        // the URL is dropped so nothing request-specific ends up in logs
        let error = error.without_url();
        if error.is_timeout() {
            AiProviderError::Timeout(error.to_string())
        } else if error.is_builder() {
            AiProviderError::InvalidRequest(error.to_string())
        } else {
            AiProviderError::NetworkError(error.to_string())
        }
    }

    /// `Retry-After` in delta-seconds; HTTP-date values are ignored.
    fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
        headers
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
    }

    pub fn extract_text(body: &str) -> Result<String, AiProviderError> {
        let response: GeminiResponse = serde_json::from_str(body)
            .map_err(|e| AiProviderError::SerializationError(format!("Failed to parse Gemini response: {}", e)))?;

        response.first_candidate_text().ok_or_else(|| {
            let reason = response.finish_reason().unwrap_or("no candidates");
            AiProviderError::SerializationError(format!("No content in response ({})", reason))
        })
    }
}

#[async_trait]
impl AiProvider for GeminiProvider {

    async fn wait_for_capacity(&self) {
        self.rate_limiter.acquire().await;
    }

    async fn generate(&self, prompt: &str) -> Result<String, AiProviderError> {
        let request_body = self.get_request(prompt);
        let response = self.make_request(&request_body).await?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = Self::parse_retry_after(response.headers());
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            log::warn!("❌ Gemini API Error Response ({}): {}", status, error_text);
            return Err(AiProviderError::from_status(status.as_u16(), error_text, retry_after));
        }

        let body = response
            .text()
            .await
            .map_err(Self::classify_transport_error)?;

        Self::extract_text(&body)
    }

    fn model(&self) -> String {
        self.model.clone()
    }
}
