use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use securescan::enums::ai_provider_error::AiProviderError;
use securescan::services::analysis_orchestrator::AnalysisOrchestrator;
use securescan::structs::config::ai_config::AiConfig;
use securescan::structs::config::retry_config::RetryConfig;
use securescan::traits::ai_provider::AiProvider;

pub const TEST_MODEL: &str = "gemini-scripted";

/// Answer in the three-section shape the prompt asks for.
pub fn canonical_answer(tag: &str) -> String {
    format!(
        "Risk Explanation:\nRisk for {tag}.\n\nAttack Scenario:\nAttack on {tag}.\n\nSecure Fix:\nFix for {tag}."
    )
}

/// Pull the issue description back out of a built prompt.
pub fn issue_from_prompt(prompt: &str) -> String {
    prompt
        .split("Analyze this security issue:\n")
        .nth(1)
        .and_then(|rest| rest.split("\n\nAnswer with").next())
        .unwrap_or_default()
        .to_string()
}

pub fn orchestrator_with(provider: Arc<dyn AiProvider>, max_retries: u32, timeout_ms: u64) -> AnalysisOrchestrator {
    let ai = AiConfig {
        max_retries,
        timeout_ms,
        ..AiConfig::default()
    };
    let retry = RetryConfig {
        base_backoff_ms: 1,
        max_backoff_ms: 4,
        max_retry_after_ms: 100,
    };
    AnalysisOrchestrator::new(provider, &ai, &retry)
}

/// Fails with `error` for the first `failures` calls, then answers.
pub struct FlakyProvider {
    failures: u32,
    error: AiProviderError,
    calls: AtomicU32,
}

impl FlakyProvider {
    pub fn new(failures: u32, error: AiProviderError) -> Self {
        Self {
            failures,
            error,
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AiProvider for FlakyProvider {
    async fn generate(&self, prompt: &str) -> Result<String, AiProviderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.failures {
            return Err(self.error.clone());
        }
        Ok(canonical_answer(&issue_from_prompt(prompt)))
    }

    fn model(&self) -> String {
        TEST_MODEL.to_string()
    }
}

/// Echoes the issue into each section after a short, varying delay.
pub struct EchoProvider {
    calls: AtomicU32,
}

impl EchoProvider {
    pub fn new() -> Self {
        Self { calls: AtomicU32::new(0) }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AiProvider for EchoProvider {
    async fn generate(&self, prompt: &str) -> Result<String, AiProviderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(u64::from(call % 5))).await;
        Ok(canonical_answer(&issue_from_prompt(prompt)))
    }

    fn model(&self) -> String {
        TEST_MODEL.to_string()
    }
}

/// Never answers within any reasonable attempt timeout.
pub struct SlowProvider {
    delay: Duration,
    calls: AtomicU32,
}

impl SlowProvider {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AiProvider for SlowProvider {
    async fn generate(&self, _prompt: &str) -> Result<String, AiProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(canonical_answer("late"))
    }

    fn model(&self) -> String {
        TEST_MODEL.to_string()
    }
}

/// Returns the same fixed text for every prompt.
pub struct FixedProvider {
    answer: String,
}

impl FixedProvider {
    pub fn new(answer: impl Into<String>) -> Self {
        Self { answer: answer.into() }
    }
}

#[async_trait]
impl AiProvider for FixedProvider {
    async fn generate(&self, _prompt: &str) -> Result<String, AiProviderError> {
        Ok(self.answer.clone())
    }

    fn model(&self) -> String {
        TEST_MODEL.to_string()
    }
}

/// Holds every request on a local throttle for `wait`, then answers at once.
pub struct ThrottledProvider {
    wait: Duration,
    calls: AtomicU32,
}

impl ThrottledProvider {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AiProvider for ThrottledProvider {
    async fn wait_for_capacity(&self) {
        tokio::time::sleep(self.wait).await;
    }

    async fn generate(&self, prompt: &str) -> Result<String, AiProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(canonical_answer(&issue_from_prompt(prompt)))
    }

    fn model(&self) -> String {
        TEST_MODEL.to_string()
    }
}
