use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use uuid::Uuid;
use crate::config::constants::duration_millis;
use crate::enums::ai_provider_error::AiProviderError;
use crate::enums::analysis_error::AnalysisError;
use crate::enums::analysis_phase::AnalysisPhase;
use crate::prompts::security_issue_prompt::build_security_prompt;
use crate::services::analysis_parser::AnalysisParser;
use crate::services::retry_policy::{RetryDecision, RetryPolicy};
use crate::structs::analysis_result::AnalysisResult;
use crate::structs::config::ai_config::AiConfig;
use crate::structs::config::retry_config::RetryConfig;
use crate::structs::issue_report::IssueReport;
use crate::traits::ai_provider::AiProvider;

/// Turns an issue report into a model analysis.
///
/// Holds no mutable state: every call validates, builds its prompt, calls the
/// provider with a per-attempt timeout and bounded retries, then parses the
/// answer. Clones share the provider and can be used from any number of tasks.
#[derive(Clone)]
pub struct AnalysisOrchestrator {
    provider: Arc<dyn AiProvider>,
    retry_policy: RetryPolicy,
    attempt_timeout: Duration,
    max_issue_chars: usize,
}

impl AnalysisOrchestrator {
    pub fn new(provider: Arc<dyn AiProvider>, ai_config: &AiConfig, retry_config: &RetryConfig) -> Self {
        Self {
            provider,
            retry_policy: RetryPolicy::new(ai_config.max_retries, retry_config),
            attempt_timeout: duration_millis(ai_config.timeout_ms),
            max_issue_chars: ai_config.max_issue_chars,
        }
    }

    pub fn model(&self) -> String {
        self.provider.model()
    }

    pub async fn analyze(&self, issue: &IssueReport) -> Result<AnalysisResult, AnalysisError> {
        self.analyze_with_request_id(issue, &Uuid::new_v4().to_string()).await
    }

    /// Like [`analyze`](Self::analyze), tagging every log line with `request_id`.
    pub async fn analyze_with_request_id(&self, issue: &IssueReport, request_id: &str) -> Result<AnalysisResult, AnalysisError> {
        let mut phase = AnalysisPhase::Pending;
        Self::transition(request_id, &mut phase, AnalysisPhase::Validating);

        if let Err(error) = self.validate(issue) {
            Self::transition(request_id, &mut phase, AnalysisPhase::Invalid);
            log::warn!("🚫 [{}] Rejected issue report: {}", request_id, error);
            return Err(error);
        }

        let prompt = build_security_prompt(issue.description());
        let mut attempt = 0;

        loop {
            attempt += 1;
            Self::transition(request_id, &mut phase, AnalysisPhase::Calling);

            let error = match self.call_provider(&prompt).await {
                Ok(text) => return self.finish(request_id, &mut phase, &text, attempt),
                Err(error) => error,
            };

            match self.retry_policy.decide(attempt, error.is_transient(), error.retry_after()) {
                RetryDecision::RetryAfter(delay) => {
                    log::warn!(
                        "🔄 [{}] Attempt {}/{} failed: {}. Retrying in {}ms",
                        request_id, attempt, self.retry_policy.max_attempts(), error, delay.as_millis()
                    );
                    Self::transition(request_id, &mut phase, AnalysisPhase::Retrying);
                    sleep(delay).await;
                }
                RetryDecision::GiveUp => {
                    Self::transition(request_id, &mut phase, AnalysisPhase::Failed);
                    log::error!("❌ [{}] Analysis failed after {} attempt(s): {}", request_id, attempt, error);
                    return Err(error.into());
                }
            }
        }
    }

    /// Race the analysis against `cancelled`. If the caller gives up first the
    /// in-flight attempt is dropped and a `Timeout` is returned.
    pub async fn analyze_with_cancellation<F>(&self, issue: &IssueReport, cancelled: F) -> Result<AnalysisResult, AnalysisError>
    where
        F: Future<Output = ()>,
    {
        let request_id = Uuid::new_v4().to_string();
        tokio::select! {
            result = self.analyze_with_request_id(issue, &request_id) => result,
            () = cancelled => {
                log::warn!("🛑 [{}] Analysis cancelled by caller", request_id);
                Err(AnalysisError::timeout("cancelled by caller"))
            }
        }
    }

    fn validate(&self, issue: &IssueReport) -> Result<(), AnalysisError> {
        let description = issue.description();
        if description.trim().is_empty() {
            return Err(AnalysisError::invalid_input("issue description must not be empty"));
        }

        let length = description.chars().count();
        if length > self.max_issue_chars {
            return Err(AnalysisError::invalid_input(format!(
                "issue description is {} characters, the limit is {}",
                length, self.max_issue_chars
            )));
        }
        Ok(())
    }

    /// Only the outbound call is timed; waiting on the throttle is not an attempt.
    async fn call_provider(&self, prompt: &str) -> Result<String, AiProviderError> {
        self.provider.wait_for_capacity().await;
        timeout(self.attempt_timeout, self.provider.generate(prompt))
            .await
            .unwrap_or_else(|_| {
                Err(AiProviderError::Timeout(format!(
                    "no response within {}ms",
                    self.attempt_timeout.as_millis()
                )))
            })
    }

    fn finish(&self, request_id: &str, phase: &mut AnalysisPhase, text: &str, attempts: u32) -> Result<AnalysisResult, AnalysisError> {
        if text.trim().is_empty() {
            Self::transition(request_id, phase, AnalysisPhase::Failed);
            log::error!("❌ [{}] Model returned an empty answer", request_id);
            return Err(AnalysisError::invalid_response("model returned empty text"));
        }

        Self::transition(request_id, phase, AnalysisPhase::Success);
        let model = self.provider.model();
        let result = match AnalysisParser::new(text).parse() {
            Some(sections) => AnalysisResult::structured(sections, text.to_string(), attempts, model),
            None => {
                log::info!("📝 [{}] Answer has no recognizable sections, returning raw text", request_id);
                AnalysisResult::unstructured(text.to_string(), attempts, model)
            }
        };

        log::info!("✅ [{}] Analysis complete in {} attempt(s)", request_id, attempts);
        Ok(result)
    }

    fn transition(request_id: &str, phase: &mut AnalysisPhase, next: AnalysisPhase) {
        log::debug!("🔀 [{}] {} -> {}", request_id, phase, next);
        *phase = next;
    }
}
