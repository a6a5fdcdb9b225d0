use async_trait::async_trait;
use crate::enums::ai_provider_error::AiProviderError;

/// A hosted text-generation model.
///
/// One call to `generate` is one outbound attempt; retries, timeouts and
/// response validation belong to the caller. Callers await `wait_for_capacity`
/// before each attempt, outside any attempt timeout. Implementations must be
/// safe to share between concurrent tasks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AiProvider: Send + Sync {

    /// Resolves once a local throttle lets the next request through.
    async fn wait_for_capacity(&self) {}

    async fn generate(&self, prompt: &str) -> Result<String, AiProviderError>;

    fn model(&self) -> String;
}
