use thiserror::Error;
use crate::enums::ai_provider_error::AiProviderError;

/// Typed failure returned at the orchestrator boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Upstream request timed out{}", detail(.0))]
    Timeout(Option<String>),

    #[error("Upstream rate limit exceeded{}", detail(.0))]
    RateLimited(Option<String>),

    #[error("Upstream model unavailable{}", detail(.0))]
    UpstreamUnavailable(Option<String>),

    #[error("Model returned an unusable response{}", detail(.0))]
    InvalidResponse(Option<String>),

    #[error("Invalid issue report{}", detail(.0))]
    InvalidInput(Option<String>),
}

fn detail(message: &Option<String>) -> String {
    message.as_ref().map(|m| format!(": {m}")).unwrap_or_default()
}

impl AnalysisError {
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout(Some(message.into()))
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(Some(message.into()))
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(Some(message.into()))
    }

    /// Stable machine-readable identifier used in API error bodies.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "timeout",
            Self::RateLimited(_) => "rate_limited",
            Self::UpstreamUnavailable(_) => "upstream_unavailable",
            Self::InvalidResponse(_) => "invalid_response",
            Self::InvalidInput(_) => "invalid_input",
        }
    }

    pub const fn message(&self) -> Option<&String> {
        match self {
            Self::Timeout(m)
            | Self::RateLimited(m)
            | Self::UpstreamUnavailable(m)
            | Self::InvalidResponse(m)
            | Self::InvalidInput(m) => m.as_ref(),
        }
    }

    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::RateLimited(_) | Self::UpstreamUnavailable(_))
    }
}

impl From<AiProviderError> for AnalysisError {
    fn from(error: AiProviderError) -> Self {
        let message = Some(error.to_string());
        match error {
            AiProviderError::Timeout(_) => Self::Timeout(message),
            AiProviderError::RateLimited { .. } => Self::RateLimited(message),
            AiProviderError::SerializationError(_) => Self::InvalidResponse(message),
            AiProviderError::NetworkError(_)
            | AiProviderError::ServerError { .. }
            | AiProviderError::AuthenticationError(_)
            | AiProviderError::InvalidRequest(_)
            | AiProviderError::ApiError(_) => Self::UpstreamUnavailable(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_are_stable() {
        assert_eq!(AnalysisError::Timeout(None).kind(), "timeout");
        assert_eq!(AnalysisError::RateLimited(None).kind(), "rate_limited");
        assert_eq!(AnalysisError::UpstreamUnavailable(None).kind(), "upstream_unavailable");
        assert_eq!(AnalysisError::InvalidResponse(None).kind(), "invalid_response");
        assert_eq!(AnalysisError::InvalidInput(None).kind(), "invalid_input");
    }

    #[test]
    fn test_display_includes_optional_detail() {
        assert_eq!(AnalysisError::Timeout(None).to_string(), "Upstream request timed out");
        assert_eq!(
            AnalysisError::invalid_input("description is empty").to_string(),
            "Invalid issue report: description is empty"
        );
    }

    #[test]
    fn test_provider_error_mapping() {
        let auth: AnalysisError = AiProviderError::AuthenticationError("bad key".into()).into();
        assert_eq!(auth.kind(), "upstream_unavailable");

        let slow: AnalysisError = AiProviderError::Timeout("deadline".into()).into();
        assert_eq!(slow.kind(), "timeout");

        let limited: AnalysisError = AiProviderError::RateLimited { retry_after: None, message: "quota".into() }.into();
        assert_eq!(limited.kind(), "rate_limited");

        let garbage: AnalysisError = AiProviderError::SerializationError("no candidates".into()).into();
        assert_eq!(garbage.kind(), "invalid_response");
        assert!(garbage.message().is_some_and(|m| m.contains("no candidates")));
    }
}
