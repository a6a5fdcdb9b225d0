use std::error::Error;
use std::fmt;
use std::time::Duration;

/// Failure reported by a model provider for a single attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiProviderError {
    ApiError(String),
    NetworkError(String),
    Timeout(String),
    ServerError { status: u16, message: String },
    RateLimited { retry_after: Option<Duration>, message: String },
    InvalidRequest(String),
    SerializationError(String),
    AuthenticationError(String),
}

impl AiProviderError {
    /// Whether a fresh attempt may succeed where this one failed.
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::NetworkError(_) | Self::Timeout(_) | Self::ServerError { .. } | Self::RateLimited { .. }
        )
    }

    /// Server-provided wait hint, only set for rate limiting.
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Classify a non-success HTTP status returned by the provider.
    pub fn from_status(status: u16, body: String, retry_after: Option<Duration>) -> Self {
        match status {
            401 | 403 => Self::AuthenticationError(body),
            429 => Self::RateLimited { retry_after, message: body },
            408 | 500..=599 => Self::ServerError { status, message: body },
            400..=499 => Self::InvalidRequest(format!("HTTP {status}: {body}")),
            _ => Self::ApiError(format!("HTTP {status}: {body}")),
        }
    }
}

impl fmt::Display for AiProviderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ApiError(msg) => write!(f, "API Error: {}", msg),
            Self::NetworkError(msg) => write!(f, "Network Error: {}", msg),
            Self::Timeout(msg) => write!(f, "Timeout: {}", msg),
            Self::ServerError { status, message } => write!(f, "Server Error (HTTP {}): {}", status, message),
            Self::RateLimited { retry_after: Some(wait), message } => {
                write!(f, "Rate limit exceeded (retry after {}s): {}", wait.as_secs(), message)
            }
            Self::RateLimited { retry_after: None, message } => write!(f, "Rate limit exceeded: {}", message),
            Self::InvalidRequest(msg) => write!(f, "Invalid Request: {}", msg),
            Self::SerializationError(msg) => write!(f, "Serialization Error: {}", msg),
            Self::AuthenticationError(msg) => write!(f, "Authentication Error: {}", msg),
        }
    }
}

impl Error for AiProviderError {}
