use serde::{Deserialize, Serialize};
use crate::enums::analysis_error::AnalysisError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

/// `{ "error": { "kind": ..., "message": ... } }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

impl ErrorResponse {
    pub fn new(kind: &str, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                kind: kind.to_string(),
                message: message.into(),
            },
        }
    }
}

impl From<&AnalysisError> for ErrorResponse {
    fn from(error: &AnalysisError) -> Self {
        Self::new(error.kind(), error.to_string())
    }
}
