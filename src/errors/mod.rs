use std::fmt;
use std::error::Error as StdError;
use crate::enums::analysis_error::AnalysisError;

/// Application-level errors raised outside the analysis boundary:
/// configuration, bootstrap and I/O.
#[derive(Debug, Clone)]
pub enum CopilotError {
    // Configuration errors
    ConfigurationError {
        message: String,
        field: Option<String>,
        suggestion: Option<String>,
    },
    ConfigurationFileError {
        path: String,
        reason: String,
    },

    // Network/API errors
    NetworkError {
        operation: String,
        url: Option<String>,
        status_code: Option<u16>,
        reason: String,
    },

    // Analysis failures surfaced through the CLI
    AnalysisFailed {
        kind: String,
        reason: String,
        recoverable: bool,
    },

    // System errors
    SystemError {
        operation: String,
        reason: String,
    },

    // Multiple errors (for configuration validation)
    MultipleErrors {
        errors: Vec<CopilotError>,
        context: String,
    },
}

impl CopilotError {
    pub fn config_error(message: &str, field: Option<&str>, suggestion: Option<&str>) -> Self {
        Self::ConfigurationError {
            message: message.to_string(),
            field: field.map(ToString::to_string),
            suggestion: suggestion.map(ToString::to_string),
        }
    }

    pub fn config_file_error(path: &str, reason: &str) -> Self {
        Self::ConfigurationFileError {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn system_error(operation: &str, reason: &str) -> Self {
        Self::SystemError {
            operation: operation.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::NetworkError { .. } | Self::ConfigurationError { .. } => true,
            Self::AnalysisFailed { recoverable, .. } => *recoverable,
            Self::MultipleErrors { errors, .. } => errors.iter().any(Self::is_recoverable),
            Self::ConfigurationFileError { .. } | Self::SystemError { .. } => false,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SystemError { .. } => ErrorSeverity::Critical,
            Self::ConfigurationFileError { .. } | Self::AnalysisFailed { .. } => ErrorSeverity::High,
            Self::NetworkError { .. } => ErrorSeverity::Medium,
            Self::ConfigurationError { .. } => ErrorSeverity::Low,
            Self::MultipleErrors { errors, .. } => {
                errors.iter()
                    .map(Self::severity)
                    .max()
                    .unwrap_or(ErrorSeverity::Low)
            }
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::ConfigurationError { message, field, suggestion } => {
                let location = field.as_ref().map(|f| format!(" [{}]", f)).unwrap_or_default();
                let hint = suggestion.as_ref().map(|s| format!("\n💡 {}", s)).unwrap_or_default();
                format!("Invalid configuration{}: {}{}", location, message, hint)
            }
            Self::ConfigurationFileError { path, reason } => {
                format!("Cannot use config file {}: {}", path, reason)
            }
            Self::NetworkError { operation, status_code, reason, .. } => match status_code {
                Some(code) => format!("{} failed with HTTP {}: {}", operation, code, reason),
                None => format!("{} failed: {}", operation, reason),
            },
            Self::AnalysisFailed { kind, reason, recoverable } => {
                let retry = if *recoverable { " (temporary, try again)" } else { "" };
                format!("Analysis failed ({}){}: {}", kind, retry, reason)
            }
            Self::SystemError { operation, reason } => {
                format!("{} failed: {}", operation, reason)
            }
            Self::MultipleErrors { errors, context } => {
                let lines: Vec<String> = errors
                    .iter()
                    .map(|error| format!("  - {}", error.user_message().replace('\n', "\n    ")))
                    .collect();
                format!("{} found {} problem(s):\n{}", context, errors.len(), lines.join("\n"))
            }
        }
    }
}

impl fmt::Display for CopilotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl StdError for CopilotError {}

/// How loudly a failure is reported on the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Low => "🟢",
            Self::Medium => "🟡",
            Self::High => "🟠",
            Self::Critical => "🔴",
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        };
        f.write_str(label)
    }
}

/// Result type alias for application operations
pub type CopilotResult<T> = Result<T, CopilotError>;

/// Error handler for consistent error processing
pub struct ErrorHandler;

impl ErrorHandler {
    /// Debug form goes to the log, the readable message to stderr.
    pub fn handle_error(error: &CopilotError) {
        let severity = error.severity();
        log::error!("[{}] {:?}", severity, error);
        eprintln!("{} {}", severity.icon(), error.user_message());
    }
}

impl From<AnalysisError> for CopilotError {
    fn from(error: AnalysisError) -> Self {
        Self::AnalysisFailed {
            kind: error.kind().to_string(),
            reason: error.to_string(),
            recoverable: error.is_transient(),
        }
    }
}

impl From<std::io::Error> for CopilotError {
    fn from(error: std::io::Error) -> Self {
        Self::SystemError {
            operation: "I/O operation".to_string(),
            reason: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for CopilotError {
    fn from(error: serde_json::Error) -> Self {
        Self::SystemError {
            operation: "JSON serialization".to_string(),
            reason: error.to_string(),
        }
    }
}

impl From<toml::de::Error> for CopilotError {
    fn from(error: toml::de::Error) -> Self {
        Self::ConfigurationError {
            message: error.message().to_string(),
            field: None,
            suggestion: Some("Check the TOML syntax of the configuration file".to_string()),
        }
    }
}

impl From<reqwest::Error> for CopilotError {
    fn from(error: reqwest::Error) -> Self {
        Self::NetworkError {
            operation: "HTTP client setup".to_string(),
            url: error.url().map(ToString::to_string),
            status_code: error.status().map(|s| s.as_u16()),
            reason: error.to_string(),
        }
    }
}
