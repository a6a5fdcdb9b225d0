use std::fmt;

/// Lifecycle of a single `analyze` call.
///
/// `Pending -> Validating -> Invalid`, or
/// `Pending -> Validating -> Calling -> {Success, Retrying -> Calling, Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPhase {
    Pending,
    Validating,
    Invalid,
    Calling,
    Retrying,
    Success,
    Failed,
}

impl fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Validating => "validating",
            Self::Invalid => "invalid",
            Self::Calling => "calling",
            Self::Retrying => "retrying",
            Self::Success => "success",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}
