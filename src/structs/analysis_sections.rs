use serde::{Deserialize, Serialize};

/// The three labeled parts of a structured model answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSections {
    pub risk_explanation: String,
    pub attack_scenario: String,
    pub secure_fix: String,
}
