use serde::{Deserialize, Serialize};
use crate::structs::analysis_sections::AnalysisSections;

/// Outcome of a successful analysis. Section fields stay empty when the model
/// answer could not be split into sections; `raw_text` always holds the full answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub risk_explanation: String,
    pub attack_scenario: String,
    pub secure_fix: String,
    pub raw_text: String,
    pub structured: bool,
    pub attempts: u32,
    pub model: String,
}

impl AnalysisResult {
    pub fn structured(sections: AnalysisSections, raw_text: String, attempts: u32, model: String) -> Self {
        Self {
            risk_explanation: sections.risk_explanation,
            attack_scenario: sections.attack_scenario,
            secure_fix: sections.secure_fix,
            raw_text,
            structured: true,
            attempts,
            model,
        }
    }

    pub const fn unstructured(raw_text: String, attempts: u32, model: String) -> Self {
        Self {
            risk_explanation: String::new(),
            attack_scenario: String::new(),
            secure_fix: String::new(),
            raw_text,
            structured: false,
            attempts,
            model,
        }
    }

    pub fn sections(&self) -> Option<AnalysisSections> {
        self.structured.then(|| AnalysisSections {
            risk_explanation: self.risk_explanation.clone(),
            attack_scenario: self.attack_scenario.clone(),
            secure_fix: self.secure_fix.clone(),
        })
    }
}
