use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::structs::analysis_result::AnalysisResult;
use crate::structs::analysis_sections::AnalysisSections;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResponse {
    pub issue: String,
    pub ai_analysis: String,
    pub structured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<AnalysisSections>,
    pub model: String,
    pub attempts: u32,
    pub request_id: String,
    pub analyzed_at: DateTime<Utc>,
}

impl ScanResponse {
    pub fn new(issue: String, result: AnalysisResult, request_id: String) -> Self {
        Self {
            issue,
            sections: result.sections(),
            ai_analysis: result.raw_text,
            structured: result.structured,
            model: result.model,
            attempts: result.attempts,
            request_id,
            analyzed_at: Utc::now(),
        }
    }
}
