pub mod ai;
pub mod analysis_result;
pub mod analysis_sections;
pub mod cli;
pub mod config;
pub mod error_response;
pub mod issue_report;
pub mod scan_request;
pub mod scan_response;
