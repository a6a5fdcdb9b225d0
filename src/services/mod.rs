pub mod ai_providers;
pub mod analysis_orchestrator;
pub mod analysis_parser;
pub mod rate_limiter;
pub mod retry_policy;
