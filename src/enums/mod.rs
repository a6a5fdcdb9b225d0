pub mod ai_provider_error;
pub mod analysis_error;
pub mod analysis_phase;
pub mod commands;
