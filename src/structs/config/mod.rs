pub mod ai_config;
pub mod config;
pub mod retry_config;
pub mod server_config;
