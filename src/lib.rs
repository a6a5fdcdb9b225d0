//! Security copilot relay: takes a plain-text description of a security issue,
//! asks a hosted language model for a risk explanation, an attack scenario and
//! a secure fix, and serves the result over HTTP.

pub mod config;
pub mod enums;
pub mod errors;
pub mod helpers;
pub mod prompts;
pub mod server;
pub mod services;
pub mod structs;
pub mod traits;
pub mod workers;
