use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use crate::config::config_manager::ConfigManager;
use crate::enums::commands::Commands;
use crate::errors::{CopilotError, CopilotResult};
use crate::server::scan_server::ScanServer;
use crate::services::ai_providers::gemini::GeminiProvider;
use crate::services::analysis_orchestrator::AnalysisOrchestrator;
use crate::services::rate_limiter::ApiRateLimiter;
use crate::structs::analysis_result::AnalysisResult;
use crate::structs::config::config::Config;
use crate::structs::issue_report::IssueReport;
use crate::structs::scan_response::ScanResponse;

pub struct CommandRunner {
    config_path: Option<PathBuf>,
    start_time: Option<Instant>,
}

impl CommandRunner {
    pub const fn new(config_path: Option<PathBuf>) -> Self {
        Self {
            config_path,
            start_time: None,
        }
    }

    pub async fn run_command(&mut self, command: Commands) -> CopilotResult<()> {
        self.start_time = Some(Instant::now());

        let result = match command {
            Commands::Serve { host, port } => self.serve_command(host, port).await,
            Commands::Analyze { issue, json } => self.analyze_command(issue, json).await,
            Commands::Init => self.init_command(),
            Commands::Validate => self.validate_command(),
        };

        if let Some(start) = self.start_time {
            let duration = start.elapsed();
            log::info!("⏱️  Command completed in {:.2}s", duration.as_secs_f64());
        }

        result
    }

    async fn serve_command(&self, host: Option<String>, port: Option<u16>) -> CopilotResult<()> {
        let mut config = self.load_config()?;
        if let Some(host) = host {
            config.server.host = host;
        }
        if let Some(port) = port {
            config.server.port = port;
        }
        Self::ensure_valid(&config)?;

        let orchestrator = Arc::new(Self::build_orchestrator(&config)?);
        let mut server = ScanServer::new(orchestrator, config.server.clone());
        let addr = server.start().await?;

        log::info!("🌐 Try: curl -X POST http://{}/api/scan -H 'content-type: application/json' -d '{{\"issue\":\"...\"}}'", addr);
        log::info!("⏹️ Press Ctrl+C to stop the server");

        tokio::signal::ctrl_c()
            .await
            .map_err(|e| CopilotError::system_error("wait for shutdown signal", &e.to_string()))?;

        server.shutdown().await
    }

    async fn analyze_command(&self, issue: String, json: bool) -> CopilotResult<()> {
        let config = self.load_config()?;
        Self::ensure_valid(&config)?;

        let orchestrator = Self::build_orchestrator(&config)?;
        let report = IssueReport::new(issue);

        log::info!("🔍 Analyzing issue with {}...", orchestrator.model());
        let result = orchestrator.analyze(&report).await?;

        if json {
            let response = ScanResponse::new(report.description().to_string(), result, uuid::Uuid::new_v4().to_string());
            println!("{}", serde_json::to_string_pretty(&response)?);
        } else {
            Self::print_result(&result);
        }

        Ok(())
    }

    fn print_result(result: &AnalysisResult) {
        match result.sections() {
            Some(sections) => {
                println!("\n⚠️  Risk Explanation\n{}\n", sections.risk_explanation);
                println!("🎯 Attack Scenario\n{}\n", sections.attack_scenario);
                println!("🛡️  Secure Fix\n{}\n", sections.secure_fix);
            }
            None => println!("\n{}\n", result.raw_text),
        }
        println!("{}", "=".repeat(60));
        println!("🤖 {} · {} attempt(s)", result.model, result.attempts);
    }

    fn init_command(&self) -> CopilotResult<()> {
        log::info!("🚀 Initializing securescan configuration...");

        let path = match &self.config_path {
            Some(path) => path.clone(),
            None => ConfigManager::default_config_path().ok_or_else(|| {
                CopilotError::config_error(
                    "cannot determine the home directory",
                    None,
                    Some("Pass --config <path> to choose where to write the file"),
                )
            })?,
        };

        if let Err(e) = ConfigManager::create_sample_config(&path) {
            log::error!("❌ Failed to create configuration: {}", e);
            return Err(e);
        }

        log::info!("📝 Set your API key with: export {}=<your key>", Config::default().ai.api_key_env);
        log::info!("🔧 Run 'securescan validate' to check your configuration.");
        Ok(())
    }

    fn validate_command(&self) -> CopilotResult<()> {
        log::info!("🔍 Validating securescan configuration...");

        let config = match self.load_config() {
            Ok(config) => {
                log::info!("✅ Configuration loaded successfully");
                config
            }
            Err(e) => {
                log::error!("❌ Failed to load configuration: {}", e);
                log::error!("💡 Run 'securescan init' to create a configuration file.");
                return Err(e);
            }
        };

        let mut errors = Self::config_errors(&config);
        if let Err(e) = ConfigManager::resolve_api_key(&config.ai) {
            errors.push(e);
        }

        if errors.is_empty() {
            log::info!("✅ Configuration is valid");
            log::info!("🤖 Model: {} ({}ms timeout, {} attempt(s))", config.ai.model, config.ai.timeout_ms, config.ai.max_retries);
            log::info!("🌐 Server: {}:{}", config.server.host, config.server.port);
            return Ok(());
        }

        Err(CopilotError::MultipleErrors {
            errors,
            context: "configuration validation".to_string(),
        })
    }

    fn load_config(&self) -> CopilotResult<Config> {
        ConfigManager::load(self.config_path.as_deref())
    }

    fn config_errors(config: &Config) -> Vec<CopilotError> {
        ConfigManager::validate_config(config)
            .err()
            .unwrap_or_default()
            .into_iter()
            .map(|message| CopilotError::config_error(&message, None, None))
            .collect()
    }

    fn ensure_valid(config: &Config) -> CopilotResult<()> {
        let errors = Self::config_errors(config);
        if errors.is_empty() {
            return Ok(());
        }
        Err(CopilotError::MultipleErrors {
            errors,
            context: "configuration validation".to_string(),
        })
    }

    fn build_orchestrator(config: &Config) -> CopilotResult<AnalysisOrchestrator> {
        let api_key = ConfigManager::resolve_api_key(&config.ai)?;
        let rate_limiter = Arc::new(ApiRateLimiter::new(
            config.ai.rate_limit_per_minute,
            config.ai.rate_limit_burst,
        ));
        let provider = GeminiProvider::new(api_key, &config.ai, rate_limiter)?;

        Ok(AnalysisOrchestrator::new(Arc::new(provider), &config.ai, &config.retry))
    }
}
