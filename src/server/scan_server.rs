use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use serde_json::json;
use tokio::sync::oneshot;
use uuid::Uuid;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};
use crate::config::constants::{
    duration_millis, CORS_MAX_AGE_SECS, MAX_REQUEST_BODY_BYTES, SAMPLE_ISSUE, SERVER_SHUTDOWN_GRACE_PERIOD_MS,
};
use crate::enums::analysis_error::AnalysisError;
use crate::errors::{CopilotError, CopilotResult};
use crate::services::analysis_orchestrator::AnalysisOrchestrator;
use crate::structs::config::server_config::ServerConfig;
use crate::structs::error_response::ErrorResponse;
use crate::structs::issue_report::IssueReport;
use crate::structs::scan_request::ScanRequest;
use crate::structs::scan_response::ScanResponse;

pub struct ScanServer {
    orchestrator: Arc<AnalysisOrchestrator>,
    config: ServerConfig,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ScanServer {
    pub const fn new(orchestrator: Arc<AnalysisOrchestrator>, config: ServerConfig) -> Self {
        Self {
            orchestrator,
            config,
            shutdown_tx: None,
        }
    }

    pub async fn start(&mut self) -> CopilotResult<SocketAddr> {
        let addr = tokio::net::lookup_host((self.config.host.as_str(), self.config.port))
            .await?
            .next()
            .ok_or_else(|| CopilotError::config_error(
                &format!("cannot resolve {}:{}", self.config.host, self.config.port),
                Some("server.host"),
                None,
            ))?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        self.shutdown_tx = Some(shutdown_tx);

        let (bound, server) = warp::serve(self.routes())
            .try_bind_with_graceful_shutdown(addr, async {
                shutdown_rx.await.ok();
            })
            .map_err(|e| CopilotError::system_error("bind scan server", &e.to_string()))?;

        tokio::spawn(server);

        log::info!("🚀 Scan API listening on http://{}", bound);
        log::info!("🤖 Model: {}", self.orchestrator.model());
        Ok(bound)
    }

    pub async fn shutdown(&mut self) -> CopilotResult<()> {
        log::info!("🛑 Shutting down scan server...");

        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            shutdown_tx.send(()).map_err(|()|
                CopilotError::system_error("shutdown", "Failed to send shutdown signal")
            )?;
        }

        tokio::time::sleep(duration_millis(SERVER_SHUTDOWN_GRACE_PERIOD_MS)).await;
        log::info!("✅ Scan server shutdown complete");

        Ok(())
    }

    pub fn routes(&self) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        let orchestrator = Arc::clone(&self.orchestrator);
        let orchestrator_filter = warp::any().map(move || Arc::clone(&orchestrator));

        let index = warp::path::end()
            .and(warp::get())
            .map(index_handler);

        let health = warp::path!("api" / "health")
            .and(warp::get())
            .and(orchestrator_filter.clone())
            .map(health_handler);

        let scan = warp::path!("api" / "scan")
            .and(warp::post())
            .and(warp::body::content_length_limit(MAX_REQUEST_BODY_BYTES))
            .and(warp::body::json())
            .and(orchestrator_filter.clone())
            .and_then(scan_handler);

        let legacy_scan = warp::path!("scan")
            .and(warp::post())
            .and(orchestrator_filter)
            .and_then(legacy_scan_handler);

        let cors = warp::cors()
            .allow_origins(self.config.allowed_origins.iter().map(String::as_str))
            .allow_headers(vec!["content-type"])
            .allow_methods(vec!["GET", "POST", "OPTIONS"])
            .max_age(std::time::Duration::from_secs(CORS_MAX_AGE_SECS));

        index
            .or(health)
            .or(scan)
            .or(legacy_scan)
            .recover(handle_rejection)
            .with(cors)
    }
}

/// HTTP status for each analysis failure kind.
pub const fn status_for(error: &AnalysisError) -> StatusCode {
    match error {
        AnalysisError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        AnalysisError::Timeout(_) | AnalysisError::RateLimited(_) => StatusCode::SERVICE_UNAVAILABLE,
        AnalysisError::UpstreamUnavailable(_) | AnalysisError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
    }
}

fn error_reply(status: StatusCode, body: &ErrorResponse) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(warp::reply::json(body), status)
}

fn index_handler() -> impl Reply {
    warp::reply::json(&json!({
        "message": "AI Security Copilot API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "scan": "POST /api/scan",
            "legacy_scan": "POST /scan",
            "health": "GET /api/health"
        }
    }))
}

fn health_handler(orchestrator: Arc<AnalysisOrchestrator>) -> impl Reply {
    warp::reply::json(&json!({
        "status": "ok",
        "model": orchestrator.model()
    }))
}

async fn scan_handler(
    body: ScanRequest,
    orchestrator: Arc<AnalysisOrchestrator>,
) -> Result<impl Reply, Infallible> {
    Ok(run_scan(body.issue, &orchestrator).await)
}

async fn legacy_scan_handler(orchestrator: Arc<AnalysisOrchestrator>) -> Result<impl Reply, Infallible> {
    Ok(run_scan(SAMPLE_ISSUE.to_string(), &orchestrator).await)
}

// Dropped with the connection if the client goes away, which aborts the model call.
async fn run_scan(issue: String, orchestrator: &AnalysisOrchestrator) -> warp::reply::WithStatus<warp::reply::Json> {
    let request_id = Uuid::new_v4().to_string();
    log::info!("🔍 [{}] Scan request received ({} chars)", request_id, issue.chars().count());

    let report = IssueReport::new(issue);
    match orchestrator.analyze_with_request_id(&report, &request_id).await {
        Ok(result) => {
            let response = ScanResponse::new(report.description().to_string(), result, request_id);
            warp::reply::with_status(warp::reply::json(&response), StatusCode::OK)
        }
        Err(error) => error_reply(status_for(&error), &ErrorResponse::from(&error)),
    }
}

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, kind, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "not_found", "route not found".to_string())
    } else if let Some(e) = err.find::<warp::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, "invalid_input", format!("invalid request body: {}", e))
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (
            StatusCode::PAYLOAD_TOO_LARGE,
            "invalid_input",
            format!("request body exceeds {} bytes", MAX_REQUEST_BODY_BYTES),
        )
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "invalid_input", "content-length header is required".to_string())
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (StatusCode::UNSUPPORTED_MEDIA_TYPE, "invalid_input", "request body must be JSON".to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed", "method not allowed".to_string())
    } else {
        log::error!("❌ Unhandled rejection: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, "internal", "internal server error".to_string())
    };

    Ok(error_reply(status, &ErrorResponse::new(kind, message)))
}
