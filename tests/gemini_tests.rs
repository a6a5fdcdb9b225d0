use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use serde_json::{json, Value};
use securescan::services::ai_providers::gemini::GeminiProvider;
use securescan::services::analysis_orchestrator::AnalysisOrchestrator;
use securescan::services::rate_limiter::ApiRateLimiter;
use securescan::structs::config::ai_config::AiConfig;
use securescan::structs::config::retry_config::RetryConfig;
use securescan::structs::issue_report::IssueReport;
use warp::http::StatusCode;
use warp::Filter;
use crate::support::canonical_answer;

/// Local stand-in for `generateContent` that answers every call with `status`.
fn spawn_gemini_stub(status: StatusCode) -> (SocketAddr, Arc<AtomicU32>) {
    let hits = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&hits);

    let route = warp::path!("models" / String)
        .and(warp::post())
        .and(warp::header::<String>("x-goog-api-key"))
        .and(warp::body::json())
        .map(move |_model: String, _key: String, _body: Value| {
            counter.fetch_add(1, Ordering::SeqCst);
            let body = json!({
                "candidates": [{ "content": { "role": "model", "parts": [{ "text": canonical_answer("stub") }] } }]
            });
            warp::reply::with_status(warp::reply::json(&body), status)
        });

    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    (addr, hits)
}

fn gemini_orchestrator(addr: SocketAddr, limiter: ApiRateLimiter, timeout_ms: u64) -> AnalysisOrchestrator {
    let ai = AiConfig {
        base_url: format!("http://{}", addr),
        model: "gemini-test".to_string(),
        timeout_ms,
        max_retries: 3,
        ..AiConfig::default()
    };
    let retry = RetryConfig {
        base_backoff_ms: 1,
        max_backoff_ms: 4,
        max_retry_after_ms: 100,
    };
    let provider = GeminiProvider::new("test-key".to_string(), &ai, Arc::new(limiter)).unwrap();
    AnalysisOrchestrator::new(Arc::new(provider), &ai, &retry)
}

#[tokio::test]
async fn test_structured_answer_from_gemini() {
    let (addr, hits) = spawn_gemini_stub(StatusCode::OK);
    let orchestrator = gemini_orchestrator(addr, ApiRateLimiter::new(600, 10), 2_000);

    let result = orchestrator.analyze(&IssueReport::new("leaked key")).await.unwrap();

    assert!(result.structured);
    assert_eq!(result.secure_fix, "Fix for stub.");
    assert_eq!(result.model, "gemini-test");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_queued_call_is_not_reported_as_timeout() {
    let (addr, hits) = spawn_gemini_stub(StatusCode::OK);
    // one request per second, far longer than the attempt timeout
    let orchestrator = gemini_orchestrator(addr, ApiRateLimiter::new(600, 1), 300);

    orchestrator.analyze(&IssueReport::new("first")).await.unwrap();

    let started = Instant::now();
    let second = orchestrator.analyze(&IssueReport::new("second")).await.unwrap();

    assert_eq!(second.attempts, 1);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert!(started.elapsed() >= Duration::from_millis(300));
}

#[tokio::test]
async fn test_rejected_key_is_a_single_call() {
    let (addr, hits) = spawn_gemini_stub(StatusCode::FORBIDDEN);
    let orchestrator = gemini_orchestrator(addr, ApiRateLimiter::new(600, 10), 2_000);

    let error = orchestrator.analyze(&IssueReport::new("leaked key")).await.unwrap_err();

    assert_eq!(error.kind(), "upstream_unavailable");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_server_errors_are_retried_until_budget_runs_out() {
    let (addr, hits) = spawn_gemini_stub(StatusCode::SERVICE_UNAVAILABLE);
    let orchestrator = gemini_orchestrator(addr, ApiRateLimiter::new(600, 10), 2_000);

    let error = orchestrator.analyze(&IssueReport::new("leaked key")).await.unwrap_err();

    assert_eq!(error.kind(), "upstream_unavailable");
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}
