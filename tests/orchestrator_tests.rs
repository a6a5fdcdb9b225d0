use std::sync::Arc;
use std::time::{Duration, Instant};
use futures::future::join_all;
use proptest::prelude::*;
use securescan::enums::ai_provider_error::AiProviderError;
use securescan::enums::analysis_error::AnalysisError;
use securescan::prompts::security_issue_prompt::build_security_prompt;
use securescan::structs::issue_report::IssueReport;
use tokio::sync::oneshot;
use crate::support::{
    canonical_answer, orchestrator_with, EchoProvider, FixedProvider, FlakyProvider, SlowProvider, ThrottledProvider,
    TEST_MODEL,
};

#[tokio::test]
async fn test_success_after_transient_failures() {
    let provider = Arc::new(FlakyProvider::new(2, AiProviderError::NetworkError("connection reset".to_string())));
    let orchestrator = orchestrator_with(provider.clone(), 3, 1_000);

    let result = orchestrator
        .analyze(&IssueReport::new("SQL injection in login form"))
        .await
        .unwrap();

    assert_eq!(provider.calls(), 3);
    assert_eq!(result.attempts, 3);
    assert!(result.structured);
    assert_eq!(result.risk_explanation, "Risk for SQL injection in login form.");
    assert_eq!(result.model, TEST_MODEL);
}

#[tokio::test]
async fn test_budget_exhausted_returns_last_error_kind() {
    let provider = Arc::new(FlakyProvider::new(
        u32::MAX,
        AiProviderError::ServerError { status: 503, message: "overloaded".to_string() },
    ));
    let orchestrator = orchestrator_with(provider.clone(), 4, 1_000);

    let error = orchestrator.analyze(&IssueReport::new("XSS in comments")).await.unwrap_err();

    assert_eq!(provider.calls(), 4);
    assert_eq!(error.kind(), "upstream_unavailable");
}

#[tokio::test]
async fn test_authentication_failure_is_not_retried() {
    let provider = Arc::new(FlakyProvider::new(
        u32::MAX,
        AiProviderError::AuthenticationError("API key not valid".to_string()),
    ));
    let orchestrator = orchestrator_with(provider.clone(), 3, 1_000);

    let error = orchestrator.analyze(&IssueReport::new("open redirect")).await.unwrap_err();

    assert_eq!(provider.calls(), 1);
    assert!(matches!(error, AnalysisError::UpstreamUnavailable(_)));
}

#[tokio::test]
async fn test_rate_limit_with_short_hint_is_retried() {
    let provider = Arc::new(FlakyProvider::new(
        1,
        AiProviderError::RateLimited { retry_after: Some(Duration::from_millis(20)), message: "slow down".to_string() },
    ));
    let orchestrator = orchestrator_with(provider.clone(), 3, 1_000);

    let started = Instant::now();
    let result = orchestrator.analyze(&IssueReport::new("weak hashing")).await.unwrap();

    assert_eq!(provider.calls(), 2);
    assert_eq!(result.attempts, 2);
    assert!(started.elapsed() >= Duration::from_millis(20));
}

#[tokio::test]
async fn test_every_attempt_times_out() {
    let provider = Arc::new(SlowProvider::new(Duration::from_secs(5)));
    let orchestrator = orchestrator_with(provider.clone(), 2, 30);

    let started = Instant::now();
    let error = orchestrator.analyze(&IssueReport::new("path traversal")).await.unwrap_err();

    assert_eq!(error.kind(), "timeout");
    assert_eq!(provider.calls(), 2);
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_throttle_wait_does_not_count_against_attempt_timeout() {
    let provider = Arc::new(ThrottledProvider::new(Duration::from_millis(150)));
    let orchestrator = orchestrator_with(provider.clone(), 3, 50);

    let result = orchestrator.analyze(&IssueReport::new("leaked key")).await.unwrap();

    assert_eq!(result.attempts, 1);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_cancellation_stops_in_flight_analysis() {
    let provider = Arc::new(SlowProvider::new(Duration::from_secs(5)));
    let orchestrator = orchestrator_with(provider.clone(), 3, 10_000);
    let (cancel_tx, cancel_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        let _ = cancel_tx.send(());
    });

    let started = Instant::now();
    let error = orchestrator
        .analyze_with_cancellation(&IssueReport::new("CSRF on settings page"), async {
            let _ = cancel_rx.await;
        })
        .await
        .unwrap_err();

    assert!(matches!(error, AnalysisError::Timeout(_)));
    assert_eq!(provider.calls(), 1);
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_concurrent_analyses_keep_their_own_results() {
    let provider = Arc::new(EchoProvider::new());
    let orchestrator = orchestrator_with(provider.clone(), 3, 1_000);

    let issues: Vec<String> = (0..50).map(|i| format!("issue number {}", i)).collect();
    let results = join_all(issues.iter().map(|issue| {
        let orchestrator = orchestrator.clone();
        let report = IssueReport::new(issue.clone());
        async move { orchestrator.analyze(&report).await }
    }))
    .await;

    assert_eq!(provider.calls(), 50);
    for (issue, result) in issues.iter().zip(results) {
        let result = result.unwrap();
        assert_eq!(result.raw_text, canonical_answer(issue));
        assert_eq!(result.secure_fix, format!("Fix for {}.", issue));
    }
}

#[tokio::test]
async fn test_concurrent_analyses_across_tasks() {
    let provider = Arc::new(EchoProvider::new());
    let orchestrator = orchestrator_with(provider, 3, 1_000);

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move {
                let issue = format!("task issue {}", i);
                let result = orchestrator.analyze(&IssueReport::new(issue.clone())).await;
                (issue, result)
            })
        })
        .collect();

    for handle in handles {
        let (issue, result) = handle.await.unwrap();
        assert_eq!(result.unwrap().attack_scenario, format!("Attack on {}.", issue));
    }
}

#[tokio::test]
async fn test_unstructured_answer_is_still_a_success() {
    let orchestrator = orchestrator_with(
        Arc::new(FixedProvider::new("Rotate the key and move it to a secret manager.")),
        3,
        1_000,
    );

    let result = orchestrator.analyze(&IssueReport::new("leaked key")).await.unwrap();

    assert!(!result.structured);
    assert!(result.sections().is_none());
    assert_eq!(result.raw_text, "Rotate the key and move it to a secret manager.");
}

#[tokio::test]
async fn test_whitespace_answer_is_invalid_response() {
    let orchestrator = orchestrator_with(Arc::new(FixedProvider::new(" \n ")), 3, 1_000);

    let error = orchestrator.analyze(&IssueReport::new("leaked key")).await.unwrap_err();
    assert_eq!(error.kind(), "invalid_response");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_prompt_is_deterministic_and_contains_issue(issue in "\\PC{1,200}") {
        let first = build_security_prompt(&issue);
        let second = build_security_prompt(&issue);
        prop_assert_eq!(&first, &second);
        prop_assert!(first.contains(&issue));
    }

    #[test]
    fn prop_non_blank_issue_succeeds_or_fails_with_declared_kind(issue in "[a-zA-Z0-9 .,:;'\"-]{1,300}") {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        let orchestrator = orchestrator_with(Arc::new(EchoProvider::new()), 2, 1_000);

        let outcome = runtime.block_on(orchestrator.analyze(&IssueReport::new(issue.clone())));
        match outcome {
            Ok(result) => prop_assert!(!result.raw_text.is_empty()),
            Err(error) => {
                prop_assert!(issue.trim().is_empty());
                prop_assert_eq!(error.kind(), "invalid_input");
            }
        }
    }
}
