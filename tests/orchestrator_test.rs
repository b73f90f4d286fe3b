mod common;

use std::sync::Arc;

use cognalyze::complexity::analyze_heuristic;
use cognalyze::normalizer::{normalize, RawIssue, RawMetrics};
use cognalyze::remote::RemoteError;
use cognalyze::{ResultOrigin, Severity, ThresholdSet};
use common::{analyzer_with, remote_metrics, ScriptedBackend, CREDENTIAL, NESTED_JS};
use pretty_assertions::assert_eq;
use tokio::sync::Semaphore;

fn parse_error() -> RemoteError {
    RemoteError::from(serde_json::from_str::<serde_json::Value>("{").unwrap_err())
}

#[tokio::test]
async fn test_repeat_within_ttl_calls_remote_once() {
    let backend = Arc::new(ScriptedBackend::new());
    let (analyzer, clock) = analyzer_with(Arc::clone(&backend));
    let thresholds = ThresholdSet::default();

    let first = analyzer
        .analyze(NESTED_JS, "javascript", CREDENTIAL, &thresholds)
        .await;
    clock.advance_ms(29_999);
    let second = analyzer
        .analyze(NESTED_JS, "javascript", CREDENTIAL, &thresholds)
        .await;

    assert_eq!(backend.calls(), 1);
    assert_eq!(first.origin, ResultOrigin::Remote);
    assert_eq!(second.origin, ResultOrigin::Cache);
    assert_eq!(first.result, second.result);
}

#[tokio::test]
async fn test_expired_entry_is_reanalyzed() {
    let backend = Arc::new(ScriptedBackend::new());
    let (analyzer, clock) = analyzer_with(Arc::clone(&backend));
    let thresholds = ThresholdSet::default();

    analyzer
        .analyze(NESTED_JS, "javascript", CREDENTIAL, &thresholds)
        .await;
    clock.advance_ms(30_000);
    let again = analyzer
        .analyze(NESTED_JS, "javascript", CREDENTIAL, &thresholds)
        .await;

    assert_eq!(backend.calls(), 2);
    assert_eq!(again.origin, ResultOrigin::Remote);
    assert_eq!(analyzer.cache().stats().stale_reads, 1);
}

#[tokio::test]
async fn test_remote_reply_is_normalized() {
    let reply = RawMetrics {
        overall_score: Some(150.0),
        maintainability_index: Some(-5.0),
        issues: vec![
            RawIssue {
                line: Some(0.0),
                ..Default::default()
            },
            RawIssue {
                line: Some(99.0),
                ..Default::default()
            },
            RawIssue {
                line: Some(2.0),
                severity: Some("urgent".into()),
                kind: Some("style".into()),
                message: None,
            },
        ],
        ..Default::default()
    };
    let backend = Arc::new(ScriptedBackend::with_replies([Ok(reply)]));
    let (analyzer, _clock) = analyzer_with(backend);

    let report = analyzer
        .analyze(NESTED_JS, "javascript", CREDENTIAL, &ThresholdSet::default())
        .await;

    assert_eq!(report.result.overall_score, 100);
    assert_eq!(report.result.maintainability_index, 0);
    assert_eq!(report.result.lines_of_code, 8);
    assert_eq!(report.result.issues.len(), 1);
    assert_eq!(report.result.issues[0].severity, Severity::Medium);
    assert_eq!(report.severity, Severity::High);
}

#[tokio::test]
async fn test_every_remote_failure_falls_back_to_heuristic() {
    let expected = normalize(&RawMetrics::from(&analyze_heuristic(NESTED_JS)), NESTED_JS);

    let failures: Vec<(Option<&str>, Option<RemoteError>)> = vec![
        (None, None),
        (CREDENTIAL, Some(RemoteError::Transport("HTTP 503".into()))),
        (CREDENTIAL, Some(RemoteError::Extraction("no object".into()))),
        (CREDENTIAL, Some(parse_error())),
    ];

    for (credential, failure) in failures {
        let backend = Arc::new(ScriptedBackend::with_replies(failure.map(Err)));
        let (analyzer, _clock) = analyzer_with(Arc::clone(&backend));

        let report = analyzer
            .analyze(NESTED_JS, "javascript", credential, &ThresholdSet::default())
            .await;

        assert_eq!(backend.calls(), 1);
        assert_eq!(report.origin, ResultOrigin::Fallback);
        assert_eq!(*report.result, expected);
        assert!(report.result.issues.is_empty());
        assert_eq!(report.result.recommendations.len(), 3);
    }
}

#[tokio::test]
async fn test_fallback_result_is_cached() {
    let backend = Arc::new(ScriptedBackend::with_replies([Err(RemoteError::Transport(
        "connection refused".into(),
    ))]));
    let (analyzer, _clock) = analyzer_with(Arc::clone(&backend));
    let thresholds = ThresholdSet::default();

    let first = analyzer.analyze("x", "python", CREDENTIAL, &thresholds).await;
    let second = analyzer.analyze("x", "python", CREDENTIAL, &thresholds).await;

    assert_eq!(first.origin, ResultOrigin::Fallback);
    assert_eq!(second.origin, ResultOrigin::Cache);
    assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn test_concurrent_requests_share_one_remote_call() {
    let gate = Arc::new(Semaphore::new(0));
    let backend = Arc::new(ScriptedBackend::gated(Arc::clone(&gate)));
    let (analyzer, _clock) = analyzer_with(Arc::clone(&backend));

    let tasks: Vec<_> = (0..5)
        .map(|_| {
            let analyzer = Arc::clone(&analyzer);
            tokio::spawn(async move {
                analyzer
                    .analyze(NESTED_JS, "javascript", CREDENTIAL, &ThresholdSet::default())
                    .await
            })
        })
        .collect();

    common::wait_until(|| backend.calls() == 1).await;
    common::settle().await;
    gate.add_permits(1);

    let mut reports = Vec::new();
    for task in tasks {
        reports.push(task.await.unwrap());
    }

    assert_eq!(backend.calls(), 1);
    let expected = normalize(&remote_metrics(), NESTED_JS);
    for report in &reports {
        assert_eq!(*report.result, expected);
    }
}

#[tokio::test]
async fn test_distinct_sources_are_analyzed_separately() {
    let backend = Arc::new(ScriptedBackend::new());
    let (analyzer, _clock) = analyzer_with(Arc::clone(&backend));
    let thresholds = ThresholdSet::default();

    let a = analyzer.analyze("a = 1", "python", CREDENTIAL, &thresholds).await;
    let b = analyzer.analyze("b = 2", "python", CREDENTIAL, &thresholds).await;

    assert_ne!(a.key, b.key);
    assert_eq!(backend.calls(), 2);
}

#[tokio::test]
async fn test_clear_forces_reanalysis() {
    let backend = Arc::new(ScriptedBackend::new());
    let (analyzer, _clock) = analyzer_with(Arc::clone(&backend));
    let thresholds = ThresholdSet::default();

    analyzer.analyze("x", "c", CREDENTIAL, &thresholds).await;
    analyzer.cache().clear();
    let again = analyzer.analyze("x", "c", CREDENTIAL, &thresholds).await;

    assert_eq!(again.origin, ResultOrigin::Remote);
    assert_eq!(backend.calls(), 2);
}
