mod common;

use std::sync::Arc;
use std::time::Duration;

use cognalyze::clock::ManualClock;
use cognalyze::{
    AnalysisEvent, AnalysisService, ChannelEventSource, CognalyzeConfig, DocumentEvent,
    DocumentSnapshot, ResultOrigin,
};
use common::ScriptedBackend;
use pretty_assertions::assert_eq;
use tokio::sync::broadcast::{self, error::TryRecvError};

const DELAY_MS: u64 = 1_000;

fn service_with(config: CognalyzeConfig) -> (AnalysisService, Arc<ScriptedBackend>, ManualClock) {
    let backend = Arc::new(ScriptedBackend::new());
    let clock = ManualClock::new();
    let service = AnalysisService::new(config, backend.clone(), Arc::new(clock.clone()));
    service.set_credential(Some("test-key".to_string()));
    (service, backend, clock)
}

fn service() -> (AnalysisService, Arc<ScriptedBackend>, ManualClock) {
    service_with(CognalyzeConfig::default())
}

fn doc(key: &str, text: &str) -> DocumentSnapshot {
    DocumentSnapshot::new(key, "javascript", text)
}

async fn next_event(rx: &mut broadcast::Receiver<AnalysisEvent>) -> AnalysisEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for an analysis")
        .expect("result channel closed")
}

#[tokio::test]
async fn test_rapid_edits_produce_one_analysis_of_latest_text() {
    let (service, backend, clock) = service();
    let mut results = service.results();

    for text in ["let a", "let ab", "let abc = 1"] {
        assert!(service.notify_changed(doc("app.js", text)));
        clock.advance_ms(200);
        common::settle().await;
    }
    assert_eq!(service.pending_count(), 1);

    clock.advance_ms(DELAY_MS);
    let event = next_event(&mut results).await;
    common::settle().await;

    assert_eq!(event.document_key, "app.js");
    assert_eq!(event.report.origin, ResultOrigin::Remote);
    assert_eq!(
        event.report.key,
        cognalyze::cache_key("let abc = 1", "javascript")
    );
    assert_eq!(backend.calls(), 1);
    assert!(matches!(results.try_recv(), Err(TryRecvError::Empty)));
    assert_eq!(service.latest("app.js"), Some(event.report));
}

#[tokio::test]
async fn test_unsupported_language_is_dropped() {
    let (service, backend, _clock) = service();

    let rust = DocumentSnapshot::new("lib.rs", "rust", "fn main() {}");
    assert!(!service.notify_changed(rust.clone()));
    assert_eq!(service.pending_count(), 0);
    assert!(service.analyze_now(&rust).await.is_none());
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn test_disabled_service_drops_everything() {
    let (service, backend, _clock) = service_with(CognalyzeConfig {
        enabled: false,
        ..Default::default()
    });

    assert!(!service.is_enabled());
    assert!(!service.notify_changed(doc("app.js", "x")));
    assert!(service.analyze_now(&doc("app.js", "x")).await.is_none());
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn test_turning_real_time_off_cancels_pending_timers() {
    let (service, backend, clock) = service();
    let mut results = service.results();

    service.notify_changed(doc("a.js", "a"));
    service.notify_changed(doc("b.js", "b"));
    assert_eq!(service.pending_count(), 2);

    assert!(!service.toggle_real_time());
    assert_eq!(service.pending_count(), 0);
    assert!(!service.notify_changed(doc("a.js", "a2")));

    clock.advance_ms(DELAY_MS * 2);
    common::settle().await;
    assert!(matches!(results.try_recv(), Err(TryRecvError::Empty)));
    assert_eq!(backend.calls(), 0);

    assert!(service.toggle_real_time());
    assert!(service.notify_changed(doc("a.js", "a3")));
}

#[tokio::test]
async fn test_real_time_off_by_config() {
    let (service, _backend, _clock) = service_with(CognalyzeConfig {
        real_time: false,
        ..Default::default()
    });

    assert!(!service.is_real_time());
    assert!(!service.notify_changed(doc("a.js", "a")));
    service.set_real_time(true);
    assert!(service.notify_changed(doc("a.js", "a")));
}

#[tokio::test]
async fn test_analyze_now_supersedes_pending_timer() {
    let (service, backend, clock) = service();
    let mut results = service.results();

    service.notify_changed(doc("app.js", "old"));
    let report = service.analyze_now(&doc("app.js", "new")).await.unwrap();
    assert!(!service.is_pending("app.js"));
    assert_eq!(next_event(&mut results).await.report, report);

    clock.advance_ms(DELAY_MS);
    common::settle().await;
    assert_eq!(backend.calls(), 1);
    assert!(matches!(results.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_clear_cache_forces_remote_call() {
    let (service, backend, _clock) = service();
    let document = doc("app.js", "if (x) {}");

    service.analyze_now(&document).await.unwrap();
    let cached = service.analyze_now(&document).await.unwrap();
    assert_eq!(cached.origin, ResultOrigin::Cache);

    service.clear_cache();
    let fresh = service.analyze_now(&document).await.unwrap();
    assert_eq!(fresh.origin, ResultOrigin::Remote);
    assert_eq!(backend.calls(), 2);
}

#[tokio::test]
async fn test_event_source_drives_analysis() {
    let (service, _backend, clock) = service();
    let source = ChannelEventSource::new();
    let subscription = service.subscribe(&source);
    let mut results = service.results();
    assert!(subscription.is_active());

    source.emit(DocumentEvent::Changed(doc("app.js", "if (a) {}")));
    common::wait_until(|| service.is_pending("app.js")).await;

    clock.advance_ms(DELAY_MS);
    let event = next_event(&mut results).await;
    assert_eq!(event.document_key, "app.js");
}

#[tokio::test]
async fn test_activation_reuses_existing_result() {
    let (service, backend, clock) = service();
    let source = ChannelEventSource::new();
    let _subscription = service.subscribe(&source);
    let mut results = service.results();

    // No result yet: activation schedules one.
    source.emit(DocumentEvent::Activated(doc("app.js", "x = 1")));
    common::wait_until(|| service.is_pending("app.js")).await;
    clock.advance_ms(DELAY_MS);
    let first = next_event(&mut results).await;

    // With a result: activation republishes it without analyzing.
    source.emit(DocumentEvent::Activated(doc("app.js", "x = 1")));
    let again = next_event(&mut results).await;

    assert_eq!(again, first);
    assert_eq!(backend.calls(), 1);
    assert!(!service.is_pending("app.js"));
}

#[tokio::test]
async fn test_close_cancels_timer_and_forgets_result() {
    let (service, _backend, _clock) = service();
    let source = ChannelEventSource::new();
    let _subscription = service.subscribe(&source);

    service.analyze_now(&doc("app.js", "a")).await.unwrap();
    service.notify_changed(doc("app.js", "ab"));
    assert!(service.latest("app.js").is_some());

    source.emit(DocumentEvent::Closed {
        key: "app.js".into(),
    });
    common::wait_until(|| !service.is_pending("app.js")).await;

    assert!(service.latest("app.js").is_none());
}

#[tokio::test]
async fn test_unsubscribe_stops_delivery() {
    let (service, _backend, _clock) = service();
    let source = ChannelEventSource::new();
    let subscription = service.subscribe(&source);
    common::settle().await;

    subscription.unsubscribe();
    common::settle().await;

    source.emit(DocumentEvent::Changed(doc("app.js", "a")));
    common::settle().await;
    assert_eq!(service.pending_count(), 0);
}

#[tokio::test]
async fn test_closed_source_ends_subscription() {
    let (service, _backend, _clock) = service();
    let source = ChannelEventSource::new();
    let subscription = service.subscribe(&source);
    common::settle().await;
    assert!(subscription.is_active());
    assert_eq!(source.subscriber_count(), 1);

    drop(source);
    common::wait_until(|| !subscription.is_active()).await;
    assert!(!subscription.is_active());

    // A second subscription is unaffected by the first one ending
    let other = ChannelEventSource::new();
    let live = service.subscribe(&other);
    common::settle().await;
    assert!(live.is_active());
    assert_eq!(other.emit(DocumentEvent::Changed(doc("app.js", "a"))), 1);
    common::settle().await;
    assert_eq!(service.pending_count(), 1);
}

#[tokio::test]
async fn test_shutdown_cancels_timers_and_results() {
    let (service, _backend, clock) = service();
    let source = ChannelEventSource::new();
    let subscription = service.subscribe(&source);
    let mut results = service.results();

    service.analyze_now(&doc("a.js", "a")).await.unwrap();
    next_event(&mut results).await;
    service.notify_changed(doc("b.js", "b"));

    service.shutdown();
    assert_eq!(service.pending_count(), 0);
    assert!(service.latest("a.js").is_none());
    assert!(!subscription.is_active());

    clock.advance_ms(DELAY_MS);
    common::settle().await;
    assert!(matches!(results.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_custom_delay_from_config() {
    let (service, _backend, clock) = service_with(CognalyzeConfig {
        analysis_delay_ms: 50,
        ..Default::default()
    });
    let mut results = service.results();

    service.notify_changed(doc("app.js", "a"));
    clock.advance_ms(49);
    common::settle().await;
    assert!(service.is_pending("app.js"));

    clock.advance_ms(1);
    next_event(&mut results).await;
    assert!(!service.is_pending("app.js"));
}
