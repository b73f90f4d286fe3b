// Test utility module for cognalyze integration tests
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cognalyze::clock::ManualClock;
use cognalyze::normalizer::{RawIssue, RawMetrics};
use cognalyze::remote::{require_credential, AnalysisBackend, RemoteError};
use cognalyze::{ComplexityAnalyzer, ResultCache};
use parking_lot::Mutex;
use tokio::sync::Semaphore;

pub const CREDENTIAL: Option<&str> = Some("test-key");
pub const TTL: Duration = Duration::from_millis(30_000);

pub const NESTED_JS: &str = "function f(a, b) {\n  if (a) {\n    if (b) {\n      return 1;\n    }\n  }\n  return 0;\n}";

/// Backend double: answers from a script, then with [`remote_metrics`].
#[derive(Default)]
pub struct ScriptedBackend {
    calls: AtomicUsize,
    script: Mutex<VecDeque<Result<RawMetrics, RemoteError>>>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies(replies: impl IntoIterator<Item = Result<RawMetrics, RemoteError>>) -> Self {
        Self {
            script: Mutex::new(replies.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Every call waits for a permit from `gate` before answering.
    pub fn gated(gate: Arc<Semaphore>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisBackend for ScriptedBackend {
    async fn analyze(
        &self,
        _source: &str,
        _language: &str,
        credential: Option<&str>,
    ) -> Result<RawMetrics, RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        require_credential(credential)?;
        if let Some(gate) = &self.gate {
            let _permit = gate
                .acquire()
                .await
                .map_err(|_| RemoteError::Transport("gate closed".into()))?;
        }
        let next = self.script.lock().pop_front();
        next.unwrap_or_else(|| Ok(remote_metrics()))
    }
}

/// A plausible, well-formed remote reply.
pub fn remote_metrics() -> RawMetrics {
    RawMetrics {
        overall_score: Some(42.0),
        cyclomatic_complexity: Some(4.0),
        cognitive_complexity: Some(6.0),
        maintainability_index: Some(58.0),
        lines_of_code: Some(8.0),
        recommendations: Some(vec!["Flatten the nested conditionals".to_string()]),
        issues: vec![RawIssue {
            line: Some(3.0),
            severity: Some("high".into()),
            message: Some("nested if".into()),
            kind: Some("cognitive".into()),
        }],
    }
}

pub fn analyzer_with(backend: Arc<ScriptedBackend>) -> (Arc<ComplexityAnalyzer>, ManualClock) {
    let clock = ManualClock::new();
    let cache = Arc::new(ResultCache::new(TTL, Arc::new(clock.clone())));
    (Arc::new(ComplexityAnalyzer::new(cache, backend)), clock)
}

/// Let spawned tasks run until they block.
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

/// Yield until `condition` holds; panics after a generous number of rounds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..1_000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}
