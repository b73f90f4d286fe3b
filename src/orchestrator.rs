//! Cache-first analysis with remote analysis and local fallback.
//!
//! [`ComplexityAnalyzer::analyze`] always produces a result. A fresh cache
//! entry is returned as is. Otherwise the remote backend is tried once and,
//! on any failure, the local heuristic fills in. Both paths go through the
//! normalizer and the outcome is cached under the content key.
//!
//! Concurrent requests for the same key share one computation: the first
//! caller leads, later callers wait for its result.

use std::sync::Arc;

use tracing::{debug, debug_span, warn, Instrument};

use crate::cache::{cache_key, Flight, InFlight, ResultCache};
use crate::complexity::{analyze_heuristic, ThresholdSet};
use crate::core::{ComplexityResult, ResultOrigin, Severity};
use crate::normalizer::{normalize, RawMetrics};
use crate::remote::{AnalysisBackend, RemoteError};

/// A result together with how it was obtained and how it classifies.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub key: String,
    pub result: Arc<ComplexityResult>,
    pub severity: Severity,
    pub origin: ResultOrigin,
}

type Computed = (Arc<ComplexityResult>, ResultOrigin);

pub struct ComplexityAnalyzer {
    cache: Arc<ResultCache>,
    backend: Arc<dyn AnalysisBackend>,
    in_flight: InFlight<Computed>,
}

impl std::fmt::Debug for ComplexityAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComplexityAnalyzer")
            .field("cache", &self.cache)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl ComplexityAnalyzer {
    pub fn new(cache: Arc<ResultCache>, backend: Arc<dyn AnalysisBackend>) -> Self {
        Self {
            cache,
            backend,
            in_flight: InFlight::new(),
        }
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    /// Analyze `source`, classifying the overall score against `thresholds`.
    pub async fn analyze(
        &self,
        source: &str,
        language: &str,
        credential: Option<&str>,
        thresholds: &ThresholdSet,
    ) -> AnalysisReport {
        let key = cache_key(source, language);
        let span = debug_span!("analyze", key = %key, language);

        let (result, origin) = self
            .resolve(&key, source, language, credential)
            .instrument(span)
            .await;

        AnalysisReport {
            severity: thresholds.classify(result.overall_score),
            key,
            result,
            origin,
        }
    }

    async fn resolve(
        &self,
        key: &str,
        source: &str,
        language: &str,
        credential: Option<&str>,
    ) -> Computed {
        loop {
            if let Some(cached) = self.cache.get(key) {
                debug!("served from cache");
                return (cached, ResultOrigin::Cache);
            }

            match self.in_flight.join(key) {
                Flight::Leader(leader) => {
                    // Another leader may have finished between the miss and the join.
                    if let Some(cached) = self.cache.peek(key) {
                        let computed = (cached, ResultOrigin::Cache);
                        leader.complete(computed.clone());
                        return computed;
                    }

                    let (raw, origin) = self.fetch(source, language, credential).await;
                    let result = Arc::new(normalize(&raw, source));
                    self.cache.set(key, Arc::clone(&result));
                    debug!(%origin, score = result.overall_score, "analysis complete");

                    let computed = (result, origin);
                    leader.complete(computed.clone());
                    return computed;
                }
                Flight::Follower(follower) => {
                    debug!("joining in-flight analysis");
                    if let Some(computed) = follower.wait().await {
                        return computed;
                    }
                    // leader dropped without a result; take over
                }
            }
        }
    }

    async fn fetch(
        &self,
        source: &str,
        language: &str,
        credential: Option<&str>,
    ) -> (RawMetrics, ResultOrigin) {
        match self.backend.analyze(source, language, credential).await {
            Ok(raw) => (raw, ResultOrigin::Remote),
            Err(err) => {
                log_remote_failure(&err);
                let metrics = analyze_heuristic(source);
                (RawMetrics::from(&metrics), ResultOrigin::Fallback)
            }
        }
    }
}

fn log_remote_failure(err: &RemoteError) {
    match err {
        RemoteError::Configuration(_) => {
            debug!(error = %err, "remote analysis unavailable, using heuristic")
        }
        _ => warn!(error_kind = %err.kind(), error = %err, "remote analysis failed, using heuristic"),
    }
}
