//! The analysis context: configuration, cache, backend, orchestrator and
//! scheduler, built once and shared by handle.
//!
//! Completed analyses are published on a broadcast channel so callers never
//! wait on an analysis they triggered through a document event.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use dashmap::DashMap;
use parking_lot::RwLock;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::AbortHandle;
use tracing::{debug, trace, warn};

use crate::cache::{CacheStats, ResultCache};
use crate::clock::Clock;
use crate::config::CognalyzeConfig;
use crate::events::{DocumentEvent, DocumentSnapshot, EventSource};
use crate::orchestrator::{AnalysisReport, ComplexityAnalyzer};
use crate::remote::AnalysisBackend;
use crate::scheduler::AnalysisScheduler;

const RESULT_CHANNEL_CAPACITY: usize = 64;

/// A finished analysis for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisEvent {
    pub document_key: String,
    pub report: AnalysisReport,
}

/// Cheaply cloneable handle to the shared analysis context.
#[derive(Clone)]
pub struct AnalysisService {
    inner: Arc<ServiceInner>,
}

struct ServiceInner {
    config: CognalyzeConfig,
    credential: RwLock<Option<String>>,
    real_time: AtomicBool,
    analyzer: ComplexityAnalyzer,
    scheduler: AnalysisScheduler,
    latest: DashMap<String, AnalysisReport>,
    results: broadcast::Sender<AnalysisEvent>,
    subscriptions: DashMap<u64, AbortHandle>,
    next_subscription: AtomicU64,
}

impl std::fmt::Debug for AnalysisService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisService")
            .field("enabled", &self.inner.config.enabled)
            .field("real_time", &self.is_real_time())
            .field("pending", &self.inner.scheduler.pending_count())
            .field("documents", &self.inner.latest.len())
            .finish()
    }
}

impl AnalysisService {
    pub fn new(
        config: CognalyzeConfig,
        backend: Arc<dyn AnalysisBackend>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cache = Arc::new(ResultCache::new(
            Duration::from_millis(config.cache_ttl_ms),
            Arc::clone(&clock),
        ));
        let (results, _) = broadcast::channel(RESULT_CHANNEL_CAPACITY);

        Self {
            inner: Arc::new(ServiceInner {
                real_time: AtomicBool::new(config.real_time),
                analyzer: ComplexityAnalyzer::new(cache, backend),
                scheduler: AnalysisScheduler::new(clock),
                credential: RwLock::new(None),
                latest: DashMap::new(),
                results,
                subscriptions: DashMap::new(),
                next_subscription: AtomicU64::new(0),
                config,
            }),
        }
    }

    /// Credential passed to the backend on every analysis.
    pub fn set_credential(&self, credential: Option<String>) {
        *self.inner.credential.write() = credential;
    }

    pub fn config(&self) -> &CognalyzeConfig {
        &self.inner.config
    }

    pub fn supports(&self, language: &str) -> bool {
        self.inner.config.supports(language)
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.config.enabled
    }

    pub fn is_real_time(&self) -> bool {
        self.inner.real_time.load(Ordering::SeqCst)
    }

    /// Turn on-change analysis on or off. Turning it off cancels every
    /// pending timer.
    pub fn set_real_time(&self, enabled: bool) {
        self.inner.real_time.store(enabled, Ordering::SeqCst);
        if !enabled {
            self.inner.cancel_timers();
        }
    }

    /// Flip on-change analysis, returning the new state.
    pub fn toggle_real_time(&self) -> bool {
        let enabled = !self.inner.real_time.fetch_xor(true, Ordering::SeqCst);
        if !enabled {
            self.inner.cancel_timers();
        }
        debug!(enabled, "real-time analysis toggled");
        enabled
    }

    /// Schedule a debounced analysis for an edited document.
    ///
    /// Returns false when the request is dropped: analysis disabled, real-time
    /// analysis off, or the language unsupported.
    pub fn notify_changed(&self, document: DocumentSnapshot) -> bool {
        if !self.is_real_time() {
            trace!(key = %document.key, "real-time analysis off, change ignored");
            return false;
        }
        self.inner.schedule(document)
    }

    /// Analyze immediately, superseding any pending timer for the document.
    ///
    /// `None` means no analysis is available for this document.
    pub async fn analyze_now(&self, document: &DocumentSnapshot) -> Option<AnalysisReport> {
        if !self.inner.accepts(document) {
            return None;
        }
        self.inner.scheduler.cancel(&document.key);
        Some(self.inner.run(document).await)
    }

    /// Most recent report for a document, if any.
    pub fn latest(&self, document_key: &str) -> Option<AnalysisReport> {
        self.inner
            .latest
            .get(document_key)
            .map(|entry| entry.value().clone())
    }

    pub fn is_pending(&self, document_key: &str) -> bool {
        self.inner.scheduler.is_pending(document_key)
    }

    pub fn pending_count(&self) -> usize {
        self.inner.scheduler.pending_count()
    }

    pub fn clear_cache(&self) {
        self.inner.analyzer.cache().clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.inner.analyzer.cache().stats()
    }

    /// Receiver for completed analyses.
    pub fn results(&self) -> broadcast::Receiver<AnalysisEvent> {
        self.inner.results.subscribe()
    }

    /// Apply one document event.
    pub fn handle_event(&self, event: DocumentEvent) {
        match event {
            DocumentEvent::Changed(document) => {
                self.notify_changed(document);
            }
            DocumentEvent::Activated(document) => self.inner.activate(document),
            DocumentEvent::Closed { key } => {
                self.inner.scheduler.cancel(&key);
                self.inner.latest.remove(&key);
                trace!(%key, "document closed");
            }
        }
    }

    /// Consume `source` in a background task until the returned
    /// [`Subscription`] is dropped or the source closes. A closed source
    /// leaves the subscription inactive.
    #[must_use = "dropping the subscription stops event delivery"]
    pub fn subscribe(&self, source: &dyn EventSource) -> Subscription {
        let mut rx = source.subscribe();
        let service = Arc::downgrade(&self.inner);
        let id = self.inner.next_subscription.fetch_add(1, Ordering::Relaxed);

        // Held until the handle is stored, so a source that is already closed
        // cannot leave a stale entry behind.
        let entry = self.inner.subscriptions.entry(id);
        let task = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        let Some(inner) = service.upgrade() else {
                            return;
                        };
                        AnalysisService { inner }.handle_event(event);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "document events dropped, subscriber lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            if let Some(inner) = service.upgrade() {
                inner.subscriptions.remove(&id);
                debug!(subscription = id, "event source closed");
            }
        });

        entry.insert(task.abort_handle());
        Subscription {
            id,
            service: Arc::downgrade(&self.inner),
        }
    }

    /// Cancel timers, stop subscriptions and forget per-document results.
    pub fn shutdown(&self) {
        self.inner.cancel_timers();
        self.inner.stop_subscriptions();
        self.inner.latest.clear();
        debug!("analysis service shut down");
    }
}

impl ServiceInner {
    fn accepts(&self, document: &DocumentSnapshot) -> bool {
        if !self.config.enabled {
            trace!(key = %document.key, "analysis disabled");
            return false;
        }
        if !self.config.supports(&document.language) {
            trace!(key = %document.key, language = %document.language, "unsupported language");
            return false;
        }
        true
    }

    fn schedule(self: &Arc<Self>, document: DocumentSnapshot) -> bool {
        if !self.accepts(&document) {
            return false;
        }

        let service = Arc::downgrade(self);
        let delay = Duration::from_millis(self.config.analysis_delay_ms);
        self.scheduler
            .schedule(document.key.clone(), delay, move || async move {
                if let Some(inner) = Weak::upgrade(&service) {
                    inner.run(&document).await;
                }
            });
        true
    }

    fn activate(self: &Arc<Self>, document: DocumentSnapshot) {
        if !self.accepts(&document) {
            return;
        }
        match self.latest.get(&document.key).map(|e| e.value().clone()) {
            Some(report) => self.publish(document.key, report),
            None => {
                self.schedule(document);
            }
        }
    }

    async fn run(&self, document: &DocumentSnapshot) -> AnalysisReport {
        let credential = self.credential.read().clone();
        let report = self
            .analyzer
            .analyze(
                &document.text,
                &document.language,
                credential.as_deref(),
                &self.config.thresholds,
            )
            .await;

        self.latest.insert(document.key.clone(), report.clone());
        self.publish(document.key.clone(), report.clone());
        report
    }

    fn publish(&self, document_key: String, report: AnalysisReport) {
        if self
            .results
            .send(AnalysisEvent {
                document_key,
                report,
            })
            .is_err()
        {
            trace!("no result listeners");
        }
    }

    fn cancel_timers(&self) {
        let cancelled = self.scheduler.cancel_all();
        if cancelled > 0 {
            debug!(cancelled, "pending analyses cancelled");
        }
    }

    fn stop_subscriptions(&self) {
        self.subscriptions.retain(|_, handle| {
            handle.abort();
            false
        });
    }
}

impl Drop for ServiceInner {
    fn drop(&mut self) {
        self.stop_subscriptions();
    }
}

/// Handle to an event-source subscription.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    service: Weak<ServiceInner>,
}

impl Subscription {
    pub fn unsubscribe(self) {}

    pub fn is_active(&self) -> bool {
        self.service
            .upgrade()
            .is_some_and(|inner| inner.subscriptions.contains_key(&self.id))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.service.upgrade() {
            if let Some((_, handle)) = inner.subscriptions.remove(&self.id) {
                handle.abort();
            }
        }
    }
}
