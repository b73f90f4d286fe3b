//! Per-document debounce timers.
//!
//! Each document key has at most one pending timer. Scheduling again for the
//! same key cancels the previous timer, so a burst of edits collapses into a
//! single analysis that fires `delay` after the last edit.
//!
//! Cancelling only affects timers that have not fired. Once a timer fires it
//! leaves the pending set and its action runs to completion.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::task::AbortHandle;
use tracing::trace;

use crate::clock::Clock;

#[derive(Debug)]
struct PendingTimer {
    id: u64,
    handle: AbortHandle,
}

#[derive(Debug)]
pub struct AnalysisScheduler {
    clock: Arc<dyn Clock>,
    pending: Arc<DashMap<String, PendingTimer>>,
    next_id: AtomicU64,
}

impl AnalysisScheduler {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            pending: Arc::new(DashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Arm a timer for `key`, replacing any timer already pending for it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F, Fut>(&self, key: impl Into<String>, delay: Duration, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let key = key.into();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let deadline = self.clock.now() + delay;
        let clock = Arc::clone(&self.clock);
        let pending = Arc::clone(&self.pending);
        let task_key = key.clone();

        // The entry guard is held until the new timer is registered, so a
        // timer that fires immediately still finds its own entry.
        let entry = self.pending.entry(key);
        let task = tokio::spawn(async move {
            clock.sleep_until(deadline).await;
            if pending
                .remove_if(&task_key, |_, timer| timer.id == id)
                .is_none()
            {
                return;
            }
            trace!(key = %task_key, "debounce timer fired");
            action().await;
        });

        let timer = PendingTimer {
            id,
            handle: task.abort_handle(),
        };
        match entry {
            Entry::Occupied(mut occupied) => {
                let previous = occupied.insert(timer);
                previous.handle.abort();
                trace!(key = %occupied.key(), "debounce timer replaced");
            }
            Entry::Vacant(vacant) => {
                vacant.insert(timer);
            }
        }
    }

    /// Cancel the pending timer for `key`. Returns whether one existed.
    pub fn cancel(&self, key: &str) -> bool {
        match self.pending.remove(key) {
            Some((_, timer)) => {
                timer.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Cancel every pending timer, returning how many were cancelled.
    pub fn cancel_all(&self) -> usize {
        let mut cancelled = 0;
        self.pending.retain(|_, timer| {
            timer.handle.abort();
            cancelled += 1;
            false
        });
        cancelled
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.pending.contains_key(key)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl Drop for AnalysisScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
