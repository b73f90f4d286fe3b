//! Per-key deduplication of concurrent analyses.
//!
//! The first caller for a key becomes the leader and computes the value; any
//! caller arriving while the leader is running becomes a follower and waits for
//! the leader's value instead of starting its own remote call. A leader that
//! is dropped without completing releases its followers with `None`, and they
//! race to become the next leader.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

struct Slot<T> {
    id: u64,
    tx: watch::Sender<Option<T>>,
}

/// Registry of keys currently being computed.
pub struct InFlight<T> {
    slots: Arc<DashMap<String, Slot<T>>>,
    next_id: AtomicU64,
}

impl<T> std::fmt::Debug for InFlight<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InFlight")
            .field("keys", &self.slots.len())
            .finish()
    }
}

impl<T> Default for InFlight<T> {
    fn default() -> Self {
        Self {
            slots: Arc::new(DashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }
}

/// Outcome of joining a key.
pub enum Flight<T> {
    Leader(FlightLeader<T>),
    Follower(FlightFollower<T>),
}

impl<T: Clone> InFlight<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the flight for `key`, electing a leader if none is running.
    pub fn join(&self, key: &str) -> Flight<T> {
        match self.slots.entry(key.to_string()) {
            Entry::Occupied(slot) => Flight::Follower(FlightFollower {
                rx: slot.get().tx.subscribe(),
            }),
            Entry::Vacant(vacant) => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let (tx, _rx) = watch::channel(None);
                vacant.insert(Slot { id, tx });
                Flight::Leader(FlightLeader {
                    key: key.to_string(),
                    id,
                    slots: Arc::clone(&self.slots),
                })
            }
        }
    }

    pub fn is_in_flight(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Held by the caller responsible for computing the value.
pub struct FlightLeader<T> {
    key: String,
    id: u64,
    slots: Arc<DashMap<String, Slot<T>>>,
}

impl<T> FlightLeader<T> {
    /// Publish the value to every follower and retire the flight.
    pub fn complete(self, value: T) {
        if let Some((_, slot)) = self.slots.remove_if(&self.key, |_, slot| slot.id == self.id) {
            slot.tx.send_replace(Some(value));
        }
    }
}

impl<T> Drop for FlightLeader<T> {
    fn drop(&mut self) {
        // no-op after complete(); otherwise releases followers with None
        self.slots.remove_if(&self.key, |_, slot| slot.id == self.id);
    }
}

/// Held by callers waiting on a leader.
pub struct FlightFollower<T> {
    rx: watch::Receiver<Option<T>>,
}

impl<T: Clone> FlightFollower<T> {
    /// Wait for the leader. `None` means the leader gave up.
    pub async fn wait(mut self) -> Option<T> {
        loop {
            if let Some(value) = self.rx.borrow_and_update().clone() {
                return Some(value);
            }
            if self.rx.changed().await.is_err() {
                return self.rx.borrow().clone();
            }
        }
    }
}
