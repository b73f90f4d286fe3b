//! Document notifications consumed by the analysis service.
//!
//! Hosts translate their own editor or file-system callbacks into
//! [`DocumentEvent`]s. Tests drive the service through a
//! [`ChannelEventSource`].

use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 64;

/// Contents of a document at one moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSnapshot {
    /// Stable identity of the document, e.g. a path or URI
    pub key: String,
    pub language: String,
    pub text: String,
}

impl DocumentSnapshot {
    pub fn new(key: impl Into<String>, language: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            language: language.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    /// Text was edited
    Changed(DocumentSnapshot),
    /// The document became the one the user is looking at
    Activated(DocumentSnapshot),
    Closed { key: String },
}

impl DocumentEvent {
    pub fn key(&self) -> &str {
        match self {
            DocumentEvent::Changed(doc) | DocumentEvent::Activated(doc) => &doc.key,
            DocumentEvent::Closed { key } => key,
        }
    }
}

/// Anything that can hand out a stream of document events.
pub trait EventSource: Send + Sync {
    fn subscribe(&self) -> broadcast::Receiver<DocumentEvent>;
}

/// In-process event source backed by a broadcast channel.
#[derive(Debug, Clone)]
pub struct ChannelEventSource {
    tx: broadcast::Sender<DocumentEvent>,
}

impl ChannelEventSource {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish an event. Returns the number of subscribers that will see it.
    pub fn emit(&self, event: DocumentEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChannelEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for ChannelEventSource {
    fn subscribe(&self) -> broadcast::Receiver<DocumentEvent> {
        self.tx.subscribe()
    }
}
