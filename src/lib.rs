// Export modules for library usage
pub mod cache;
pub mod cli;
pub mod clock;
pub mod commands;
pub mod complexity;
pub mod config;
pub mod core;
pub mod events;
pub mod io;
pub mod normalizer;
pub mod orchestrator;
pub mod remote;
pub mod scheduler;
pub mod service;

// Re-export commonly used types
pub use crate::core::{
    errors::{Error, Result},
    ComplexityIssue, ComplexityResult, IssueKind, ResultOrigin, Severity,
};

pub use crate::cache::{cache_key, CacheStats, ResultCache};
pub use crate::clock::{Clock, ManualClock, TokioClock};
pub use crate::complexity::{analyze_heuristic, HeuristicMetrics, ThresholdPreset, ThresholdSet};
pub use crate::config::{load_config, CognalyzeConfig};
pub use crate::events::{ChannelEventSource, DocumentEvent, DocumentSnapshot, EventSource};
pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};
pub use crate::normalizer::{normalize, RawIssue, RawMetrics};
pub use crate::orchestrator::{AnalysisReport, ComplexityAnalyzer};
pub use crate::remote::{AnalysisBackend, GeminiClient, OfflineBackend, RemoteError};
pub use crate::scheduler::AnalysisScheduler;
pub use crate::service::{AnalysisEvent, AnalysisService, Subscription};
