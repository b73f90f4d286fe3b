//! Local complexity estimation and severity classification.

pub mod heuristic;
pub mod thresholds;

pub use heuristic::{analyze as analyze_heuristic, HeuristicMetrics, FALLBACK_RECOMMENDATIONS};
pub use thresholds::{ThresholdPreset, ThresholdSet};
