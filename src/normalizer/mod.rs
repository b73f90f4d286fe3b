//! Turns raw metrics into a well-formed [`ComplexityResult`].
//!
//! Scores are clamped into `[0, 100]`, counts are floored at zero, and issues
//! are kept only when they point at a real line of the analyzed source.
//! Missing numeric fields fall back to documented defaults: overall score 0,
//! maintainability 100, complexity counts 0, lines of code to the source's
//! line count.

pub mod raw;

pub use raw::{RawIssue, RawMetrics};

use crate::core::{ComplexityIssue, ComplexityResult, IssueKind, Severity};

/// Placeholder used when an issue carries no message.
pub const DEFAULT_ISSUE_MESSAGE: &str = "Complexity issue detected";

/// Normalize `raw` against the source it describes.
pub fn normalize(raw: &RawMetrics, source: &str) -> ComplexityResult {
    let lines: Vec<&str> = source.split('\n').collect();

    ComplexityResult {
        overall_score: clamp_score(raw.overall_score, 0.0),
        cyclomatic_complexity: floor_count(raw.cyclomatic_complexity, 0.0),
        cognitive_complexity: floor_count(raw.cognitive_complexity, 0.0),
        maintainability_index: clamp_score(raw.maintainability_index, 100.0),
        lines_of_code: floor_lines(raw.lines_of_code, lines.len()),
        recommendations: raw.recommendations.clone().unwrap_or_default(),
        issues: raw
            .issues
            .iter()
            .filter_map(|issue| normalize_issue(issue, &lines))
            .collect(),
    }
}

fn clamp_score(value: Option<f64>, default: f64) -> u32 {
    value.unwrap_or(default).clamp(0.0, 100.0).round() as u32
}

fn floor_count(value: Option<f64>, default: f64) -> u32 {
    value
        .unwrap_or(default)
        .max(0.0)
        .round()
        .min(f64::from(u32::MAX)) as u32
}

fn floor_lines(value: Option<f64>, line_count: usize) -> usize {
    match value {
        Some(v) => v.max(0.0).round() as usize,
        None => line_count,
    }
}

fn normalize_issue(issue: &RawIssue, lines: &[&str]) -> Option<ComplexityIssue> {
    let line = issue_line(issue.line?, lines.len())?;
    let text = lines[line - 1].trim_end_matches('\r');

    Some(ComplexityIssue {
        line,
        end_column: text.chars().count(),
        severity: issue
            .severity
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(Severity::Medium),
        kind: issue
            .kind
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(IssueKind::Cognitive),
        message: issue
            .message
            .clone()
            .unwrap_or_else(|| DEFAULT_ISSUE_MESSAGE.to_string()),
    })
}

/// Accept integral line numbers in `[1, total_lines]`.
fn issue_line(raw: f64, total_lines: usize) -> Option<usize> {
    if raw.fract() != 0.0 || raw < 1.0 || raw > total_lines as f64 {
        return None;
    }
    Some(raw as usize)
}
