pub mod errors;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Metrics produced by one analysis of a unit of source text.
///
/// Results are shared as `Arc<ComplexityResult>` once built and are never
/// mutated; a newer analysis replaces the value instead.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityResult {
    /// Overall complexity, 0-100
    pub overall_score: u32,
    pub cyclomatic_complexity: u32,
    pub cognitive_complexity: u32,
    /// Maintainability index, 0-100 (higher is better)
    pub maintainability_index: u32,
    pub lines_of_code: usize,
    pub recommendations: Vec<String>,
    pub issues: Vec<ComplexityIssue>,
}

impl ComplexityResult {
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Issues at or above the given severity, in source order.
    pub fn issues_at_least(&self, severity: Severity) -> impl Iterator<Item = &ComplexityIssue> {
        self.issues.iter().filter(move |i| i.severity >= severity)
    }
}

/// A localized finding attached to one source line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityIssue {
    /// 1-based line number
    pub line: usize,
    /// Character length of the referenced line, so a consumer can mark the whole line
    pub end_column: usize,
    pub severity: Severity,
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Low, Severity::Medium, Severity::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .into_iter()
            .find(|sev| sev.as_str() == s)
            .ok_or_else(|| format!("unknown severity: {s}"))
    }
}

/// Which metric an issue relates to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    Cognitive,
    Cyclomatic,
    Maintainability,
}

impl IssueKind {
    pub const ALL: [IssueKind; 3] = [
        IssueKind::Cognitive,
        IssueKind::Cyclomatic,
        IssueKind::Maintainability,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::Cognitive => "cognitive",
            IssueKind::Cyclomatic => "cyclomatic",
            IssueKind::Maintainability => "maintainability",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for IssueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IssueKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown issue type: {s}"))
    }
}

/// Where a returned result came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultOrigin {
    Cache,
    Remote,
    Fallback,
}

impl fmt::Display for ResultOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResultOrigin::Cache => "cache",
            ResultOrigin::Remote => "remote",
            ResultOrigin::Fallback => "fallback",
        };
        f.write_str(s)
    }
}
