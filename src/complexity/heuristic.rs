//! Local, text-driven complexity estimate used when remote analysis is
//! unavailable.
//!
//! Everything here is token matching over raw text, not syntax-aware:
//! keywords inside string literals and comments count the same as real
//! control flow, and the nesting counter is line oriented, so multi-line
//! brace spans or brace-less blocks can drift it away from the true depth.

use once_cell::sync::Lazy;
use regex::Regex;

/// Generic advice attached to every heuristic result.
pub const FALLBACK_RECOMMENDATIONS: [&str; 3] = [
    "Consider breaking down large functions into smaller ones",
    "Reduce nested control structures",
    "Add comments to explain complex logic",
];

/// Tokens that each add one decision point. The last entry is the ternary
/// operator, matched only when word characters sit directly on both sides.
static DECISION_TOKENS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\bif\b",
        r"\belse\b",
        r"\bwhile\b",
        r"\bfor\b",
        r"\bswitch\b",
        r"\bcase\b",
        r"\bcatch\b",
        r"\b\?\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("decision token pattern is valid"))
    .collect()
});

static NESTING_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(if|for|while|switch)\b").expect("nesting pattern is valid"));

static BRANCH_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(if|for|while|switch|catch)\b").expect("branch pattern is valid")
});

/// Aggregate metrics computed from text alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeuristicMetrics {
    pub cyclomatic: u32,
    pub cognitive: u32,
    pub lines_of_code: usize,
    pub overall_score: u32,
    pub maintainability_index: u32,
    pub recommendations: Vec<String>,
}

/// Estimate complexity metrics for `source`. Pure and deterministic.
pub fn analyze(source: &str) -> HeuristicMetrics {
    let cyclomatic = cyclomatic_estimate(source);
    let cognitive = cognitive_estimate(source);
    let overall_score = overall_score(cyclomatic, cognitive);

    HeuristicMetrics {
        cyclomatic,
        cognitive,
        lines_of_code: count_code_lines(source),
        overall_score,
        maintainability_index: 100u32.saturating_sub(overall_score),
        recommendations: FALLBACK_RECOMMENDATIONS
            .iter()
            .map(|s| s.to_string())
            .collect(),
    }
}

/// One plus every occurrence of a decision token.
pub fn cyclomatic_estimate(source: &str) -> u32 {
    DECISION_TOKENS.iter().fold(1u32, |total, pattern| {
        let hits = pattern.find_iter(source).count();
        total.saturating_add(u32::try_from(hits).unwrap_or(u32::MAX))
    })
}

/// Nesting-weighted count of branching lines.
///
/// Per line: an opening brace or nesting keyword bumps the counter first, a
/// branch or exception keyword then adds the counter's current value, and a
/// closing brace decrements it (floored at zero).
pub fn cognitive_estimate(source: &str) -> u32 {
    let mut nesting: u32 = 0;
    let mut cognitive: u32 = 0;

    for line in source.split('\n') {
        let trimmed = line.trim();

        if trimmed.contains('{') || NESTING_KEYWORD.is_match(trimmed) {
            nesting = nesting.saturating_add(1);
        }
        if BRANCH_KEYWORD.is_match(trimmed) {
            cognitive = cognitive.saturating_add(nesting);
        }
        if trimmed.contains('}') {
            nesting = nesting.saturating_sub(1);
        }
    }

    cognitive
}

/// Lines whose trimmed form is non-empty.
pub fn count_code_lines(source: &str) -> usize {
    source
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .count()
}

fn overall_score(cyclomatic: u32, cognitive: u32) -> u32 {
    cyclomatic.saturating_add(cognitive).saturating_mul(2).min(100)
}
