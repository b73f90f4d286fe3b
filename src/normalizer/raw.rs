//! Typed intermediate for metrics reported by the remote analysis.
//!
//! Decoding is lenient per field: a field of the wrong JSON type decodes as
//! missing instead of failing the whole reply. Only malformed JSON is an error.

use crate::complexity::HeuristicMetrics;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawMetrics {
    #[serde(deserialize_with = "lenient_number")]
    pub overall_score: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub cyclomatic_complexity: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub cognitive_complexity: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub maintainability_index: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub lines_of_code: Option<f64>,
    /// `None` unless the reply carried an array made only of strings
    #[serde(deserialize_with = "lenient_string_list")]
    pub recommendations: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_issue_list")]
    pub issues: Vec<RawIssue>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawIssue {
    #[serde(deserialize_with = "lenient_number")]
    pub line: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    pub severity: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub message: Option<String>,
    #[serde(rename = "type", deserialize_with = "lenient_string")]
    pub kind: Option<String>,
}

impl RawMetrics {
    /// Decode a JSON object, e.g. the span extracted from a remote reply.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<&HeuristicMetrics> for RawMetrics {
    fn from(metrics: &HeuristicMetrics) -> Self {
        Self {
            overall_score: Some(f64::from(metrics.overall_score)),
            cyclomatic_complexity: Some(f64::from(metrics.cyclomatic)),
            cognitive_complexity: Some(f64::from(metrics.cognitive)),
            maintainability_index: Some(f64::from(metrics.maintainability_index)),
            lines_of_code: Some(metrics.lines_of_code as f64),
            recommendations: Some(metrics.recommendations.clone()),
            issues: Vec::new(),
        }
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_f64())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect())
}

fn lenient_issue_list<'de, D>(deserializer: D) -> Result<Vec<RawIssue>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}
