use serde::{Deserialize, Serialize};

use super::retry::RetryConfig;
use crate::complexity::ThresholdSet;

/// Languages analyzed when the config does not say otherwise.
pub const DEFAULT_LANGUAGES: [&str; 7] = [
    "javascript",
    "typescript",
    "python",
    "java",
    "csharp",
    "cpp",
    "c",
];

/// Root configuration, read from `.cognalyze.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CognalyzeConfig {
    /// Master switch; when false nothing is scheduled or analyzed
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Initial state of real-time (on change) analysis
    #[serde(default = "default_true")]
    pub real_time: bool,

    /// Debounce interval in milliseconds
    #[serde(default = "default_analysis_delay_ms")]
    pub analysis_delay_ms: u64,

    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,

    #[serde(default = "default_supported_languages")]
    pub supported_languages: Vec<String>,

    #[serde(default)]
    pub thresholds: ThresholdSet,

    #[serde(default)]
    pub remote: RemoteConfig,
}

impl Default for CognalyzeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            real_time: true,
            analysis_delay_ms: default_analysis_delay_ms(),
            cache_ttl_ms: default_cache_ttl_ms(),
            supported_languages: default_supported_languages(),
            thresholds: ThresholdSet::default(),
            remote: RemoteConfig::default(),
        }
    }
}

impl CognalyzeConfig {
    /// Case-sensitive membership test against `supported_languages`.
    pub fn supports(&self, language: &str) -> bool {
        self.supported_languages.iter().any(|l| l == language)
    }
}

/// Where and how remote analysis requests are sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Honor HTTP(S)_PROXY and friends from the environment
    #[serde(default = "default_true")]
    pub system_proxy: bool,

    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            system_proxy: true,
            retry: RetryConfig::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_analysis_delay_ms() -> u64 {
    1000
}

fn default_cache_ttl_ms() -> u64 {
    30_000
}

fn default_supported_languages() -> Vec<String> {
    DEFAULT_LANGUAGES.iter().map(|l| l.to_string()).collect()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-pro".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}
