//! Retry policy for remote analysis calls.
//!
//! Only transport failures are retried; a reply that arrived but could not be
//! understood is never sent again.
//!
//! ```toml
//! [remote.retry]
//! enabled = true
//! max_retries = 2
//! base_delay_ms = 250
//! max_delay_ms = 5000
//! backoff = "exponential"
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Attempts after the first one
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Ceiling for any single wait
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    #[serde(default)]
    pub backoff: Backoff,
}

/// How the wait grows between consecutive retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backoff {
    Fixed,
    Linear,
    #[default]
    Exponential,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff: Backoff::default(),
        }
    }
}

impl RetryConfig {
    /// Wait before retry number `retry` (1 for the first retry).
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        let base = Duration::from_millis(self.base_delay_ms);
        let retry = retry.max(1);
        let delay = match self.backoff {
            Backoff::Fixed => base,
            Backoff::Linear => base.saturating_mul(retry),
            Backoff::Exponential => base.saturating_mul(2u32.saturating_pow(retry - 1)),
        };
        delay.min(Duration::from_millis(self.max_delay_ms))
    }

    /// The waits to apply between attempts, one per permitted retry.
    /// Empty when retries are disabled.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        let retries = if self.enabled { self.max_retries } else { 0 };
        (1..=retries).map(move |retry| self.backoff_delay(retry))
    }
}

fn default_max_retries() -> u32 {
    2
}

fn default_base_delay_ms() -> u64 {
    250
}

fn default_max_delay_ms() -> u64 {
    5_000
}
