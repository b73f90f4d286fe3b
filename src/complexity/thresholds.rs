use crate::core::errors::{Error, Result};
use crate::core::Severity;
use serde::{Deserialize, Serialize};

/// Preset threshold configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdPreset {
    /// Flags complexity early
    Strict,
    /// Default boundaries
    Balanced,
    /// For legacy or inherently complex code
    Lenient,
}

/// Score boundaries used to map an overall score to a severity tier.
///
/// Expected to be strictly increasing (`low < medium < high`). The classifier
/// does not check this; [`ThresholdSet::validate`] does, and configuration
/// loading rejects sets that fail it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdSet {
    #[serde(default = "default_low")]
    pub low: u32,
    #[serde(default = "default_medium")]
    pub medium: u32,
    #[serde(default = "default_high")]
    pub high: u32,
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self {
            low: default_low(),
            medium: default_medium(),
            high: default_high(),
        }
    }
}

fn default_low() -> u32 {
    10
}
fn default_medium() -> u32 {
    20
}
fn default_high() -> u32 {
    30
}

impl ThresholdSet {
    pub fn new(low: u32, medium: u32, high: u32) -> Self {
        Self { low, medium, high }
    }

    pub fn from_preset(preset: ThresholdPreset) -> Self {
        match preset {
            ThresholdPreset::Strict => Self::new(5, 12, 20),
            ThresholdPreset::Balanced => Self::default(),
            ThresholdPreset::Lenient => Self::new(20, 40, 60),
        }
    }

    /// Map a score to its tier: `<= low` is low, `<= medium` is medium,
    /// anything above is high.
    ///
    /// `high` only documents the upper band and takes no part in the
    /// comparison. With an inverted set the comparisons still run in this
    /// order, e.g. `{30, 20, 10}` classifies 25 as low.
    pub fn classify(&self, score: u32) -> Severity {
        if score <= self.low {
            Severity::Low
        } else if score <= self.medium {
            Severity::Medium
        } else {
            Severity::High
        }
    }

    /// Check the boundaries are strictly increasing.
    pub fn validate(&self) -> Result<()> {
        if self.low >= self.medium {
            return Err(Error::Validation(format!(
                "thresholds.low ({}) must be less than thresholds.medium ({})",
                self.low, self.medium
            )));
        }
        if self.medium >= self.high {
            return Err(Error::Validation(format!(
                "thresholds.medium ({}) must be less than thresholds.high ({})",
                self.medium, self.high
            )));
        }
        Ok(())
    }
}
