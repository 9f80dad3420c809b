//! Serializable synthesis configuration.
//!
//! Every field has a default equal to the canonical policy, so an empty TOML
//! document is a valid configuration. Numeric constants here are policy, not
//! settled domain law: the two historical scoring variants disagreed on them.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::Path;

use tripillar_core::scoring::{ConfigError, GocharaPreset, NestedPeriodBlend, ScoreWeights};

/// Which period body's transit is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitBodyPolicy {
    /// The primary (outer) period body.
    #[default]
    PrimaryPeriod,
    /// The secondary period body when one is active, else the primary.
    InnermostPeriod,
}

/// Complete configuration for one synthesis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Days between samples. Must be at least 1.
    pub step_days: u32,
    /// Time of day at which each stepped date is sampled.
    pub sample_time: NaiveTime,
    pub transit_body: TransitBodyPolicy,
    pub gochara: GocharaPreset,
    /// Share of the primary period in the blended period strength.
    pub period_primary_share: f64,
    /// Points strictly below this probability form caution windows.
    pub caution_threshold: u8,
    /// Sample on the rayon pool instead of the calling thread.
    pub parallel: bool,
    pub weights: ScoreWeights,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            step_days: 1,
            sample_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN),
            transit_body: TransitBodyPolicy::default(),
            gochara: GocharaPreset::default(),
            period_primary_share: NestedPeriodBlend::DEFAULT_PRIMARY_SHARE,
            caution_threshold: 40,
            parallel: false,
            weights: ScoreWeights::default(),
        }
    }
}

impl SynthesisConfig {
    /// Parse a configuration from a TOML string and validate it.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(format!("parse config TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("read config file {}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    /// Check the fields that serde cannot check on its own.
    ///
    /// Weights are validated while deserializing. The step is checked
    /// together with the date range when synthesis starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        NestedPeriodBlend::new(self.period_primary_share)?;
        if self.caution_threshold > 100 {
            return Err(ConfigError::CautionThreshold(self.caution_threshold));
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(format!("encode config TOML: {e}")))
    }
}
