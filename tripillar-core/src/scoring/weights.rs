//! Compositing policy: signal weights, boost, and peak thresholds.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Body;

/// Allowed distance of the weight sum from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Construction-time policy errors. Fatal: nothing is sampled.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("signal weights must sum to 1.0 (got {sum})")]
    WeightSum { sum: f64 },
    #[error("{name} must be in [0, 1] (got {value})")]
    OutOfUnitRange { name: &'static str, value: f64 },
    #[error("gochara table has no entry for {0}")]
    MissingGocharaEntry(Body),
    #[error("gochara table lists house {house} for {body} (expected 1..=12)")]
    GocharaHouse { body: Body, house: u8 },
    #[error("gochara table lists house {house} for {body} as both favorable and difficult")]
    GocharaOverlap { body: Body, house: u8 },
    #[error("caution threshold must be at most 100 (got {0})")]
    CautionThreshold(u8),
    #[error("invalid config: {0}")]
    Parse(String),
}

pub(crate) fn check_unit(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::OutOfUnitRange { name, value })
    }
}

/// Per-signal minimum sub-scores that together trigger the alignment boost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoostThresholds {
    pub period: f64,
    pub gochara: f64,
    pub bindu: f64,
}

impl Default for BoostThresholds {
    fn default() -> Self {
        Self {
            period: 0.6,
            gochara: 0.7,
            bindu: 0.6,
        }
    }
}

/// Validated compositing weights.
///
/// Fields are private so that an instance always satisfies the invariants
/// checked in [`ScoreWeights::new`]; deserialization goes through the same
/// check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawScoreWeights", into = "RawScoreWeights")]
pub struct ScoreWeights {
    period: f64,
    gochara: f64,
    bindu: f64,
    boost: f64,
    thresholds: BoostThresholds,
}

impl ScoreWeights {
    pub fn new(
        period: f64,
        gochara: f64,
        bindu: f64,
        boost: f64,
        thresholds: BoostThresholds,
    ) -> Result<Self, ConfigError> {
        check_unit("period weight", period)?;
        check_unit("gochara weight", gochara)?;
        check_unit("bindu weight", bindu)?;
        let sum = period + gochara + bindu;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum { sum });
        }
        check_unit("boost", boost)?;
        check_unit("period threshold", thresholds.period)?;
        check_unit("gochara threshold", thresholds.gochara)?;
        check_unit("bindu threshold", thresholds.bindu)?;
        Ok(Self {
            period,
            gochara,
            bindu,
            boost,
            thresholds,
        })
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn gochara(&self) -> f64 {
        self.gochara
    }

    pub fn bindu(&self) -> f64 {
        self.bindu
    }

    pub fn boost(&self) -> f64 {
        self.boost
    }

    pub fn thresholds(&self) -> &BoostThresholds {
        &self.thresholds
    }
}

impl Default for ScoreWeights {
    /// 0.45 / 0.30 / 0.25 with a 0.15 boost at thresholds 0.6 / 0.7 / 0.6.
    fn default() -> Self {
        Self {
            period: 0.45,
            gochara: 0.30,
            bindu: 0.25,
            boost: 0.15,
            thresholds: BoostThresholds::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawScoreWeights {
    period: f64,
    gochara: f64,
    bindu: f64,
    boost: f64,
    #[serde(default)]
    thresholds: BoostThresholds,
}

impl TryFrom<RawScoreWeights> for ScoreWeights {
    type Error = ConfigError;

    fn try_from(raw: RawScoreWeights) -> Result<Self, Self::Error> {
        ScoreWeights::new(raw.period, raw.gochara, raw.bindu, raw.boost, raw.thresholds)
    }
}

impl From<ScoreWeights> for RawScoreWeights {
    fn from(w: ScoreWeights) -> Self {
        Self {
            period: w.period,
            gochara: w.gochara,
            bindu: w.bindu,
            boost: w.boost,
            thresholds: w.thresholds,
        }
    }
}
