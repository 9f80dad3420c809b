//! Period strength: blends the primary and nested period strengths.

use super::weights::{check_unit, ConfigError};

/// Combines primary and optional secondary strengths (each 0..=100) into one
/// blended strength in 0..=100.
pub trait PeriodStrengthScorer: Send + Sync {
    fn name(&self) -> &str;

    fn blend(&self, primary: u8, secondary: Option<u8>) -> u8;

    /// Blended strength normalized to `[0, 1]`.
    fn normalized(&self, primary: u8, secondary: Option<u8>) -> f64 {
        f64::from(self.blend(primary, secondary)) / 100.0
    }
}

/// Weighted blend where the longer-running primary period dominates and the
/// nested period modulates it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NestedPeriodBlend {
    primary_share: f64,
}

impl NestedPeriodBlend {
    pub const DEFAULT_PRIMARY_SHARE: f64 = 0.6;

    pub fn new(primary_share: f64) -> Result<Self, ConfigError> {
        check_unit("period primary share", primary_share)?;
        Ok(Self { primary_share })
    }

    pub fn primary_share(&self) -> f64 {
        self.primary_share
    }
}

impl Default for NestedPeriodBlend {
    fn default() -> Self {
        Self {
            primary_share: Self::DEFAULT_PRIMARY_SHARE,
        }
    }
}

impl PeriodStrengthScorer for NestedPeriodBlend {
    fn name(&self) -> &str {
        "nested_period_blend"
    }

    fn blend(&self, primary: u8, secondary: Option<u8>) -> u8 {
        match secondary {
            None => primary.min(100),
            Some(secondary) => {
                let blended = f64::from(primary) * self.primary_share
                    + f64::from(secondary) * (1.0 - self.primary_share);
                blended.round().clamp(0.0, 100.0) as u8
            }
        }
    }
}
