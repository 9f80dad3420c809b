//! Compositor: weighted sum of the three sub-scores plus the alignment boost.
//!
//! Two stages: a linear weighted sum, then a discrete boost when every
//! sub-score meets its threshold at once. Weight validity is established
//! when [`ScoreWeights`] is built and is not re-checked here.

use serde::{Deserialize, Serialize};

use super::weights::ScoreWeights;
use crate::domain::SubScores;

/// Result of compositing one sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Composite {
    /// Weighted sum before the boost.
    pub base: f64,
    /// Boosted and clamped to `[0, 1]`.
    pub composite: f64,
    pub success_probability: u8,
    pub peak_condition_met: bool,
}

/// True when every sub-score meets its boost threshold.
pub fn peak_condition(sub: &SubScores, weights: &ScoreWeights) -> bool {
    let t = weights.thresholds();
    sub.period >= t.period && sub.gochara >= t.gochara && sub.bindu >= t.bindu
}

pub fn composite(sub: &SubScores, weights: &ScoreWeights) -> Composite {
    let base = sub.period * weights.period()
        + sub.gochara * weights.gochara()
        + sub.bindu * weights.bindu();
    let peak_condition_met = peak_condition(sub, weights);
    let boost = if peak_condition_met { weights.boost() } else { 0.0 };
    let composite = (base + boost).clamp(0.0, 1.0);

    Composite {
        base,
        composite,
        success_probability: (composite * 100.0).round() as u8,
        peak_condition_met,
    }
}
