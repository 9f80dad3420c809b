//! Per-signal scorers and the compositor.
//!
//! Every scorer maps oracle output to a normalized sub-score in `[0, 1]`:
//! - period: blended strength of the active period bodies
//! - gochara: house-relative favorability of the transiting body
//! - bindu: per-body and aggregate point counts of the transit sign
//!
//! The compositor folds the three into a success probability.

pub mod bindu;
pub mod composite;
pub mod gochara;
pub mod house;
pub mod period;
pub mod weights;

pub use bindu::bindu_score;
pub use composite::{composite, peak_condition, Composite};
pub use gochara::{
    GocharaLevels, GocharaPreset, GocharaScorer, GocharaTable, HouseSets, TableGocharaScorer,
};
pub use house::house_from;
pub use period::{NestedPeriodBlend, PeriodStrengthScorer};
pub use weights::{BoostThresholds, ConfigError, ScoreWeights, WEIGHT_SUM_TOLERANCE};
