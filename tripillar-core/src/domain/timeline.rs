//! Timeline records: sampled points, extracted windows, skipped samples.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::body::{Body, Sign};

/// Raw point counts for a body's transit sign, as returned by the bindu oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinduCounts {
    /// Points the body itself contributes to the sign (0..=8).
    pub per_body: u8,
    /// Aggregate points of the sign across all contributors (0..=56).
    pub aggregate: u8,
}

/// The three normalized signal scores, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub period: f64,
    pub gochara: f64,
    pub bindu: f64,
}

/// Coarse grading of a success probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityLevel {
    Difficult,
    Challenging,
    BelowAverage,
    Average,
    AboveAverage,
    Good,
    VeryGood,
    Excellent,
    Exceptional,
}

impl QualityLevel {
    pub fn from_probability(probability: u8) -> Self {
        match probability {
            90.. => QualityLevel::Exceptional,
            78..=89 => QualityLevel::Excellent,
            68..=77 => QualityLevel::VeryGood,
            58..=67 => QualityLevel::Good,
            48..=57 => QualityLevel::AboveAverage,
            38..=47 => QualityLevel::Average,
            28..=37 => QualityLevel::BelowAverage,
            18..=27 => QualityLevel::Challenging,
            _ => QualityLevel::Difficult,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QualityLevel::Exceptional => "Exceptional",
            QualityLevel::Excellent => "Excellent",
            QualityLevel::VeryGood => "Very Good",
            QualityLevel::Good => "Good",
            QualityLevel::AboveAverage => "Above Average",
            QualityLevel::Average => "Average",
            QualityLevel::BelowAverage => "Below Average",
            QualityLevel::Challenging => "Challenging",
            QualityLevel::Difficult => "Difficult",
        }
    }
}

/// One sampled instant of the synthesized timeline.
///
/// Built once by the sampler and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub instant: NaiveDateTime,
    pub primary_body: Body,
    pub secondary_body: Option<Body>,
    /// Body whose transit was classified (depends on the transit-body policy).
    pub transit_body: Body,
    pub transit_sign: Sign,
    /// House-count of `transit_sign` from the reference sign (1..=12).
    pub house: u8,
    pub bindu: BinduCounts,
    /// Blended period strength before normalization (0..=100).
    pub period_strength: u8,
    pub sub_scores: SubScores,
    /// Composite probability, 0..=100.
    pub success_probability: u8,
    pub peak_condition_met: bool,
    pub quality: QualityLevel,
    pub notes: Vec<String>,
}

/// A maximal contiguous run of peak-flagged points.
///
/// Period bodies are those active at the run's first point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub primary_body: Body,
    pub secondary_body: Option<Body>,
    pub max_probability: u8,
    pub samples: usize,
}

/// A maximal contiguous run of points below the caution threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CautionWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub primary_body: Body,
    pub min_probability: u8,
    pub samples: usize,
}

/// Why a stepped instant produced no point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    NoActivePeriod,
    OracleUnavailable { oracle: String, reason: String },
}

/// Diagnostic record for a stepped instant that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedSample {
    pub instant: NaiveDateTime,
    pub reason: SkipReason,
}

impl SkippedSample {
    pub fn note(&self) -> String {
        match &self.reason {
            SkipReason::NoActivePeriod => format!("{}: no active period", self.instant),
            SkipReason::OracleUnavailable { oracle, reason } => {
                format!("{}: {oracle} oracle unavailable ({reason})", self.instant)
            }
        }
    }
}
