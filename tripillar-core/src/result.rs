//! The finished product of one synthesis call, and its fingerprint.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{CautionWindow, PeakWindow, SkippedSample, SubjectChart, TimelinePoint};
use crate::summary::Summary;

/// Current schema version for serialized results.
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Deterministic content hash of a [`SynthesisResult`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResultHash(pub String);

impl fmt::Display for ResultHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything produced for one subject over one date range.
///
/// Points and both window lists are ordered by instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisResult {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub subject: SubjectChart,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub step_days: u32,
    pub points: Vec<TimelinePoint>,
    pub peak_windows: Vec<PeakWindow>,
    pub caution_windows: Vec<CautionWindow>,
    pub skipped: Vec<SkippedSample>,
    pub summary: Summary,
}

impl SynthesisResult {
    /// BLAKE3 over the canonical JSON encoding.
    ///
    /// Identical inputs with deterministic oracles yield identical hashes.
    pub fn fingerprint(&self) -> Result<ResultHash, serde_json::Error> {
        let json = serde_json::to_vec(self)?;
        Ok(ResultHash(blake3::hash(&json).to_hex().to_string()))
    }
}
