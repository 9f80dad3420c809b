//! Table-driven oracles loaded from TOML.
//!
//! A fixture describes one subject and deterministic answers for all four
//! oracles: nested period spans, linear body motion, strength values (direct
//! or as strength-unit pairs) and per-sign bindu counts. Values are handed to
//! the engine as written, so a fixture can also carry out-of-domain values.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tripillar_core::domain::{BinduCounts, Body, Sign, SubjectChart};
use tripillar_core::oracle::{
    ActivePeriods, BinduTableProvider, OracleError, PeriodTimelineProvider, PositionProvider,
    RawPosition, RupaProvider, RupaRatioStrength, RupaStrength, StrengthProvider,
};

use crate::sampler::Oracles;

/// Errors from loading a fixture.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixture {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse fixture: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid fixture: {0}")]
    Invalid(String),
}

/// Natal placements used to choose the reference sign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSubject {
    pub id: String,
    #[serde(default)]
    pub moon_sign: Option<Sign>,
    pub ascendant_sign: Sign,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

/// A period span, half-open `[start, end)`, with optional nested spans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodSpan {
    pub body: Body,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default)]
    pub sub: Vec<PeriodSpan>,
}

impl PeriodSpan {
    fn covers(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Uniform motion from a known longitude at an epoch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LinearMotion {
    pub epoch: NaiveDateTime,
    /// Sidereal longitude in degrees at `epoch`.
    pub longitude: f64,
    /// Negative for retrograde motion.
    pub degrees_per_day: f64,
}

impl LinearMotion {
    pub fn longitude_at(&self, instant: NaiveDateTime) -> f64 {
        let days = (instant - self.epoch).num_seconds() as f64 / 86_400.0;
        (self.longitude + self.degrees_per_day * days).rem_euclid(360.0)
    }

    pub fn position_at(&self, instant: NaiveDateTime) -> RawPosition {
        // rem_euclid can round up to exactly 360.0 for tiny negative inputs
        let sign_index = ((self.longitude_at(instant) / 30.0).floor() as u8).min(11);
        RawPosition {
            sign_index,
            speed: self.degrees_per_day,
            retrograde: self.degrees_per_day < 0.0,
        }
    }
}

/// Optional hard override of the position oracle's answer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FixedPosition {
    pub sign_index: u8,
    #[serde(default)]
    pub retrograde: bool,
}

/// Strength values either given directly or derived from strength units.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthTable {
    Direct(BTreeMap<Body, i32>),
    Rupas(BTreeMap<Body, RupaStrength>),
}

impl Default for StrengthTable {
    fn default() -> Self {
        StrengthTable::Direct(BTreeMap::new())
    }
}

/// Per-sign bindu counts: one 12-entry row per body plus the aggregate row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BinduTable {
    #[serde(default)]
    pub per_body: BTreeMap<Body, Vec<u8>>,
    #[serde(default)]
    pub aggregate: Vec<u8>,
}

/// Deterministic oracles for one subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureOracles {
    pub subject: FixtureSubject,
    #[serde(default)]
    pub periods: Vec<PeriodSpan>,
    #[serde(default)]
    pub motion: BTreeMap<Body, LinearMotion>,
    #[serde(default)]
    pub fixed_positions: BTreeMap<Body, FixedPosition>,
    #[serde(default)]
    pub strength: StrengthTable,
    #[serde(default)]
    pub bindu: BinduTable,
}

impl FixtureOracles {
    pub fn from_toml(content: &str) -> Result<Self, FixtureError> {
        let fixture: Self = toml::from_str(content)?;
        fixture.validate()?;
        Ok(fixture)
    }

    pub fn from_file(path: &Path) -> Result<Self, FixtureError> {
        let content = std::fs::read_to_string(path).map_err(|source| FixtureError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Structural checks only. Value ranges are left to the engine.
    fn validate(&self) -> Result<(), FixtureError> {
        for (body, row) in &self.bindu.per_body {
            if row.len() != 12 {
                return Err(FixtureError::Invalid(format!(
                    "bindu row for {body} has {} entries, expected 12",
                    row.len()
                )));
            }
        }
        if !self.bindu.aggregate.is_empty() && self.bindu.aggregate.len() != 12 {
            return Err(FixtureError::Invalid(format!(
                "aggregate bindu row has {} entries, expected 12",
                self.bindu.aggregate.len()
            )));
        }
        fn check_spans(spans: &[PeriodSpan]) -> Result<(), FixtureError> {
            for span in spans {
                if span.start >= span.end {
                    return Err(FixtureError::Invalid(format!(
                        "{} period starting {} does not end after it starts",
                        span.body, span.start
                    )));
                }
                check_spans(&span.sub)?;
            }
            Ok(())
        }
        check_spans(&self.periods)
    }

    pub fn subject_chart(&self) -> SubjectChart {
        let s = &self.subject;
        SubjectChart::from_natal(
            s.id.clone(),
            s.moon_sign,
            s.ascendant_sign,
            s.timezone.clone(),
            s.latitude,
            s.longitude,
        )
    }

    /// Borrow this fixture as the oracle bundle for one run.
    pub fn oracles(&self) -> Oracles<'_> {
        Oracles {
            positions: self,
            periods: self,
            strengths: self,
            bindus: self,
        }
    }
}

impl PositionProvider for FixtureOracles {
    fn position(
        &self,
        body: Body,
        instant: NaiveDateTime,
        _timezone: &str,
        _latitude: f64,
        _longitude: f64,
    ) -> Result<RawPosition, OracleError> {
        if let Some(fixed) = self.fixed_positions.get(&body) {
            return Ok(RawPosition {
                sign_index: fixed.sign_index,
                speed: 0.0,
                retrograde: fixed.retrograde,
            });
        }
        self.motion
            .get(&body)
            .map(|m| m.position_at(instant))
            .ok_or_else(|| OracleError::new("position", format!("no motion data for {body}")))
    }
}

impl PeriodTimelineProvider for FixtureOracles {
    fn active_periods(&self, instant: NaiveDateTime) -> Result<Option<ActivePeriods>, OracleError> {
        Ok(self
            .periods
            .iter()
            .find(|span| span.covers(instant))
            .map(|span| ActivePeriods {
                primary: span.body,
                secondary: span.sub.iter().find(|sub| sub.covers(instant)).map(|sub| sub.body),
            }))
    }
}

struct RupaTable<'a>(&'a BTreeMap<Body, RupaStrength>);

impl RupaProvider for RupaTable<'_> {
    fn rupas(&self, body: Body, _subject: &SubjectChart) -> Result<Option<RupaStrength>, OracleError> {
        Ok(self.0.get(&body).copied())
    }
}

impl StrengthProvider for FixtureOracles {
    fn strength(&self, body: Body, subject: &SubjectChart) -> Result<i32, OracleError> {
        match &self.strength {
            StrengthTable::Direct(values) => values
                .get(&body)
                .copied()
                .ok_or_else(|| OracleError::new("strength", format!("no strength for {body}"))),
            StrengthTable::Rupas(rupas) => RupaRatioStrength::new(RupaTable(rupas)).strength(body, subject),
        }
    }
}

impl BinduTableProvider for FixtureOracles {
    fn score(&self, body: Body, sign: Sign) -> Result<BinduCounts, OracleError> {
        let index = usize::from(sign.index());
        let per_body = self
            .bindu
            .per_body
            .get(&body)
            .and_then(|row| row.get(index))
            .copied()
            .ok_or_else(|| OracleError::new("bindu", format!("no bindu row for {body}")))?;
        let aggregate = self
            .bindu
            .aggregate
            .get(index)
            .copied()
            .ok_or_else(|| OracleError::new("bindu", "no aggregate bindu row"))?;
        Ok(BinduCounts {
            per_body,
            aggregate,
        })
    }
}
