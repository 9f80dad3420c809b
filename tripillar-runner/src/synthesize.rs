//! Synthesis entry point: sampling followed by window extraction and summary.
//!
//! Configuration and range errors abort before any oracle is consulted.
//! Window extraction and summary run single-threaded over the complete,
//! ordered timeline once sampling has finished.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

use tripillar_core::domain::SubjectChart;
use tripillar_core::oracle::DomainViolation;
use tripillar_core::result::SCHEMA_VERSION;
use tripillar_core::scoring::{
    ConfigError, GocharaScorer, GocharaTable, NestedPeriodBlend, PeriodStrengthScorer,
    ScoreWeights, TableGocharaScorer,
};
use tripillar_core::{extract_caution_windows, extract_peak_windows, summarize, SynthesisResult};

use crate::config::{SynthesisConfig, TransitBodyPolicy};
use crate::sampler::{sample_instants, Oracles, TimelineSampler};

/// Errors that abort a synthesis call.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// The date range is empty: start falls after end.
    #[error("empty range: start {start} is after end {end}")]
    EmptyRange { start: NaiveDate, end: NaiveDate },
    /// The date range cannot be stepped.
    #[error("empty range: step must be at least 1 day, got {step_days}")]
    InvalidStep { step_days: u32 },
    #[error("domain violation: {0}")]
    DomainViolation(#[from] DomainViolation),
}

/// Reject ranges that would produce no stepped instants.
pub fn check_range(start: NaiveDate, end: NaiveDate, step_days: u32) -> Result<(), SynthesisError> {
    if start > end {
        return Err(SynthesisError::EmptyRange { start, end });
    }
    if step_days < 1 {
        return Err(SynthesisError::InvalidStep { step_days });
    }
    Ok(())
}

/// A validated configuration with its scoring strategies built.
///
/// The Gochara and period strategies default to the table and nested-blend
/// scorers named by the config; either can be replaced with another
/// implementation of its trait.
pub struct Synthesizer {
    weights: ScoreWeights,
    gochara: Box<dyn GocharaScorer>,
    period: Box<dyn PeriodStrengthScorer>,
    step_days: u32,
    sample_time: chrono::NaiveTime,
    transit_body: TransitBodyPolicy,
    caution_threshold: u8,
    parallel: bool,
}

impl Synthesizer {
    pub fn from_config(config: &SynthesisConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            weights: config.weights,
            gochara: Box::new(TableGocharaScorer::new(GocharaTable::preset(config.gochara))),
            period: Box::new(NestedPeriodBlend::new(config.period_primary_share)?),
            step_days: config.step_days,
            sample_time: config.sample_time,
            transit_body: config.transit_body,
            caution_threshold: config.caution_threshold,
            parallel: config.parallel,
        })
    }

    pub fn with_gochara_scorer(mut self, scorer: Box<dyn GocharaScorer>) -> Self {
        self.gochara = scorer;
        self
    }

    pub fn with_period_scorer(mut self, scorer: Box<dyn PeriodStrengthScorer>) -> Self {
        self.period = scorer;
        self
    }

    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Synthesize the timeline for `subject` over `[start, end]`.
    pub fn run(
        &self,
        subject: &SubjectChart,
        start: NaiveDate,
        end: NaiveDate,
        oracles: &Oracles<'_>,
    ) -> Result<SynthesisResult, SynthesisError> {
        check_range(start, end, self.step_days)?;

        let instants = sample_instants(start, end, self.step_days, self.sample_time);
        let sampler = TimelineSampler {
            subject,
            oracles: *oracles,
            gochara: self.gochara.as_ref(),
            period: self.period.as_ref(),
            weights: &self.weights,
            transit_body: self.transit_body,
        };
        let timeline = sampler.sample_all(&instants, self.parallel)?;

        let peak_windows = extract_peak_windows(&timeline.points);
        let caution_windows = extract_caution_windows(&timeline.points, self.caution_threshold);
        let summary = summarize(
            &timeline.points,
            &peak_windows,
            &caution_windows,
            timeline.skipped.len(),
            subject.reference_sign,
        );

        info!(
            subject = %subject.id,
            %start,
            %end,
            gochara = self.gochara.name(),
            period = self.period.name(),
            points = timeline.points.len(),
            skipped = timeline.skipped.len(),
            peak_windows = peak_windows.len(),
            caution_windows = caution_windows.len(),
            "synthesis complete"
        );

        Ok(SynthesisResult {
            schema_version: SCHEMA_VERSION,
            subject: subject.clone(),
            start,
            end,
            step_days: self.step_days,
            points: timeline.points,
            peak_windows,
            caution_windows,
            skipped: timeline.skipped,
            summary,
        })
    }
}

/// Synthesize a timeline with the strategies named by `config`.
pub fn synthesize(
    subject: &SubjectChart,
    start: NaiveDate,
    end: NaiveDate,
    config: &SynthesisConfig,
    oracles: &Oracles<'_>,
) -> Result<SynthesisResult, SynthesisError> {
    Synthesizer::from_config(config)?.run(subject, start, end, oracles)
}
