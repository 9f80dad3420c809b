//! Oracle contracts: external computations the engine consumes as black boxes.
//!
//! Oracles report raw values in their documented domains. The engine checks
//! every value it receives and reports out-of-domain values as a
//! [`DomainViolation`] instead of clamping them. An oracle that cannot answer
//! returns [`OracleError`], which the sampler treats as a skipped sample.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{BinduCounts, Body, Sign, SubjectChart};

/// Largest per-body point count a sign can hold.
pub const MAX_PER_BODY_BINDU: u8 = 8;
/// Largest aggregate point count a sign can hold.
pub const MAX_AGGREGATE_BINDU: u8 = 56;
/// Upper bound of an oracle strength.
pub const MAX_STRENGTH: i32 = 100;

/// An oracle could not answer for this instant or body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{oracle} oracle unavailable: {reason}")]
pub struct OracleError {
    pub oracle: &'static str,
    pub reason: String,
}

impl OracleError {
    pub fn new(oracle: &'static str, reason: impl Into<String>) -> Self {
        Self {
            oracle,
            reason: reason.into(),
        }
    }
}

/// An oracle broke its documented output bounds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainViolation {
    #[error("position oracle returned sign index {value} for {body} (expected 0..=11)")]
    SignIndex { body: Body, value: u8 },
    #[error("strength oracle returned {value} for {body} (expected 0..=100)")]
    Strength { body: Body, value: i32 },
    #[error(
        "bindu oracle returned per-body count {value} for {body} in {sign} (expected 0..=8)"
    )]
    PerBodyBindu { body: Body, sign: Sign, value: u8 },
    #[error(
        "bindu oracle returned aggregate count {value} for {sign} (expected 0..=56)"
    )]
    AggregateBindu { body: Body, sign: Sign, value: u8 },
}

/// Raw position report for one body at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPosition {
    /// Sign index, 0..=11.
    pub sign_index: u8,
    /// Daily motion in degrees (negative when retrograde).
    pub speed: f64,
    pub retrograde: bool,
}

impl RawPosition {
    /// Typed sign, or a [`DomainViolation`] when the index is out of bounds.
    pub fn sign(&self, body: Body) -> Result<Sign, DomainViolation> {
        Sign::from_index(self.sign_index).ok_or(DomainViolation::SignIndex {
            body,
            value: self.sign_index,
        })
    }
}

/// Period bodies active at an instant: the outer period and, when one is
/// running, the nested period inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePeriods {
    pub primary: Body,
    pub secondary: Option<Body>,
}

pub trait PositionProvider: Send + Sync {
    fn position(
        &self,
        body: Body,
        instant: NaiveDateTime,
        timezone: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<RawPosition, OracleError>;
}

pub trait PeriodTimelineProvider: Send + Sync {
    /// `Ok(None)` when no period covers `instant`.
    fn active_periods(&self, instant: NaiveDateTime) -> Result<Option<ActivePeriods>, OracleError>;
}

pub trait StrengthProvider: Send + Sync {
    /// Strength of `body` in the subject's chart, documented as 0..=100.
    fn strength(&self, body: Body, subject: &SubjectChart) -> Result<i32, OracleError>;
}

pub trait BinduTableProvider: Send + Sync {
    fn score(&self, body: Body, sign: Sign) -> Result<BinduCounts, OracleError>;
}

/// Check a strength report against its documented bounds.
pub fn checked_strength(body: Body, value: i32) -> Result<u8, DomainViolation> {
    if (0..=MAX_STRENGTH).contains(&value) {
        Ok(value as u8)
    } else {
        Err(DomainViolation::Strength { body, value })
    }
}

/// Check a bindu report against its documented bounds.
pub fn checked_bindu(
    body: Body,
    sign: Sign,
    counts: BinduCounts,
) -> Result<BinduCounts, DomainViolation> {
    if counts.per_body > MAX_PER_BODY_BINDU {
        return Err(DomainViolation::PerBodyBindu {
            body,
            sign,
            value: counts.per_body,
        });
    }
    if counts.aggregate > MAX_AGGREGATE_BINDU {
        return Err(DomainViolation::AggregateBindu {
            body,
            sign,
            value: counts.aggregate,
        });
    }
    Ok(counts)
}

/// Strength-unit totals for a body: what it has and what it needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RupaStrength {
    pub total: f64,
    pub required: f64,
}

/// Source of raw strength-unit totals, converted to 0..=100 by [`RupaRatioStrength`].
pub trait RupaProvider: Send + Sync {
    fn rupas(&self, body: Body, subject: &SubjectChart) -> Result<Option<RupaStrength>, OracleError>;
}

/// Strength oracle backed by the ratio of held to required strength units.
///
/// The ratio is clamped to `[0.4, 1.4]` and mapped linearly onto `[58, 128]`
/// then capped at 100, so a body exactly at its requirement scores 100 and
/// the weakest scores 58. Bodies without data, or with a non-positive
/// requirement, score a neutral 50.
pub struct RupaRatioStrength<P> {
    inner: P,
}

impl<P: RupaProvider> RupaRatioStrength<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }

    pub fn ratio_to_strength(rupas: Option<RupaStrength>) -> i32 {
        match rupas {
            Some(r) if r.required > 0.0 => {
                let ratio = (r.total / r.required).clamp(0.4, 1.4);
                ((ratio * 70.0 + 30.0).round() as i32).clamp(0, MAX_STRENGTH)
            }
            _ => 50,
        }
    }
}

impl<P: RupaProvider> StrengthProvider for RupaRatioStrength<P> {
    fn strength(&self, body: Body, subject: &SubjectChart) -> Result<i32, OracleError> {
        Ok(Self::ratio_to_strength(self.inner.rupas(body, subject)?))
    }
}
