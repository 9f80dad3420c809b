//! Timeline sampler: one TimelinePoint per stepped instant.
//!
//! For every instant the oracles are consulted in a fixed order: period
//! timeline, position of the transit body, strengths, bindu table. Each
//! sample reads only immutable inputs, so samples can be computed on the
//! rayon pool; results are collected by sample index and therefore come out
//! in instant order either way.
//!
//! An oracle that cannot answer skips the sample. An oracle that answers
//! outside its documented domain aborts the whole run.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rayon::prelude::*;
use tracing::{debug, warn};

use tripillar_core::domain::{
    Body, QualityLevel, SkipReason, SkippedSample, SubScores, SubjectChart, TimelinePoint,
};
use tripillar_core::oracle::{
    checked_bindu, checked_strength, ActivePeriods, BinduTableProvider, DomainViolation,
    OracleError, PeriodTimelineProvider, PositionProvider, StrengthProvider,
};
use tripillar_core::scoring::{
    bindu_score, composite, house_from, GocharaScorer, PeriodStrengthScorer, ScoreWeights,
};

use crate::config::TransitBodyPolicy;

/// The four external oracles one synthesis run consults.
#[derive(Clone, Copy)]
pub struct Oracles<'a> {
    pub positions: &'a dyn PositionProvider,
    pub periods: &'a dyn PeriodTimelineProvider,
    pub strengths: &'a dyn StrengthProvider,
    pub bindus: &'a dyn BinduTableProvider,
}

/// Outcome of sampling one instant.
#[derive(Debug, Clone, PartialEq)]
pub enum Sample {
    Point(TimelinePoint),
    Skipped(SkippedSample),
}

/// Points and skipped-sample diagnostics, both in instant order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampledTimeline {
    pub points: Vec<TimelinePoint>,
    pub skipped: Vec<SkippedSample>,
}

enum SampleError {
    Unavailable(OracleError),
    Domain(DomainViolation),
}

impl From<OracleError> for SampleError {
    fn from(e: OracleError) -> Self {
        SampleError::Unavailable(e)
    }
}

impl From<DomainViolation> for SampleError {
    fn from(e: DomainViolation) -> Self {
        SampleError::Domain(e)
    }
}

/// Every instant from `start` to `end` inclusive, `step_days` apart, at
/// `time` of day. Empty when `start > end` or `step_days == 0`.
pub fn sample_instants(
    start: NaiveDate,
    end: NaiveDate,
    step_days: u32,
    time: NaiveTime,
) -> Vec<NaiveDateTime> {
    if step_days == 0 || start > end {
        return Vec::new();
    }
    let step = Duration::days(i64::from(step_days));
    let mut instants = Vec::new();
    let mut date = start;
    while date <= end {
        instants.push(date.and_time(time));
        match date.checked_add_signed(step) {
            Some(next) => date = next,
            None => break,
        }
    }
    instants
}

/// Scores instants for one subject with one set of strategies.
pub struct TimelineSampler<'a> {
    pub subject: &'a SubjectChart,
    pub oracles: Oracles<'a>,
    pub gochara: &'a dyn GocharaScorer,
    pub period: &'a dyn PeriodStrengthScorer,
    pub weights: &'a ScoreWeights,
    pub transit_body: TransitBodyPolicy,
}

impl TimelineSampler<'_> {
    /// Sample every instant. `parallel` moves the per-sample work onto the
    /// rayon pool; the output is identical either way.
    pub fn sample_all(
        &self,
        instants: &[NaiveDateTime],
        parallel: bool,
    ) -> Result<SampledTimeline, DomainViolation> {
        let samples: Vec<Sample> = if parallel {
            instants
                .par_iter()
                .map(|&instant| self.sample_at(instant))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            instants
                .iter()
                .map(|&instant| self.sample_at(instant))
                .collect::<Result<Vec<_>, _>>()?
        };

        let mut timeline = SampledTimeline::default();
        for sample in samples {
            match sample {
                Sample::Point(point) => timeline.points.push(point),
                Sample::Skipped(skipped) => timeline.skipped.push(skipped),
            }
        }
        Ok(timeline)
    }

    /// Sample one instant.
    pub fn sample_at(&self, instant: NaiveDateTime) -> Result<Sample, DomainViolation> {
        let periods = match self.oracles.periods.active_periods(instant) {
            Ok(Some(periods)) => periods,
            Ok(None) => {
                debug!(%instant, "no active period; skipping sample");
                return Ok(Sample::Skipped(SkippedSample {
                    instant,
                    reason: SkipReason::NoActivePeriod,
                }));
            }
            Err(e) => return Ok(Sample::Skipped(unavailable(instant, e))),
        };

        match self.build_point(instant, periods) {
            Ok(point) => Ok(Sample::Point(point)),
            Err(SampleError::Unavailable(e)) => Ok(Sample::Skipped(unavailable(instant, e))),
            Err(SampleError::Domain(violation)) => {
                warn!(%instant, error = %violation, "oracle domain violation");
                Err(violation)
            }
        }
    }

    fn transit_body(&self, periods: ActivePeriods) -> Body {
        match self.transit_body {
            TransitBodyPolicy::PrimaryPeriod => periods.primary,
            TransitBodyPolicy::InnermostPeriod => periods.secondary.unwrap_or(periods.primary),
        }
    }

    fn build_point(
        &self,
        instant: NaiveDateTime,
        periods: ActivePeriods,
    ) -> Result<TimelinePoint, SampleError> {
        let subject = self.subject;
        let transit_body = self.transit_body(periods);

        let position = self.oracles.positions.position(
            transit_body,
            instant,
            &subject.timezone,
            subject.latitude,
            subject.longitude,
        )?;
        let transit_sign = position.sign(transit_body)?;
        let house = house_from(subject.reference_sign, transit_sign);
        let gochara = self.gochara.score(transit_body, house);

        let primary_strength = checked_strength(
            periods.primary,
            self.oracles.strengths.strength(periods.primary, subject)?,
        )?;
        let secondary_strength = match periods.secondary {
            Some(body) => Some(checked_strength(
                body,
                self.oracles.strengths.strength(body, subject)?,
            )?),
            None => None,
        };
        let period_strength = self.period.blend(primary_strength, secondary_strength);

        let bindu = checked_bindu(
            transit_body,
            transit_sign,
            self.oracles.bindus.score(transit_body, transit_sign)?,
        )?;

        let sub_scores = SubScores {
            period: f64::from(period_strength) / 100.0,
            gochara,
            bindu: bindu_score(bindu),
        };
        let scored = composite(&sub_scores, self.weights);

        let mut notes = vec![
            match periods.secondary {
                Some(secondary) => format!("Period {}/{secondary}", periods.primary),
                None => format!("Period {}", periods.primary),
            },
            format!(
                "{transit_body} transits {transit_sign} (house {house} from {})",
                subject.reference_sign
            ),
        ];
        if position.retrograde {
            notes.push(format!("{transit_body} retrograde"));
        }
        notes.push(format!(
            "Bindu {} own, {} aggregate",
            bindu.per_body, bindu.aggregate
        ));
        let thresholds = self.weights.thresholds();
        if sub_scores.bindu >= thresholds.bindu {
            notes.push("high bindu zone".to_string());
        }
        if sub_scores.period >= thresholds.period {
            notes.push("favorable period strength".to_string());
        }
        if sub_scores.gochara >= thresholds.gochara {
            notes.push("strong gochara".to_string());
        }

        Ok(TimelinePoint {
            instant,
            primary_body: periods.primary,
            secondary_body: periods.secondary,
            transit_body,
            transit_sign,
            house,
            bindu,
            period_strength,
            sub_scores,
            success_probability: scored.success_probability,
            peak_condition_met: scored.peak_condition_met,
            quality: QualityLevel::from_probability(scored.success_probability),
            notes,
        })
    }
}

fn unavailable(instant: NaiveDateTime, e: OracleError) -> SkippedSample {
    debug!(%instant, oracle = e.oracle, reason = %e.reason, "oracle unavailable; skipping sample");
    SkippedSample {
        instant,
        reason: SkipReason::OracleUnavailable {
            oracle: e.oracle.to_string(),
            reason: e.reason,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tripillar_core::domain::{BinduCounts, Sign};
    use tripillar_core::oracle::RawPosition;
    use tripillar_core::scoring::{NestedPeriodBlend, TableGocharaScorer};

    /// Constant oracles; each answer can be overridden per test.
    struct Fixed {
        periods: Option<ActivePeriods>,
        sign_index: u8,
        retrograde: bool,
        strength: i32,
        bindu: BinduCounts,
        position_down: bool,
    }

    impl Default for Fixed {
        fn default() -> Self {
            Self {
                periods: Some(ActivePeriods {
                    primary: Body::Jupiter,
                    secondary: Some(Body::Venus),
                }),
                // Reference Aries, Jupiter in Leo: house 5, favorable
                sign_index: 4,
                retrograde: false,
                strength: 80,
                bindu: BinduCounts {
                    per_body: 6,
                    aggregate: 35,
                },
                position_down: false,
            }
        }
    }

    impl PositionProvider for Fixed {
        fn position(
            &self,
            _body: Body,
            _instant: NaiveDateTime,
            _timezone: &str,
            _latitude: f64,
            _longitude: f64,
        ) -> Result<RawPosition, OracleError> {
            if self.position_down {
                return Err(OracleError::new("position", "ephemeris gap"));
            }
            Ok(RawPosition {
                sign_index: self.sign_index,
                speed: if self.retrograde { -0.1 } else { 0.1 },
                retrograde: self.retrograde,
            })
        }
    }

    impl PeriodTimelineProvider for Fixed {
        fn active_periods(
            &self,
            _instant: NaiveDateTime,
        ) -> Result<Option<ActivePeriods>, OracleError> {
            Ok(self.periods)
        }
    }

    impl StrengthProvider for Fixed {
        fn strength(&self, _body: Body, _subject: &SubjectChart) -> Result<i32, OracleError> {
            Ok(self.strength)
        }
    }

    impl BinduTableProvider for Fixed {
        fn score(&self, _body: Body, _sign: Sign) -> Result<BinduCounts, OracleError> {
            Ok(self.bindu)
        }
    }

    fn noon(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn sample_with(fixed: &Fixed, policy: TransitBodyPolicy) -> Result<Sample, DomainViolation> {
        let subject = SubjectChart::new("t", Sign::Aries, "UTC", 0.0, 0.0);
        let gochara = TableGocharaScorer::default();
        let period = NestedPeriodBlend::default();
        let weights = ScoreWeights::default();
        let sampler = TimelineSampler {
            subject: &subject,
            oracles: Oracles {
                positions: fixed,
                periods: fixed,
                strengths: fixed,
                bindus: fixed,
            },
            gochara: &gochara,
            period: &period,
            weights: &weights,
            transit_body: policy,
        };
        sampler.sample_at(noon(2024, 3, 1))
    }

    fn point(sample: Sample) -> TimelinePoint {
        match sample {
            Sample::Point(p) => p,
            Sample::Skipped(s) => panic!("expected a point, got skip: {}", s.note()),
        }
    }

    #[test]
    fn instants_are_inclusive_and_stepped() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let noon_time = NaiveTime::from_hms_opt(12, 0, 0).unwrap();

        let daily = sample_instants(start, end, 1, noon_time);
        assert_eq!(daily.len(), 10);
        assert_eq!(daily[0], noon(2024, 1, 1));
        assert_eq!(daily[9], noon(2024, 1, 10));

        // 1, 4, 7, 10
        let every_third = sample_instants(start, end, 3, noon_time);
        assert_eq!(every_third.len(), 4);
        assert_eq!(every_third[3], noon(2024, 1, 10));

        assert_eq!(sample_instants(start, start, 7, noon_time), vec![noon(2024, 1, 1)]);
        assert!(sample_instants(end, start, 1, noon_time).is_empty());
        assert!(sample_instants(start, end, 0, noon_time).is_empty());
    }

    #[test]
    fn full_point_is_scored() {
        let p = point(sample_with(&Fixed::default(), TransitBodyPolicy::PrimaryPeriod).unwrap());
        assert_eq!(p.primary_body, Body::Jupiter);
        assert_eq!(p.secondary_body, Some(Body::Venus));
        assert_eq!(p.transit_body, Body::Jupiter);
        assert_eq!(p.transit_sign, Sign::Leo);
        assert_eq!(p.house, 5);
        assert_eq!(p.period_strength, 80);
        assert_eq!(p.sub_scores.gochara, 1.0);
        // 0.8*0.45 + 1.0*0.30 + (0.75*0.55 + 0.625*0.45)*0.25 + 0.15 boost
        assert!(p.peak_condition_met);
        assert_eq!(p.success_probability, 98);
        assert_eq!(p.quality, QualityLevel::Exceptional);
        assert_eq!(p.notes[0], "Period Jupiter/Venus");
        assert_eq!(p.notes[1], "Jupiter transits Leo (house 5 from Aries)");
        assert!(p.notes.iter().any(|n| n == "strong gochara"));
        assert!(p.notes.iter().any(|n| n == "favorable period strength"));
        assert!(p.notes.iter().any(|n| n == "high bindu zone"));
    }

    #[test]
    fn innermost_policy_transits_secondary_body() {
        // Venus in Leo from Aries: house 5, favorable for Venus too
        let p = point(sample_with(&Fixed::default(), TransitBodyPolicy::InnermostPeriod).unwrap());
        assert_eq!(p.transit_body, Body::Venus);

        let fixed = Fixed {
            periods: Some(ActivePeriods {
                primary: Body::Saturn,
                secondary: None,
            }),
            ..Fixed::default()
        };
        let p = point(sample_with(&fixed, TransitBodyPolicy::InnermostPeriod).unwrap());
        assert_eq!(p.transit_body, Body::Saturn);
        assert_eq!(p.notes[0], "Period Saturn");
    }

    #[test]
    fn retrograde_is_noted() {
        let fixed = Fixed {
            retrograde: true,
            ..Fixed::default()
        };
        let p = point(sample_with(&fixed, TransitBodyPolicy::PrimaryPeriod).unwrap());
        assert!(p.notes.iter().any(|n| n == "Jupiter retrograde"));
    }

    #[test]
    fn no_active_period_skips() {
        let fixed = Fixed {
            periods: None,
            ..Fixed::default()
        };
        let sample = sample_with(&fixed, TransitBodyPolicy::PrimaryPeriod).unwrap();
        assert!(matches!(
            sample,
            Sample::Skipped(SkippedSample {
                reason: SkipReason::NoActivePeriod,
                ..
            })
        ));
    }

    #[test]
    fn unavailable_oracle_skips() {
        let fixed = Fixed {
            position_down: true,
            ..Fixed::default()
        };
        match sample_with(&fixed, TransitBodyPolicy::PrimaryPeriod).unwrap() {
            Sample::Skipped(s) => assert_eq!(
                s.reason,
                SkipReason::OracleUnavailable {
                    oracle: "position".to_string(),
                    reason: "ephemeris gap".to_string()
                }
            ),
            Sample::Point(_) => panic!("expected skip"),
        }
    }

    #[test]
    fn out_of_domain_values_abort() {
        let bad_sign = Fixed {
            sign_index: 12,
            ..Fixed::default()
        };
        assert!(matches!(
            sample_with(&bad_sign, TransitBodyPolicy::PrimaryPeriod),
            Err(DomainViolation::SignIndex { value: 12, .. })
        ));

        let bad_strength = Fixed {
            strength: 140,
            ..Fixed::default()
        };
        assert!(matches!(
            sample_with(&bad_strength, TransitBodyPolicy::PrimaryPeriod),
            Err(DomainViolation::Strength { value: 140, .. })
        ));

        let bad_bindu = Fixed {
            bindu: BinduCounts {
                per_body: 3,
                aggregate: 60,
            },
            ..Fixed::default()
        };
        assert!(matches!(
            sample_with(&bad_bindu, TransitBodyPolicy::PrimaryPeriod),
            Err(DomainViolation::AggregateBindu { value: 60, .. })
        ));
    }
}
