//! Summary statistics over a finished timeline.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{CautionWindow, PeakWindow, Sign, TimelinePoint};

pub const NO_DATA_TEXT: &str = "No timeline points generated.";

/// The highest-probability point of a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestPoint {
    pub instant: NaiveDateTime,
    pub success_probability: u8,
}

/// Aggregate statistics plus a one-line human-readable description.
///
/// `mean_probability` and `best` are `None` when there are no points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub text: String,
    pub sample_count: usize,
    pub skipped_count: usize,
    pub mean_probability: Option<u8>,
    pub peak_window_count: usize,
    pub caution_window_count: usize,
    pub best: Option<BestPoint>,
}

impl Summary {
    pub fn has_data(&self) -> bool {
        self.sample_count > 0
    }
}

/// Summarize a timeline. Ties for the best point go to the earliest instant.
pub fn summarize(
    points: &[TimelinePoint],
    peaks: &[PeakWindow],
    cautions: &[CautionWindow],
    skipped_count: usize,
    reference_sign: Sign,
) -> Summary {
    if points.is_empty() {
        return Summary {
            text: NO_DATA_TEXT.to_string(),
            sample_count: 0,
            skipped_count,
            mean_probability: None,
            peak_window_count: peaks.len(),
            caution_window_count: cautions.len(),
            best: None,
        };
    }

    let total: u64 = points.iter().map(|p| u64::from(p.success_probability)).sum();
    let mean = (total as f64 / points.len() as f64).round() as u8;

    // Strictly-greater keeps the earliest point on ties.
    let mut best = &points[0];
    for point in &points[1..] {
        if point.success_probability > best.success_probability {
            best = point;
        }
    }

    let text = format!(
        "Average success probability {mean}% with {} peak window(s). Peak {}% on {} (reference sign {reference_sign}).",
        peaks.len(),
        best.success_probability,
        best.instant.date(),
    );

    Summary {
        text,
        sample_count: points.len(),
        skipped_count,
        mean_probability: Some(mean),
        peak_window_count: peaks.len(),
        caution_window_count: cautions.len(),
        best: Some(BestPoint {
            instant: best.instant,
            success_probability: best.success_probability,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BinduCounts, Body, QualityLevel, SubScores};
    use chrono::{Duration, NaiveDate};

    fn point(i: i64, probability: u8) -> TimelinePoint {
        TimelinePoint {
            instant: NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
                + Duration::days(i),
            primary_body: Body::Moon,
            secondary_body: Some(Body::Venus),
            transit_body: Body::Moon,
            transit_sign: Sign::Taurus,
            house: 2,
            bindu: BinduCounts {
                per_body: 5,
                aggregate: 30,
            },
            period_strength: 60,
            sub_scores: SubScores {
                period: 0.6,
                gochara: 0.6,
                bindu: 0.6,
            },
            success_probability: probability,
            peak_condition_met: false,
            quality: QualityLevel::from_probability(probability),
            notes: Vec::new(),
        }
    }

    #[test]
    fn empty_timeline_yields_no_data() {
        let s = summarize(&[], &[], &[], 7, Sign::Aries);
        assert_eq!(s.text, NO_DATA_TEXT);
        assert!(!s.has_data());
        assert_eq!(s.mean_probability, None);
        assert_eq!(s.best, None);
        assert_eq!(s.skipped_count, 7);
    }

    #[test]
    fn mean_is_rounded() {
        // (50 + 51) / 2 = 50.5 -> 51
        let points = vec![point(0, 50), point(1, 51)];
        let s = summarize(&points, &[], &[], 0, Sign::Cancer);
        assert_eq!(s.mean_probability, Some(51));
    }

    #[test]
    fn best_point_tie_goes_to_earliest() {
        let points = vec![point(0, 40), point(1, 88), point(2, 70), point(3, 88)];
        let s = summarize(&points, &[], &[], 0, Sign::Cancer);
        let best = s.best.unwrap();
        assert_eq!(best.success_probability, 88);
        assert_eq!(best.instant, points[1].instant);
    }

    #[test]
    fn text_mentions_mean_peak_and_reference() {
        let points = vec![point(0, 60), point(1, 80)];
        let s = summarize(&points, &[], &[], 0, Sign::Cancer);
        assert_eq!(
            s.text,
            "Average success probability 70% with 0 peak window(s). Peak 80% on 2024-06-02 (reference sign Cancer)."
        );
    }
}
