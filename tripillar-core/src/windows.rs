//! Window extraction: maximal contiguous runs over the ordered timeline.
//!
//! Single pass with one open-run accumulator: a qualifying point opens a run
//! or extends the open one; a non-qualifying point closes it. A run still open
//! after the last point is emitted as well. The run's period bodies are taken
//! from its first point and never updated.
//!
//! Input must be the complete, instant-ordered point sequence. Extraction is
//! adjacency-dependent and runs after sampling has finished.

use crate::domain::{CautionWindow, PeakWindow, TimelinePoint};

/// Merge maximal runs of points satisfying `qualifies` in one pass.
///
/// `open` builds a window from the run's first point; `extend` folds every
/// further point of the same run into it.
fn merge_runs<W, Q, O, E>(points: &[TimelinePoint], qualifies: Q, open: O, extend: E) -> Vec<W>
where
    Q: Fn(&TimelinePoint) -> bool,
    O: Fn(&TimelinePoint) -> W,
    E: Fn(&mut W, &TimelinePoint),
{
    let mut windows = Vec::new();
    let mut current: Option<W> = None;

    for point in points {
        if qualifies(point) {
            match current.as_mut() {
                Some(window) => extend(window, point),
                None => current = Some(open(point)),
            }
        } else if let Some(window) = current.take() {
            windows.push(window);
        }
    }
    if let Some(window) = current {
        windows.push(window);
    }

    windows
}

/// Peak windows: runs where `peak_condition_met` holds.
pub fn extract_peak_windows(points: &[TimelinePoint]) -> Vec<PeakWindow> {
    merge_runs(
        points,
        |p| p.peak_condition_met,
        |p| PeakWindow {
            start: p.instant,
            end: p.instant,
            primary_body: p.primary_body,
            secondary_body: p.secondary_body,
            max_probability: p.success_probability,
            samples: 1,
        },
        |w, p| {
            w.end = p.instant;
            w.max_probability = w.max_probability.max(p.success_probability);
            w.samples += 1;
        },
    )
}

/// Caution windows: runs where the probability is below `threshold`.
pub fn extract_caution_windows(points: &[TimelinePoint], threshold: u8) -> Vec<CautionWindow> {
    merge_runs(
        points,
        |p| p.success_probability < threshold,
        |p| CautionWindow {
            start: p.instant,
            end: p.instant,
            primary_body: p.primary_body,
            min_probability: p.success_probability,
            samples: 1,
        },
        |w, p| {
            w.end = p.instant;
            w.min_probability = w.min_probability.min(p.success_probability);
            w.samples += 1;
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BinduCounts, Body, QualityLevel, Sign, SubScores};
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn day(i: usize) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            + Duration::days(i as i64)
    }

    fn point(i: usize, probability: u8, peak: bool, primary: Body) -> TimelinePoint {
        TimelinePoint {
            instant: day(i),
            primary_body: primary,
            secondary_body: None,
            transit_body: primary,
            transit_sign: Sign::Aries,
            house: 1,
            bindu: BinduCounts {
                per_body: 4,
                aggregate: 28,
            },
            period_strength: 50,
            sub_scores: SubScores {
                period: 0.5,
                gochara: 0.5,
                bindu: 0.5,
            },
            success_probability: probability,
            peak_condition_met: peak,
            quality: QualityLevel::from_probability(probability),
            notes: Vec::new(),
        }
    }

    #[test]
    fn empty_timeline_has_no_windows() {
        assert!(extract_peak_windows(&[]).is_empty());
        assert!(extract_caution_windows(&[], 40).is_empty());
    }

    #[test]
    fn interior_run_becomes_one_window() {
        // Samples 3..=6 (1-based) flagged
        let probs = [40, 82, 90, 85, 88, 91, 35, 50, 45, 60];
        let points: Vec<_> = probs
            .iter()
            .enumerate()
            .map(|(i, &p)| point(i, p, (2..=5).contains(&i), Body::Jupiter))
            .collect();

        let windows = extract_peak_windows(&points);
        assert_eq!(windows.len(), 1);
        let w = &windows[0];
        assert_eq!(w.start, day(2));
        assert_eq!(w.end, day(5));
        assert_eq!(w.max_probability, 91);
        assert_eq!(w.samples, 4);
    }

    #[test]
    fn trailing_open_run_is_emitted() {
        let points = vec![
            point(0, 50, false, Body::Sun),
            point(1, 80, true, Body::Sun),
            point(2, 85, true, Body::Sun),
        ];
        let windows = extract_peak_windows(&points);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].end, day(2));
        assert_eq!(windows[0].max_probability, 85);
    }

    #[test]
    fn separate_runs_stay_separate() {
        let flags = [true, true, false, true, false, false, true];
        let points: Vec<_> = flags
            .iter()
            .enumerate()
            .map(|(i, &f)| point(i, 80, f, Body::Venus))
            .collect();
        let windows = extract_peak_windows(&points);
        assert_eq!(windows.len(), 3);
        assert_eq!((windows[0].start, windows[0].end), (day(0), day(1)));
        assert_eq!((windows[1].start, windows[1].end), (day(3), day(3)));
        assert_eq!((windows[2].start, windows[2].end), (day(6), day(6)));
    }

    #[test]
    fn window_is_named_by_its_opening_point() {
        let points = vec![
            point(0, 80, true, Body::Mercury),
            point(1, 90, true, Body::Saturn),
        ];
        let windows = extract_peak_windows(&points);
        assert_eq!(windows[0].primary_body, Body::Mercury);
    }

    #[test]
    fn caution_windows_track_minimum() {
        let probs = [60, 30, 20, 35, 70, 10];
        let points: Vec<_> = probs
            .iter()
            .enumerate()
            .map(|(i, &p)| point(i, p, false, Body::Mars))
            .collect();
        let windows = extract_caution_windows(&points, 40);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].min_probability, 20);
        assert_eq!(windows[0].samples, 3);
        assert_eq!(windows[1].start, day(5));
        assert_eq!(windows[1].min_probability, 10);
    }
}
