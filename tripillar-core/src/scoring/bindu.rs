//! Bindu scoring: normalizes the per-body and aggregate point counts.

use crate::domain::BinduCounts;
use crate::oracle::{MAX_AGGREGATE_BINDU, MAX_PER_BODY_BINDU};

/// Share of the per-body count in the blended score.
pub const PER_BODY_SHARE: f64 = 0.55;
/// Share of the aggregate count in the blended score.
pub const AGGREGATE_SHARE: f64 = 0.45;

/// Normalized bindu score in `[0, 1]`.
pub fn bindu_score(counts: BinduCounts) -> f64 {
    let per_body = (f64::from(counts.per_body) / f64::from(MAX_PER_BODY_BINDU)).clamp(0.0, 1.0);
    let aggregate =
        (f64::from(counts.aggregate) / f64::from(MAX_AGGREGATE_BINDU)).clamp(0.0, 1.0);
    (per_body * PER_BODY_SHARE + aggregate * AGGREGATE_SHARE).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(per_body: u8, aggregate: u8) -> BinduCounts {
        BinduCounts {
            per_body,
            aggregate,
        }
    }

    #[test]
    fn extremes() {
        assert_eq!(bindu_score(counts(0, 0)), 0.0);
        assert!((bindu_score(counts(8, 56)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn weighted_blend() {
        // 4/8 * 0.55 + 28/56 * 0.45 = 0.5
        assert!((bindu_score(counts(4, 28)) - 0.5).abs() < 1e-12);
        // 8/8 * 0.55 + 0 = 0.55
        assert!((bindu_score(counts(8, 0)) - 0.55).abs() < 1e-12);
    }

    #[test]
    fn per_body_count_is_more_diagnostic() {
        // Same relative fill, but the per-body signal weighs more
        assert!(bindu_score(counts(8, 0)) > bindu_score(counts(0, 56)));
    }
}
