//! Property tests for sampling invariants over the demo fixture.
//!
//! 1. Every stepped instant yields exactly one point or one skip
//! 2. Points are strictly ordered and land on the step grid
//! 3. Parallel and sequential sampling agree

use std::path::PathBuf;

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use tripillar_runner::{sample_instants, synthesize, FixtureOracles, SynthesisConfig};

fn demo() -> FixtureOracles {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/demo_subject.toml");
    FixtureOracles::from_file(&path).unwrap()
}

fn arb_range() -> impl Strategy<Value = (NaiveDate, NaiveDate, u32)> {
    (0i64..300, 0i64..120, 1u32..15).prop_map(|(offset, len, step)| {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset);
        (start, start + Duration::days(len), step)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn every_instant_is_accounted_for((start, end, step) in arb_range()) {
        let fixture = demo();
        let config = SynthesisConfig { step_days: step, ..SynthesisConfig::default() };
        let result = synthesize(&fixture.subject_chart(), start, end, &config, &fixture.oracles())
            .unwrap();

        let expected = ((end - start).num_days() / i64::from(step) + 1) as usize;
        prop_assert_eq!(result.points.len() + result.skipped.len(), expected);
        prop_assert_eq!(
            sample_instants(start, end, step, config.sample_time).len(),
            expected
        );

        for pair in result.points.windows(2) {
            prop_assert!(pair[0].instant < pair[1].instant);
        }
        for p in &result.points {
            let offset = (p.instant.date() - start).num_days();
            prop_assert_eq!(offset % i64::from(step), 0);
            prop_assert!(p.instant.date() <= end);
            prop_assert!(p.success_probability <= 100);
            prop_assert!((0.0..=1.0).contains(&p.sub_scores.period));
            prop_assert!((0.0..=1.0).contains(&p.sub_scores.gochara));
            prop_assert!((0.0..=1.0).contains(&p.sub_scores.bindu));
        }
    }

    #[test]
    fn parallel_matches_sequential((start, end, step) in arb_range()) {
        let fixture = demo();
        let subject = fixture.subject_chart();
        let sequential = SynthesisConfig { step_days: step, ..SynthesisConfig::default() };
        let parallel = SynthesisConfig { parallel: true, ..sequential.clone() };

        let a = synthesize(&subject, start, end, &sequential, &fixture.oracles()).unwrap();
        let b = synthesize(&subject, start, end, &parallel, &fixture.oracles()).unwrap();
        prop_assert_eq!(a, b);
    }
}
