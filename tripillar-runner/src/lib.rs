//! Tripillar Runner: sampling, orchestration and configuration.
//!
//! This crate builds on `tripillar-core` to provide:
//! - TOML-backed `SynthesisConfig` with canonical defaults
//! - The timeline sampler, sequential or on the rayon pool
//! - The `synthesize` entry point and the reusable `Synthesizer`
//! - Table-driven fixture oracles for the CLI and tests

pub mod config;
pub mod fixture;
pub mod sampler;
pub mod synthesize;

pub use config::{SynthesisConfig, TransitBodyPolicy};
pub use fixture::{FixtureError, FixtureOracles};
pub use sampler::{sample_instants, Oracles, Sample, SampledTimeline, TimelineSampler};
pub use synthesize::{check_range, synthesize, SynthesisError, Synthesizer};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn config_is_send_sync() {
        assert_send::<SynthesisConfig>();
        assert_sync::<SynthesisConfig>();
    }

    #[test]
    fn fixture_is_send_sync() {
        assert_send::<FixtureOracles>();
        assert_sync::<FixtureOracles>();
    }

    #[test]
    fn oracles_bundle_is_send_sync() {
        assert_send::<Oracles<'static>>();
        assert_sync::<Oracles<'static>>();
    }

    #[test]
    fn synthesizer_is_send_sync() {
        assert_send::<Synthesizer>();
        assert_sync::<Synthesizer>();
    }

    #[test]
    fn synthesis_error_is_send_sync() {
        assert_send::<SynthesisError>();
        assert_sync::<SynthesisError>();
    }
}
