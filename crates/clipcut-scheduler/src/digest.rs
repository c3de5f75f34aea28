//! `digest = H(step, deps' digests, step's config)` (§4.I step 2).
//!
//! Each step hashes only the slice of `PipelineConfig` it actually reads,
//! so changing `effects.*` doesn't invalidate `silences`' cache entry.

use clipcut_core::{digest_value, Digest, Result, StepName};

use crate::config::PipelineConfig;

/// The config digest a given step's cache key depends on.
fn config_digest(step: StepName, config: &PipelineConfig) -> Result<Digest> {
    match step {
        StepName::Silences | StepName::Segments => digest_value(&config.silence),
        StepName::EffectsAnalysis => digest_value(&config.effects),
        StepName::TakeSelection => digest_value(&config.take_selection),
        StepName::Raw
        | StepName::CaptionsRaw
        | StepName::Semantic
        | StepName::Cut
        | StepName::Captions
        | StepName::Script
        | StepName::Rendered => digest_value(&()),
    }
}

/// Fold the step's name, its dependencies' stored input digests, and its
/// own config digest into one stable digest.
pub fn input_digest(step: StepName, dep_digests: &[Digest], config: &PipelineConfig) -> Result<Digest> {
    let mut acc = Digest::of_parts([step.as_str()]);
    for dep_digest in dep_digests {
        acc = acc.combine(dep_digest);
    }
    acc = acc.combine(&config_digest(step, config)?);
    Ok(acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_config_same_digest() {
        let config = PipelineConfig::default();
        let a = input_digest(StepName::Silences, &[], &config).unwrap();
        let b = input_digest(StepName::Silences, &[], &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn changing_unrelated_config_does_not_change_digest() {
        let mut config = PipelineConfig::default();
        let before = input_digest(StepName::Silences, &[], &config).unwrap();
        config.effects.threshold_multiplier = 2.0;
        let after = input_digest(StepName::Silences, &[], &config).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn changing_relevant_config_changes_digest() {
        let mut config = PipelineConfig::default();
        let before = input_digest(StepName::Silences, &[], &config).unwrap();
        config.silence.threshold_db = -20.0;
        let after = input_digest(StepName::Silences, &[], &config).unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn different_dep_digests_change_digest() {
        let config = PipelineConfig::default();
        let a = input_digest(StepName::Segments, &[Digest::of_bytes(b"x")], &config).unwrap();
        let b = input_digest(StepName::Segments, &[Digest::of_bytes(b"y")], &config).unwrap();
        assert_ne!(a, b);
    }
}
