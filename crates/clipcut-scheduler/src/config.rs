//! The config surface (§6 "Config surface"): normative option names and
//! defaults, grouped the way the control protocol's `config` block groups
//! them.

use clipcut_core::{ClipcutError, Result};
use clipcut_effects::EffectsConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SilenceSettings {
    pub threshold_db: f32,
    pub min_duration_sec: f32,
    pub padding_sec: f64,
}

impl Default for SilenceSettings {
    fn default() -> Self {
        Self {
            threshold_db: -35.0,
            min_duration_sec: 0.5,
            padding_sec: 0.05,
        }
    }
}

impl SilenceSettings {
    pub fn validate(&self) -> Result<()> {
        if self.min_duration_sec < 0.0 {
            return Err(ClipcutError::Validation(format!(
                "silence.min_duration_sec must be >= 0, got {}",
                self.min_duration_sec
            )));
        }
        if self.padding_sec < 0.0 {
            return Err(ClipcutError::Validation(format!(
                "silence.padding_sec must be >= 0, got {}",
                self.padding_sec
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TakeSelectionSettings {
    pub min_score: f64,
    pub mode: TakeSelectionMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TakeSelectionMode {
    Deterministic,
    AiAssisted,
    AiFirst,
}

impl From<TakeSelectionMode> for clipcut_align::SelectionMode {
    fn from(mode: TakeSelectionMode) -> Self {
        match mode {
            TakeSelectionMode::Deterministic => clipcut_align::SelectionMode::Deterministic,
            TakeSelectionMode::AiAssisted => clipcut_align::SelectionMode::AiAssisted,
            TakeSelectionMode::AiFirst => clipcut_align::SelectionMode::AiFirst,
        }
    }
}

impl Default for TakeSelectionSettings {
    fn default() -> Self {
        Self {
            min_score: 60.0,
            mode: TakeSelectionMode::Deterministic,
        }
    }
}

impl TakeSelectionSettings {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.min_score) {
            return Err(ClipcutError::Validation(format!(
                "take_selection.min_score must be within [0, 100], got {}",
                self.min_score
            )));
        }
        Ok(())
    }
}

/// The union of every step's config block. Each step's input digest hashes
/// only the slice of this it actually reads (see `crate::digest`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub silence: SilenceSettings,
    pub effects: EffectsConfig,
    pub take_selection: TakeSelectionSettings,
}

impl PipelineConfig {
    /// Validate every sub-block at once (§1 "validated at the boundary").
    /// Called wherever a `PipelineConfig` crosses in from outside the
    /// engine: the CLI's `--config` loader and (once a transport exists)
    /// the `PipelineStepRequest` body.
    pub fn validate(&self) -> Result<()> {
        self.silence.validate()?;
        self.effects.validate()?;
        self.take_selection.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn negative_min_duration_sec_is_rejected() {
        let mut config = PipelineConfig::default();
        config.silence.min_duration_sec = -0.1;
        assert!(matches!(config.validate(), Err(ClipcutError::Validation(_))));
    }

    #[test]
    fn negative_padding_sec_is_rejected() {
        let mut config = PipelineConfig::default();
        config.silence.padding_sec = -1.0;
        assert!(matches!(config.validate(), Err(ClipcutError::Validation(_))));
    }

    #[test]
    fn zero_or_negative_threshold_multiplier_is_rejected() {
        let mut config = PipelineConfig::default();
        config.effects.threshold_multiplier = 0.0;
        assert!(matches!(config.validate(), Err(ClipcutError::Validation(_))));

        config.effects.threshold_multiplier = -2.0;
        assert!(matches!(config.validate(), Err(ClipcutError::Validation(_))));
    }

    #[test]
    fn out_of_range_min_score_is_rejected() {
        let mut config = PipelineConfig::default();
        config.take_selection.min_score = 150.0;
        assert!(matches!(config.validate(), Err(ClipcutError::Validation(_))));

        config.take_selection.min_score = -1.0;
        assert!(matches!(config.validate(), Err(ClipcutError::Validation(_))));
    }
}
