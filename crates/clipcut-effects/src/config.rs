//! Effects step configuration (§4.H inputs).

use clipcut_core::{ClipcutError, EffectRule, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivePreset {
    Balanced,
    Minimal,
    Aggressive,
    Custom,
}

/// `EffectsConfig` (§4.H): which rule set to run and how to tune it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectsConfig {
    pub active_preset: ActivePreset,
    #[serde(default)]
    pub custom_rules: Vec<EffectRule>,
    #[serde(default = "default_threshold_multiplier")]
    pub threshold_multiplier: f64,
    #[serde(default)]
    pub max_effects_per_minute: u32,
}

fn default_threshold_multiplier() -> f64 {
    1.0
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            active_preset: ActivePreset::Balanced,
            custom_rules: Vec::new(),
            threshold_multiplier: 1.0,
            max_effects_per_minute: 0,
        }
    }
}

impl EffectsConfig {
    /// Reject out-of-bounds user-supplied config (§1 "validated at the
    /// boundary"). `max_effects_per_minute: 0` means "uncapped" and is not
    /// itself an error.
    pub fn validate(&self) -> Result<()> {
        if self.threshold_multiplier <= 0.0 {
            return Err(ClipcutError::Validation(format!(
                "effects.threshold_multiplier must be > 0, got {}",
                self.threshold_multiplier
            )));
        }
        Ok(())
    }
}
