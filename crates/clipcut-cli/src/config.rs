//! Loads the config surface (§6) from a `--config` JSON file, or the
//! documented defaults when none is given.

use std::path::Path;

use anyhow::{Context, Result};
use clipcut_scheduler::PipelineConfig;

pub fn load(path: Option<&Path>) -> Result<PipelineConfig> {
    let config = match path {
        None => PipelineConfig::default(),
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parsing config file {}", path.display()))?
        }
    };
    config.validate().context("validating config")?;
    Ok(config)
}
