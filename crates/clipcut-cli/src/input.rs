//! File readers for the externally-supplied inputs `ExecContext` needs:
//! transcripts from the out-of-scope STT adapter (§1), the author's script
//! text, and editor segment overrides.

use std::path::Path;

use anyhow::{Context, Result};
use clipcut_core::{Caption, Segment};

pub fn read_captions(path: &Path) -> Result<Vec<Caption>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading captions file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing captions file {}", path.display()))
}

pub fn read_script(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading script file {}", path.display()))
}

pub fn read_segment_overrides(path: &Path) -> Result<Vec<Segment>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading segment overrides file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("parsing segment overrides file {}", path.display()))
}
