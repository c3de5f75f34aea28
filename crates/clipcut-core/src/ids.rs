//! Identifiers shared by every pipeline component.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, stable identifier for a video. Immutable for the lifetime of a
/// pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VideoId(pub String);

impl VideoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for VideoId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for VideoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Name of a step in the pipeline's dependency DAG. Kept as a plain enum
/// rather than a string so the DAG edges below are exhaustively checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepName {
    Raw,
    Silences,
    CaptionsRaw,
    Segments,
    Semantic,
    EffectsAnalysis,
    Cut,
    Captions,
    Script,
    TakeSelection,
    Rendered,
}

impl StepName {
    /// All steps, in a fixed declaration order (not topological order).
    pub const ALL: [StepName; 11] = [
        StepName::Raw,
        StepName::Silences,
        StepName::CaptionsRaw,
        StepName::Segments,
        StepName::Semantic,
        StepName::EffectsAnalysis,
        StepName::Cut,
        StepName::Captions,
        StepName::Script,
        StepName::TakeSelection,
        StepName::Rendered,
    ];

    /// The step's direct dependencies, per the DAG in the orchestration
    /// design.
    pub fn deps(self) -> &'static [StepName] {
        match self {
            StepName::Raw => &[],
            StepName::Silences => &[StepName::Raw],
            StepName::CaptionsRaw => &[StepName::Raw],
            StepName::Segments => &[StepName::Silences],
            StepName::Semantic => &[StepName::CaptionsRaw, StepName::Silences],
            StepName::EffectsAnalysis => &[StepName::CaptionsRaw],
            StepName::Cut => &[StepName::Segments],
            StepName::Captions => &[StepName::Cut],
            StepName::Script => &[StepName::Captions],
            StepName::TakeSelection => &[StepName::Captions],
            StepName::Rendered => &[StepName::TakeSelection],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StepName::Raw => "raw",
            StepName::Silences => "silences",
            StepName::CaptionsRaw => "captions-raw",
            StepName::Segments => "segments",
            StepName::Semantic => "semantic",
            StepName::EffectsAnalysis => "effects-analysis",
            StepName::Cut => "cut",
            StepName::Captions => "captions",
            StepName::Script => "script",
            StepName::TakeSelection => "take-selection",
            StepName::Rendered => "rendered",
        }
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_has_no_deps() {
        assert!(StepName::Raw.deps().is_empty());
    }

    #[test]
    fn rendered_depends_on_take_selection() {
        assert_eq!(StepName::Rendered.deps(), &[StepName::TakeSelection]);
    }

    #[test]
    fn every_step_is_in_all() {
        assert_eq!(StepName::ALL.len(), 11);
    }
}
