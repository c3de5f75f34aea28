//! The data model (§3): entities shared by every pipeline component.
//!
//! Kept in one place the way the foundation crate holds the fundamental
//! types the rest of the workspace builds on — every other crate speaks
//! these shapes rather than inventing its own.

use crate::{Digest, Ms};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A maximal contiguous interval whose measured loudness is continuously
/// below a configured threshold for at least a configured minimum duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SilenceRange {
    pub start_sec: f64,
    pub end_sec: f64,
    pub duration_sec: f64,
}

/// A maximal contiguous "keep" interval in original time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub index: usize,
    pub start_ms: Ms,
    pub end_ms: Ms,
    pub duration_ms: Ms,
    pub enabled: bool,
}

impl Segment {
    pub fn new(index: usize, start_ms: Ms, end_ms: Ms) -> Self {
        Self {
            index,
            start_ms,
            end_ms,
            duration_ms: end_ms - start_ms,
            enabled: true,
        }
    }
}

/// A single transcript token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    pub text: String,
    pub start_ms: Ms,
    pub end_ms: Ms,
    pub confidence: Option<f64>,
}

/// A derived window of captions grouped for display, never crossing a
/// sentence boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionPage {
    pub tokens: Vec<Caption>,
    pub start_ms: Ms,
    pub end_ms: Ms,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Zoom,
    Highlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerStyle {
    Punch,
    Slow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptMarker {
    pub kind: MarkerKind,
    pub style: Option<MarkerStyle>,
    pub attached_word_index: Option<usize>,
}

/// One line of an author-supplied script, in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptLine {
    pub index: usize,
    pub text: String,
    pub markers: Vec<ScriptMarker>,
}

/// A candidate take of a script line: some segment whose transcript window
/// maps onto one or more script lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakeCandidate {
    pub segment_id: usize,
    pub script_line_indices: Vec<usize>,
    pub coverage_score: f64,
    pub is_repetition: bool,
    pub take_number: usize,
    pub total_takes: usize,
}

/// Per-criterion breakdown of a `PreselectionScore`. All fields in `[0,100]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub script_match: f64,
    pub whisper_confidence: f64,
    pub take_order: f64,
    pub completeness: f64,
    pub duration: f64,
}

/// Weights applied to a `ScoreBreakdown`; must sum to 1 once renormalised.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub script_match: f64,
    pub whisper_confidence: f64,
    pub take_order: f64,
    pub completeness: f64,
    pub duration: f64,
}

impl ScoreWeights {
    pub const DEFAULT: ScoreWeights = ScoreWeights {
        script_match: 0.30,
        whisper_confidence: 0.15,
        take_order: 0.15,
        completeness: 0.20,
        duration: 0.20,
    };
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Per-criterion human-readable explanation strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CriterionReasons {
    pub script_match: String,
    pub whisper_confidence: String,
    pub take_order: String,
    pub completeness: String,
    pub duration: String,
}

/// The per-segment preselection verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreselectionScore {
    pub segment_id: usize,
    pub total: f64,
    pub breakdown: ScoreBreakdown,
    pub weighted: ScoreBreakdown,
    pub reason: String,
    pub criterion_reasons: CriterionReasons,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentencePosition {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticCategory {
    Action,
    Concept,
    Emotion,
    Connector,
    Filler,
}

/// Per-token semantic scores supplied by the `SemanticAnalyzer` port. All
/// floats in `[0,1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SemanticScores {
    pub topic_relevance: f64,
    pub emphasis_score: f64,
    pub emotional_intensity: f64,
    pub is_keyword: bool,
    pub category: SemanticCategory,
}

/// A `Caption` augmented with semantic scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedCaption {
    pub caption: Caption,
    pub semantic: SemanticScores,
    pub sentence_index: usize,
    pub sentence_position: SentencePosition,
    pub whisper_confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonOperator {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

/// A scalar condition value: numeric, boolean, or string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

/// `{field (dot-path), operator, value}` — one leaf of a rule's condition
/// list, evaluated against a reflective view of `EnrichedCaption`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub operator: ComparisonOperator,
    pub value: ConditionValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConditionLogic {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectType {
    Zoom,
    Highlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectStyle {
    Punch,
    Slow,
}

/// The effect an `EffectRule` emits when its conditions hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectTemplate {
    #[serde(rename = "type")]
    pub kind: EffectType,
    pub style: Option<EffectStyle>,
    pub duration_ms: Option<Ms>,
}

/// A declarative, priority-ordered rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectRule {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    pub priority: i32,
    pub conditions: Vec<Condition>,
    pub condition_logic: ConditionLogic,
    pub effect: EffectTemplate,
}

/// One accepted effect in the final, conflict-resolved sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedEffect {
    #[serde(rename = "type")]
    pub kind: EffectType,
    pub style: Option<EffectStyle>,
    pub start_ms: Ms,
    pub end_ms: Option<Ms>,
    pub duration_ms: Option<Ms>,
    pub word: String,
    pub rule_id: String,
    pub confidence: f64,
}

impl AppliedEffect {
    /// The effective end time used by the 500ms gap rule: `endMs` for
    /// highlights, `startMs + durationMs` for zooms.
    pub fn effective_end_ms(&self) -> Ms {
        self.end_ms
            .unwrap_or_else(|| self.start_ms + self.duration_ms.unwrap_or(0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Running,
    Completed,
    Error,
}

/// Per-step state persisted in `PipelineStatus`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepState {
    pub status: StepStatus,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
    pub error: Option<String>,
    pub result_file_ref: Option<String>,
}

impl StepState {
    pub fn pending() -> Self {
        Self {
            status: StepStatus::Pending,
            started_at: None,
            completed_at: None,
            error: None,
            result_file_ref: None,
        }
    }
}

/// The persisted status document for one video's pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineStatus {
    pub video_id: String,
    pub filename: String,
    pub steps: HashMap<String, StepState>,
    pub updated_at: String,
    pub input_digests: HashMap<String, Digest>,
}
