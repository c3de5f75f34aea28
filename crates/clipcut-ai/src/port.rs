//! The `SemanticAnalyzer` port (§4.G) and the two operations it exposes:
//! captions enrichment (feeds the `semantic`/`effects-analysis` steps) and
//! take-selection advice (feeds `clipcut-align`'s `ai-assisted`/`ai-first`
//! modes, §4.F).

use async_trait::async_trait;
use clipcut_core::{Caption, Digest, EnrichedCaption, ScriptLine};
use serde::{Deserialize, Serialize};

use crate::error::AiResult;

/// The metadata block returned alongside enriched captions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentMetadata {
    pub main_topic: String,
    pub topic_keywords: Vec<String>,
    pub overall_tone: String,
    pub language: String,
    pub word_count: usize,
    pub captions_hash: Digest,
    pub analyzed_at: String,
    pub processing_time_ms: u64,
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentResult {
    pub enriched_captions: Vec<EnrichedCaption>,
    pub metadata: EnrichmentMetadata,
}

/// One `{segmentId, startMs, endMs, text}` tuple formatted into the
/// take-selection prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentTextWindow {
    pub segment_id: usize,
    pub start_ms: i64,
    pub end_ms: i64,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TakeSelectionQuery {
    pub segments: Vec<SegmentTextWindow>,
    pub script_lines: Vec<ScriptLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TakeDecision {
    pub segment_id: usize,
    pub enabled: bool,
    pub score: f64,
    pub reason: String,
    pub covers_script_lines: Vec<usize>,
    pub best_take_segment_id: Option<usize>,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TakeSelectionResult {
    pub decisions: Vec<TakeDecision>,
    pub summary: String,
    pub warnings: Vec<String>,
}

/// A narrow interface over an LLM-backed captions enricher and
/// take-selection advisor. The core never talks to a model directly — only
/// through this trait, so the provider is swappable and testable.
#[async_trait]
pub trait SemanticAnalyzer: Send + Sync {
    async fn enrich_captions(
        &self,
        captions: &[Caption],
        script: Option<&[ScriptLine]>,
    ) -> AiResult<EnrichmentResult>;

    async fn select_takes(&self, query: &TakeSelectionQuery) -> AiResult<TakeSelectionResult>;
}

/// A stable 64-bit content fingerprint of `text|startMs|endMs` for every
/// caption, joined by `|`, per §4.G.
pub fn captions_hash(captions: &[Caption]) -> Digest {
    Digest::of_parts(
        captions
            .iter()
            .map(|c| format!("{}|{}|{}", c.text, c.start_ms, c.end_ms)),
    )
}
