//! An in-memory `SemanticAnalyzer` test double, so `clipcut-align`'s
//! `ai-assisted`/`ai-first` paths and the scheduler's `semantic` step are
//! exercisable without a live provider.

use async_trait::async_trait;
use clipcut_core::{
    Caption, EnrichedCaption, ScriptLine, SemanticCategory, SemanticScores, SentencePosition,
};
use parking_lot::Mutex;

use crate::error::AiResult;
use crate::port::{
    captions_hash, EnrichmentMetadata, EnrichmentResult, SemanticAnalyzer, TakeDecision,
    TakeSelectionQuery, TakeSelectionResult,
};

/// Canned responses a test can queue up, or `None` to fall back to the
/// deterministic default behavior.
#[derive(Default)]
pub struct StubSemanticAnalyzer {
    enrichment_override: Mutex<Option<EnrichmentResult>>,
    take_selection_override: Mutex<Option<TakeSelectionResult>>,
}

impl StubSemanticAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enrichment(self, result: EnrichmentResult) -> Self {
        *self.enrichment_override.lock() = Some(result);
        self
    }

    pub fn with_take_selection(self, result: TakeSelectionResult) -> Self {
        *self.take_selection_override.lock() = Some(result);
        self
    }
}

#[async_trait]
impl SemanticAnalyzer for StubSemanticAnalyzer {
    async fn enrich_captions(
        &self,
        captions: &[Caption],
        _script: Option<&[ScriptLine]>,
    ) -> AiResult<EnrichmentResult> {
        if let Some(fixed) = self.enrichment_override.lock().clone() {
            return Ok(fixed);
        }

        let enriched: Vec<EnrichedCaption> = captions
            .iter()
            .enumerate()
            .map(|(i, caption)| EnrichedCaption {
                caption: caption.clone(),
                semantic: SemanticScores {
                    topic_relevance: 0.5,
                    emphasis_score: 0.5,
                    emotional_intensity: 0.5,
                    is_keyword: false,
                    category: SemanticCategory::Concept,
                },
                sentence_index: 0,
                sentence_position: if i == 0 {
                    SentencePosition::Start
                } else if i + 1 == captions.len() {
                    SentencePosition::End
                } else {
                    SentencePosition::Middle
                },
                whisper_confidence: caption.confidence.unwrap_or(0.8),
            })
            .collect();

        Ok(EnrichmentResult {
            enriched_captions: enriched,
            metadata: EnrichmentMetadata {
                main_topic: "unknown".to_string(),
                topic_keywords: Vec::new(),
                overall_tone: "neutral".to_string(),
                language: "es".to_string(),
                word_count: captions.len(),
                captions_hash: captions_hash(captions),
                analyzed_at: "stub".to_string(),
                processing_time_ms: 0,
                model: "stub-analyzer".to_string(),
            },
        })
    }

    async fn select_takes(&self, query: &TakeSelectionQuery) -> AiResult<TakeSelectionResult> {
        if let Some(fixed) = self.take_selection_override.lock().clone() {
            return Ok(fixed);
        }

        let decisions = query
            .segments
            .iter()
            .map(|s| TakeDecision {
                segment_id: s.segment_id,
                enabled: true,
                score: 70.0,
                reason: "stub default acceptance".to_string(),
                covers_script_lines: Vec::new(),
                best_take_segment_id: None,
                content_type: None,
            })
            .collect();

        Ok(TakeSelectionResult {
            decisions,
            summary: "stub summary".to_string(),
            warnings: Vec::new(),
        })
    }
}
