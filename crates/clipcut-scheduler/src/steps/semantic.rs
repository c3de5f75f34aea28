//! `semantic` (§4.G via the analyzer port, deps: `captions-raw`,
//! `silences`): classifies each silence as a sentence-boundary cut (safe to
//! remove) or a mid-sentence natural pause (keep), and reports the summary
//! counts §6 names for this step's artifact.

use clipcut_core::{
    ClipcutError, EnrichedCaption, Result, SentencePosition, SilenceRange, StepName, VideoId,
};

use crate::artifact_store::ArtifactStore;
use crate::context::ExecContext;
use crate::progress::{self, Sender};
use crate::steps::now_iso;

/// A silence is a sentence-boundary cut when the caption immediately
/// preceding it ends a sentence (`SentencePosition::End`); otherwise it
/// falls inside a sentence and must be preserved. A silence with no
/// preceding caption (leading silence) is treated as cuttable.
pub(crate) fn classify_silence(silence: &SilenceRange, enriched: &[EnrichedCaption]) -> Option<bool> {
    let silence_start_ms = (silence.start_sec * 1000.0).round() as clipcut_core::Ms;
    let preceding = enriched
        .iter()
        .filter(|c| c.caption.end_ms <= silence_start_ms)
        .max_by_key(|c| c.caption.end_ms);

    match preceding {
        Some(caption) => Some(caption.sentence_position == SentencePosition::End),
        None => Some(true),
    }
}

pub async fn exec(
    ctx: &ExecContext<'_>,
    store: &ArtifactStore,
    video_id: &VideoId,
    tx: &Sender,
) -> Result<serde_json::Value> {
    let analyzer = ctx
        .analyzer
        .ok_or_else(|| ClipcutError::Validation("semantic step requires a SemanticAnalyzer".to_string()))?;

    let captions_raw = store
        .load_artifact(video_id, StepName::CaptionsRaw)?
        .ok_or_else(|| ClipcutError::Internal("captions-raw artifact missing despite completed dep".into()))?;
    let captions: Vec<clipcut_core::Caption> = serde_json::from_value(captions_raw["tokens"].clone())?;

    let silences_artifact = store
        .load_artifact(video_id, StepName::Silences)?
        .ok_or_else(|| ClipcutError::Internal("silences artifact missing despite completed dep".into()))?;
    let silences: Vec<SilenceRange> = serde_json::from_value(silences_artifact["silences"].clone())?;

    progress::progress(tx, StepName::Semantic, 20, "enriching captions").await?;
    let enrichment = analyzer
        .enrich_captions(&captions, None)
        .await
        .map_err(|e| ClipcutError::Analysis {
            provider: "semantic-analyzer".to_string(),
            cause: e.to_string(),
        })?;

    progress::progress(tx, StepName::Semantic, 70, "classifying silences").await?;
    let enriched = &enrichment.enriched_captions;
    let sentence_count = enriched
        .iter()
        .map(|c| c.sentence_index)
        .max()
        .map(|m| m + 1)
        .unwrap_or(0);

    let mut semantic_cut_ms: clipcut_core::Ms = 0;
    let mut natural_pause_ms: clipcut_core::Ms = 0;
    let mut semantic_cut_count = 0usize;
    let mut natural_pause_count = 0usize;
    for silence in &silences {
        let duration_ms = (silence.duration_sec * 1000.0).round() as clipcut_core::Ms;
        match classify_silence(silence, enriched) {
            Some(true) => {
                semantic_cut_ms += duration_ms;
                semantic_cut_count += 1;
            }
            _ => {
                natural_pause_ms += duration_ms;
                natural_pause_count += 1;
            }
        }
    }

    let overall_confidence = if enriched.is_empty() {
        0.0
    } else {
        enriched.iter().map(|c| c.whisper_confidence).sum::<f64>() / enriched.len() as f64
    };

    progress::progress(tx, StepName::Semantic, 100, "done").await?;

    Ok(serde_json::json!({
        "sentenceCount": sentence_count,
        "semanticCutCount": semantic_cut_count,
        "naturalPauseCount": natural_pause_count,
        "totalCuttableDurationMs": semantic_cut_ms,
        "totalPreservedPauseDurationMs": natural_pause_ms,
        "overallConfidence": overall_confidence,
        "enrichedCaptions": enriched,
        "createdAt": now_iso(),
    }))
}
