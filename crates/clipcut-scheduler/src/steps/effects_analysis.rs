//! `effects-analysis` (§4.G, deps: `captions-raw`): enriches the raw
//! transcript with semantic scores. This artifact's `enrichedCaptions` is
//! what `Pipeline::compute_effects` later feeds to the Effects Rule Engine
//! on every rule-set change — effects themselves are not a cached DAG step
//! (§3 "Effects are recomputed from Enriched Captions on every rule-set
//! change").

use clipcut_core::{ClipcutError, Result, StepName, VideoId};

use crate::artifact_store::ArtifactStore;
use crate::context::ExecContext;
use crate::progress::{self, Sender};
use crate::steps::now_iso;

pub async fn exec(
    ctx: &ExecContext<'_>,
    store: &ArtifactStore,
    video_id: &VideoId,
    tx: &Sender,
) -> Result<serde_json::Value> {
    let analyzer = ctx.analyzer.ok_or_else(|| {
        ClipcutError::Validation("effects-analysis step requires a SemanticAnalyzer".to_string())
    })?;

    let captions_raw = store
        .load_artifact(video_id, StepName::CaptionsRaw)?
        .ok_or_else(|| ClipcutError::Internal("captions-raw artifact missing despite completed dep".into()))?;
    let captions: Vec<clipcut_core::Caption> = serde_json::from_value(captions_raw["tokens"].clone())?;

    progress::progress(tx, StepName::EffectsAnalysis, 30, "enriching captions").await?;
    let started = std::time::Instant::now();
    let enrichment = analyzer
        .enrich_captions(&captions, None)
        .await
        .map_err(|e| ClipcutError::Analysis {
            provider: "semantic-analyzer".to_string(),
            cause: e.to_string(),
        })?;
    let processing_time_ms = started.elapsed().as_millis() as u64;

    progress::progress(tx, StepName::EffectsAnalysis, 100, "done").await?;

    let mut payload = serde_json::to_value(&enrichment.metadata)?;
    if let serde_json::Value::Object(map) = &mut payload {
        map.insert(
            "enrichedCount".to_string(),
            serde_json::json!(enrichment.enriched_captions.len()),
        );
        map.insert("processingTimeMs".to_string(), serde_json::json!(processing_time_ms));
        map.insert("createdAt".to_string(), serde_json::json!(now_iso()));
        map.insert(
            "enrichedCaptions".to_string(),
            serde_json::to_value(&enrichment.enriched_captions)?,
        );
    }
    Ok(payload)
}
