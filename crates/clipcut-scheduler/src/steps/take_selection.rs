//! `take-selection` (§4.F, deps: `captions`): score every segment and
//! enforce the one-enabled-take-per-span invariant. `captions` is the only
//! listed dependency, but `segments` is completed transitively by the time
//! this runs (`captions → cut → segments`), so its artifact is read
//! directly rather than re-declared as a second DAG edge.

use clipcut_align::{AlignInput, SelectionMode};
use clipcut_core::{Caption, ClipcutError, Result, ScoreWeights, ScriptLine, Segment, StepName, VideoId};

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
    progress::progress(tx, StepName::TakeSelection, 10, "loading upstream artifacts").await?;

    let captions_artifact = store
        .load_artifact(video_id, StepName::Captions)?
        .ok_or_else(|| ClipcutError::Internal("captions artifact missing despite completed dep".into()))?;
    let captions: Vec<Caption> = serde_json::from_value(captions_artifact["tokens"].clone())?;

    let segments_artifact = store
        .load_artifact(video_id, StepName::Segments)?
        .ok_or_else(|| ClipcutError::Internal("segments artifact missing despite completed dep".into()))?;
    let segments: Vec<Segment> = serde_json::from_value(segments_artifact["segments"].clone())?;

    let script_lines: Option<Vec<ScriptLine>> = store
        .load_artifact(video_id, StepName::Script)?
        .map(|v| serde_json::from_value(v["scriptLines"].clone()))
        .transpose()?
        .filter(|lines: &Vec<ScriptLine>| !lines.is_empty());

    let mode: SelectionMode = ctx.config.take_selection.mode.into();
    if !matches!(mode, SelectionMode::Deterministic) && ctx.analyzer.is_none() {
        return Err(ClipcutError::Validation(
            "ai-assisted/ai-first take-selection mode requires a SemanticAnalyzer".to_string(),
        ));
    }

    progress::progress(tx, StepName::TakeSelection, 40, "scoring segments").await?;
    let input = AlignInput {
        captions: &captions,
        segments: &segments,
        script_lines: script_lines.as_deref(),
        weights: ScoreWeights::DEFAULT,
        mode,
        min_score: ctx.config.take_selection.min_score,
    };
    let output = clipcut_align::select_takes(&input, ctx.analyzer).await?;

    progress::progress(tx, StepName::TakeSelection, 100, "done").await?;

    Ok(serde_json::json!({
        "scores": output.scores,
        "candidates": output.candidates,
        "aiTrace": output.ai_trace,
        "createdAt": now_iso(),
    }))
}
