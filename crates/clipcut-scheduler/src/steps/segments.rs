//! `segments` (§4.C, deps: `silences`): invert the silence list into
//! keep-segments. If `captions-raw` and `semantic` artifacts already exist
//! at the time this runs, use them as a sentence-aware hint (§9: a hint
//! only, never a hard dependency — the DAG edge is `segments → silences`
//! alone, so a pending `semantic` step never blocks this one).

use clipcut_audio::build_segments_sentence_aware;
use clipcut_core::{ClipcutError, Result, SilenceRange, StepName, VideoId};

use crate::artifact_store::ArtifactStore;
use crate::context::ExecContext;
use crate::progress::{self, Sender};
use crate::steps::now_iso;
use crate::steps::semantic::classify_silence;

pub async fn exec(
    ctx: &ExecContext<'_>,
    store: &ArtifactStore,
    video_id: &VideoId,
    tx: &Sender,
) -> Result<serde_json::Value> {
    progress::progress(tx, StepName::Segments, 10, "loading silences artifact").await?;
    let silences_artifact = store
        .load_artifact(video_id, StepName::Silences)?
        .ok_or_else(|| ClipcutError::Internal("silences artifact missing despite completed dep".into()))?;
    let silences: Vec<SilenceRange> = serde_json::from_value(silences_artifact["silences"].clone())?;
    let video_duration_sec: f64 = silences_artifact["videoDurationSec"].as_f64().unwrap_or(0.0);
    let duration_ms = (video_duration_sec * 1000.0).round() as clipcut_core::Ms;

    let padding_sec = ctx.config.silence.padding_sec;

    progress::progress(tx, StepName::Segments, 50, "building segments").await?;

    let semantic_hint = store.load_artifact(video_id, StepName::Semantic)?;
    let captions_raw = store.load_artifact(video_id, StepName::CaptionsRaw)?;

    let result = match (captions_raw, semantic_hint) {
        (Some(_), Some(semantic)) => {
            let enriched: Vec<clipcut_core::EnrichedCaption> =
                serde_json::from_value(semantic["enrichedCaptions"].clone()).unwrap_or_default();
            build_segments_sentence_aware(&silences, duration_ms, padding_sec, |silence| {
                classify_silence(silence, &enriched)
            })
        }
        _ => {
            let build = clipcut_audio::build_segments(&silences, duration_ms, padding_sec);
            clipcut_audio::SentenceAwareBuildResult {
                build,
                used_semantic_analysis: false,
            }
        }
    };

    progress::progress(tx, StepName::Segments, 100, "done").await?;

    Ok(serde_json::json!({
        "segments": result.build.segments,
        "totalDurationMs": result.build.total_duration_ms,
        "editedDurationMs": result.build.edited_duration_ms,
        "timeSavedMs": result.build.time_saved_ms,
        "percentSaved": result.build.percent_saved,
        "config": {
            "paddingSec": padding_sec,
            "usedSemanticAnalysis": result.used_semantic_analysis,
        },
        "createdAt": now_iso(),
    }))
}
