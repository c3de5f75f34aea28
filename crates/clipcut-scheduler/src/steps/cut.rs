//! `cut` (§4.A `renderCut`, deps: `segments`): render the enabled
//! keep-segments into a preview cut.

use clipcut_core::{ClipcutError, Result, Segment, StepName, VideoId};

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
    progress::progress(tx, StepName::Cut, 10, "loading segments artifact").await?;
    let segments_artifact = store
        .load_artifact(video_id, StepName::Segments)?
        .ok_or_else(|| ClipcutError::Internal("segments artifact missing despite completed dep".into()))?;
    let original_duration_ms: clipcut_core::Ms =
        segments_artifact["totalDurationMs"].as_i64().unwrap_or(0);

    let segments: Vec<Segment> = match ctx.segment_overrides {
        Some(overrides) => overrides.to_vec(),
        None => serde_json::from_value(segments_artifact["segments"].clone())?,
    };
    let keep: Vec<Segment> = segments.into_iter().filter(|s| s.enabled).collect();
    if keep.is_empty() {
        return Err(ClipcutError::Transcode("no enabled segments to render".into()));
    }
    let edited_duration_ms: clipcut_core::Ms = keep.iter().map(|s| s.duration_ms).sum();
    let segments_count = keep.len();

    let output_path = store.cut_output_path(video_id);
    let input_path = ctx.input_path.to_path_buf();
    let media_cancel = ctx.cancel.as_media_cancel();

    progress::progress(tx, StepName::Cut, 40, "rendering").await?;
    let output_for_task = output_path.clone();
    tokio::task::spawn_blocking(move || {
        clipcut_media::render_cut(&input_path, &keep, &output_for_task, &media_cancel)
    })
    .await
    .map_err(|e| ClipcutError::Internal(format!("render task panicked: {e}")))??;

    progress::progress(tx, StepName::Cut, 100, "done").await?;

    Ok(serde_json::json!({
        "outputPath": output_path.to_string_lossy(),
        "originalDurationMs": original_duration_ms,
        "editedDurationMs": edited_duration_ms,
        "segmentsCount": segments_count,
        "createdAt": now_iso(),
    }))
}
