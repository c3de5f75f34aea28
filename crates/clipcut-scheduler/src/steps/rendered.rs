//! `rendered` (deps: `take-selection`): the final assembly step. Re-renders
//! the keep list restricted to the segments `take-selection` actually
//! enabled, producing the deliverable output distinct from `cut`'s preview.

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
    progress::progress(tx, StepName::Rendered, 10, "loading upstream artifacts").await?;

    let take_selection = store
        .load_artifact(video_id, StepName::TakeSelection)?
        .ok_or_else(|| ClipcutError::Internal("take-selection artifact missing despite completed dep".into()))?;
    let enabled_segment_ids: std::collections::HashSet<usize> = take_selection["scores"]
        .as_array()
        .into_iter()
        .flatten()
        .filter(|s| s["enabled"].as_bool().unwrap_or(false))
        .filter_map(|s| s["segment_id"].as_u64().map(|n| n as usize))
        .collect();

    let segments_artifact = store
        .load_artifact(video_id, StepName::Segments)?
        .ok_or_else(|| ClipcutError::Internal("segments artifact missing despite completed dep".into()))?;
    let all_segments: Vec<Segment> = serde_json::from_value(segments_artifact["segments"].clone())?;
    let keep: Vec<Segment> = all_segments
        .into_iter()
        .filter(|s| s.enabled && enabled_segment_ids.contains(&s.index))
        .collect();
    if keep.is_empty() {
        return Err(ClipcutError::Transcode("no take-selected segments to render".into()));
    }
    let segments_count = keep.len();

    let output_path = store.rendered_output_path(video_id);
    let input_path = ctx.input_path.to_path_buf();
    let media_cancel = ctx.cancel.as_media_cancel();

    progress::progress(tx, StepName::Rendered, 40, "rendering final cut").await?;
    let output_for_task = output_path.clone();
    tokio::task::spawn_blocking(move || {
        clipcut_media::render_cut(&input_path, &keep, &output_for_task, &media_cancel)
    })
    .await
    .map_err(|e| ClipcutError::Internal(format!("render task panicked: {e}")))??;

    progress::progress(tx, StepName::Rendered, 100, "done").await?;

    Ok(serde_json::json!({
        "outputPath": output_path.to_string_lossy(),
        "selectedSegmentsCount": segments_count,
        "createdAt": now_iso(),
    }))
}
