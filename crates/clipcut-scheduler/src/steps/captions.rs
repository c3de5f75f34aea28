//! `captions` (§4.D, deps: `cut`): the Caption Store over the rendered
//! preview. Per the data flow ("cut render via A → Caption Store via
//! external STT adapter"), this is a *fresh* transcript of the cut output,
//! not a re-timed copy of `captions-raw` — so like `captions-raw`, the
//! tokens are supplied externally rather than produced here.

use clipcut_captions::{CaptionTrack, PageConfig};
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
    let captions = ctx.final_captions.ok_or_else(|| {
        ClipcutError::Validation(
            "captions requires a transcript of the cut output from the external STT adapter".to_string(),
        )
    })?;

    progress::progress(tx, StepName::Captions, 40, "validating transcript").await?;
    let track = CaptionTrack::new(captions.to_vec())?;
    let pages = track.group_into_pages(PageConfig::default());

    progress::progress(tx, StepName::Captions, 100, "done").await?;

    let cut_path = store.cut_output_path(video_id);
    Ok(serde_json::json!({
        "captionsPath": store.artifact_path(video_id, StepName::Captions).to_string_lossy(),
        "captionsCount": track.len(),
        "sourceVideo": cut_path.to_string_lossy(),
        "tokens": track.tokens(),
        "pages": pages,
        "createdAt": now_iso(),
    }))
}
