//! `captions-raw` (§4.D, deps: `raw`): the original-timeline transcript.
//! Transcription itself is an external STT adapter, out of scope (§1) — the
//! caller supplies the tokens via `ExecContext::raw_captions`; this step's
//! job is to validate them through the Caption Store and persist the
//! result other steps (`segments`, `semantic`, `effects-analysis`) read.

use clipcut_captions::CaptionTrack;
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
    let captions = ctx.raw_captions.ok_or_else(|| {
        ClipcutError::Validation(
            "captions-raw requires a transcript from the external STT adapter".to_string(),
        )
    })?;

    progress::progress(tx, StepName::CaptionsRaw, 50, "validating transcript").await?;
    let track = CaptionTrack::new(captions.to_vec())?;

    progress::progress(tx, StepName::CaptionsRaw, 100, "done").await?;

    Ok(serde_json::json!({
        "captionsPath": store.artifact_path(video_id, StepName::CaptionsRaw).to_string_lossy(),
        "captionsCount": track.len(),
        "sourceVideo": ctx.input_path.to_string_lossy(),
        "tokens": track.tokens(),
        "createdAt": now_iso(),
    }))
}
