//! One executor per `StepName`, dispatched by [`exec`]. Each executor is
//! `exec(ctx, store, video_id, tx) -> Result<serde_json::Value>`: it may
//! read any already-completed dependency's artifact straight from the
//! store (deps are guaranteed completed by the time `Pipeline::exec_step`
//! calls in), does its work, and returns the JSON payload the caller
//! persists as this step's `StepResult` (§6 "StepResult payloads").

mod captions;
mod captions_raw;
mod cut;
mod effects_analysis;
mod raw;
mod rendered;
mod script;
mod segments;
mod semantic;
mod silences;
mod take_selection;

use clipcut_core::{Result, StepName, VideoId};

use crate::artifact_store::ArtifactStore;
use crate::context::ExecContext;
use crate::progress::Sender;

pub async fn exec(
    step: StepName,
    ctx: &ExecContext<'_>,
    store: &ArtifactStore,
    video_id: &VideoId,
    tx: &Sender,
) -> Result<serde_json::Value> {
    match step {
        StepName::Raw => raw::exec(ctx, tx).await,
        StepName::Silences => silences::exec(ctx, store, video_id, tx).await,
        StepName::CaptionsRaw => captions_raw::exec(ctx, store, video_id, tx).await,
        StepName::Segments => segments::exec(ctx, store, video_id, tx).await,
        StepName::Semantic => semantic::exec(ctx, store, video_id, tx).await,
        StepName::EffectsAnalysis => effects_analysis::exec(ctx, store, video_id, tx).await,
        StepName::Cut => cut::exec(ctx, store, video_id, tx).await,
        StepName::Captions => captions::exec(ctx, store, video_id, tx).await,
        StepName::Script => script::exec(ctx, tx).await,
        StepName::TakeSelection => take_selection::exec(ctx, store, video_id, tx).await,
        StepName::Rendered => rendered::exec(ctx, store, video_id, tx).await,
    }
}

pub(crate) fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}
