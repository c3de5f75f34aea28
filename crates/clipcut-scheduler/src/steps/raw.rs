//! `raw`: the input media file itself. No dependencies; exec just probes
//! its duration via the media adapter (§4.A) so every downstream step can
//! read `durationMs` back out of this artifact instead of re-probing.

use clipcut_core::Result;

use crate::context::ExecContext;
use crate::progress::{self, Sender};
use crate::steps::now_iso;

pub async fn exec(ctx: &ExecContext<'_>, tx: &Sender) -> Result<serde_json::Value> {
    progress::progress(tx, clipcut_core::StepName::Raw, 10, "probing input").await?;

    let input_path = ctx.input_path.to_path_buf();
    let duration_ms = tokio::task::spawn_blocking(move || clipcut_media::probe_duration(&input_path))
        .await
        .map_err(|e| clipcut_core::ClipcutError::Internal(format!("probe task panicked: {e}")))??;

    progress::progress(tx, clipcut_core::StepName::Raw, 100, "probed").await?;

    Ok(serde_json::json!({
        "path": ctx.input_path.to_string_lossy(),
        "durationMs": duration_ms,
        "createdAt": now_iso(),
    }))
}
