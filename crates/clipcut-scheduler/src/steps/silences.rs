//! `silences` (§4.B, deps: `raw`): run the Silence Detector over the input
//! media at `config.silence.{thresholdDb,minDurationSec}`.

use clipcut_audio::{detect_silence_in_file, SilenceConfig};
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
    progress::progress(tx, StepName::Silences, 10, "loading raw artifact").await?;
    let raw = store
        .load_artifact(video_id, StepName::Raw)?
        .ok_or_else(|| ClipcutError::Internal("raw artifact missing despite completed dep".into()))?;
    let duration_ms: i64 = raw["durationMs"].as_i64().unwrap_or(0);
    let video_duration_sec = duration_ms as f64 / 1000.0;

    let config = SilenceConfig {
        threshold_db: ctx.config.silence.threshold_db,
        min_duration_sec: ctx.config.silence.min_duration_sec,
    };

    progress::progress(tx, StepName::Silences, 30, "analysing loudness").await?;
    let input_path = ctx.input_path.to_path_buf();
    let silences = tokio::task::spawn_blocking(move || detect_silence_in_file(&input_path, config))
        .await
        .map_err(|e| ClipcutError::Internal(format!("silence detection task panicked: {e}")))??;

    progress::progress(tx, StepName::Silences, 100, "done").await?;

    Ok(serde_json::json!({
        "silences": silences,
        "videoDurationSec": video_duration_sec,
        "config": {
            "thresholdDb": config.threshold_db,
            "minDurationSec": config.min_duration_sec,
        },
        "createdAt": now_iso(),
    }))
}
