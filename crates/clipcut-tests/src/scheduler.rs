//! Cross-crate scheduler behavior: reset cascades, digest-keyed caching,
//! and a full non-media run of the step DAG through `clipcut-scheduler`,
//! `clipcut-audio`/`clipcut-align`/`clipcut-effects`/`clipcut-ai` together.
//!
//! `raw`/`silences`/`cut` are seeded directly into the `ArtifactStore`
//! rather than executed: their real work shells out to ffmpeg, which these
//! tests have no business depending on. Everything downstream of them runs
//! for real.

use std::collections::HashMap;

use clipcut_core::{Caption, Digest, PipelineStatus, SilenceRange, StepName, StepState, StepStatus, VideoId};
use clipcut_scheduler::{ArtifactStore, Cancel, ExecContext, Pipeline, PipelineConfig};

fn fresh_status(video_id: &str) -> PipelineStatus {
    let steps = StepName::ALL
        .into_iter()
        .map(|s| (s.as_str().to_string(), StepState::pending()))
        .collect::<HashMap<_, _>>();
    PipelineStatus {
        video_id: video_id.to_string(),
        filename: "clip.mp4".to_string(),
        steps,
        updated_at: "2026-01-01T00:00:00Z".to_string(),
        input_digests: HashMap::new(),
    }
}

/// Mark `step` completed with a stable placeholder digest/artifact, as if
/// `execStep` had already run it. Used for the media-backed steps this
/// suite never actually executes.
fn seed_completed(status: &mut PipelineStatus, store: &ArtifactStore, video_id: &VideoId, step: StepName, artifact: serde_json::Value) {
    let state = status.steps.get_mut(step.as_str()).expect("fresh_status covers every step");
    state.status = StepStatus::Completed;
    state.completed_at = Some("2026-01-01T00:00:00Z".to_string());
    status.input_digests.insert(step.as_str().to_string(), Digest::of_bytes(step.as_str().as_bytes()));
    store.save_artifact(video_id, step, &artifact).unwrap();
}

/// Seed `raw`, `silences`, and `cut` as already completed so downstream
/// pure-computation steps can run for real without touching ffmpeg.
fn seed_upstream(store: &ArtifactStore, video_id: &VideoId) {
    let mut status = fresh_status(video_id.as_str());

    seed_completed(&mut status, store, video_id, StepName::Raw, serde_json::json!({"durationMs": 16_000}));

    let silences = vec![SilenceRange { start_sec: 2.0, end_sec: 15.0, duration_sec: 13.0 }];
    seed_completed(
        &mut status,
        store,
        video_id,
        StepName::Silences,
        serde_json::json!({"silences": silences, "videoDurationSec": 16.0}),
    );

    seed_completed(
        &mut status,
        store,
        video_id,
        StepName::Cut,
        serde_json::json!({"outputPath": "/dev/null", "segmentsCount": 2}),
    );

    store.save_status(&status).unwrap();
}

fn raw_captions() -> Vec<Caption> {
    vec![
        Caption { text: "Hello world".to_string(), start_ms: 0, end_ms: 500, confidence: Some(0.9) },
        Caption { text: "Goodbye now".to_string(), start_ms: 600, end_ms: 1200, confidence: Some(0.95) },
    ]
}

fn final_captions() -> Vec<Caption> {
    vec![
        Caption { text: "Hello world".to_string(), start_ms: 0, end_ms: 500, confidence: Some(0.9) },
        Caption { text: "Goodbye now".to_string(), start_ms: 600, end_ms: 1200, confidence: Some(0.95) },
    ]
}

fn build_ctx<'a>(
    config: &'a PipelineConfig,
    raw_captions: &'a [Caption],
    final_captions: &'a [Caption],
    script_source: &'a str,
    analyzer: &'a clipcut_ai::StubSemanticAnalyzer,
    cancel: &'a Cancel,
    input_path: &'a std::path::Path,
) -> ExecContext<'a> {
    ExecContext {
        input_path,
        config,
        raw_captions: Some(raw_captions),
        final_captions: Some(final_captions),
        script_source: Some(script_source),
        segment_overrides: None,
        analyzer: Some(analyzer),
        cancel,
    }
}

#[tokio::test]
async fn full_non_media_run_reaches_take_selection() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    let video_id = VideoId::new("vid-full-run");
    seed_upstream(&store, &video_id);

    let pipeline = Pipeline::new(store, video_id.clone());
    pipeline.ensure_filename("clip.mp4").unwrap();

    let config = PipelineConfig::default();
    let raw_captions = raw_captions();
    let final_captions = final_captions();
    let analyzer = clipcut_ai::StubSemanticAnalyzer::new();
    let cancel = Cancel::new();
    let input_path = std::path::PathBuf::from("clip.mp4");
    let script_source = "Say hello\nThen say goodbye\n";
    let ctx = build_ctx(&config, &raw_captions, &final_captions, script_source, &analyzer, &cancel, &input_path);

    let (tx, mut rx) = clipcut_scheduler::channel();
    let drain = tokio::spawn(async move { while rx.recv().await.is_some() {} });

    pipeline.exec_step(StepName::CaptionsRaw, &ctx, &tx).await.unwrap();
    pipeline.exec_step(StepName::Semantic, &ctx, &tx).await.unwrap();
    let segments_result = pipeline.exec_step(StepName::Segments, &ctx, &tx).await.unwrap();
    pipeline.exec_step(StepName::EffectsAnalysis, &ctx, &tx).await.unwrap();
    pipeline.exec_step(StepName::Captions, &ctx, &tx).await.unwrap();
    let script_result = pipeline.exec_step(StepName::Script, &ctx, &tx).await.unwrap();
    let take_selection_result = pipeline.exec_step(StepName::TakeSelection, &ctx, &tx).await.unwrap();

    drop(tx);
    drain.await.unwrap();

    // The classified silence (2.0s-15.0s) follows a sentence-end caption,
    // so it's cuttable: two segments survive, one before and one after it.
    let segments = segments_result["segments"].as_array().unwrap();
    assert_eq!(segments.len(), 2);
    assert!(segments_result["config"]["usedSemanticAnalysis"].as_bool().unwrap());

    assert_eq!(script_result["lineCount"], 2);

    let scores = take_selection_result["scores"].as_array().unwrap();
    assert_eq!(scores.len(), 2);
    assert!(scores.iter().all(|s| s["enabled"].as_bool().is_some()));

    let status = pipeline.status().unwrap();
    for step in [
        StepName::CaptionsRaw,
        StepName::Semantic,
        StepName::Segments,
        StepName::EffectsAnalysis,
        StepName::Captions,
        StepName::Script,
        StepName::TakeSelection,
    ] {
        assert_eq!(status.steps[step.as_str()].status, StepStatus::Completed);
    }

    let effects_config = clipcut_effects::EffectsConfig::default();
    let applied = pipeline.compute_effects(&effects_config, 16_000).unwrap();
    assert!(applied.len() <= 2);
}

#[tokio::test]
async fn rerunning_a_completed_step_hits_the_cache() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    let video_id = VideoId::new("vid-cache");
    seed_upstream(&store, &video_id);

    let pipeline = Pipeline::new(store, video_id.clone());
    let config = PipelineConfig::default();
    let raw_captions = raw_captions();
    let final_captions = final_captions();
    let analyzer = clipcut_ai::StubSemanticAnalyzer::new();
    let cancel = Cancel::new();
    let input_path = std::path::PathBuf::from("clip.mp4");
    let ctx = build_ctx(&config, &raw_captions, &final_captions, "", &analyzer, &cancel, &input_path);

    let (tx, mut rx) = clipcut_scheduler::channel();
    let drain = tokio::spawn(async move {
        let mut saw_cache_log = false;
        while let Some(event) = rx.recv().await {
            if let clipcut_scheduler::ProgressEvent::Log { message, .. } = &event {
                if message.contains("cached") {
                    saw_cache_log = true;
                }
            }
        }
        saw_cache_log
    });

    let first = pipeline.exec_step(StepName::Segments, &ctx, &tx).await.unwrap();
    let second = pipeline.exec_step(StepName::Segments, &ctx, &tx).await.unwrap();
    assert_eq!(first, second);

    drop(tx);
    assert!(drain.await.unwrap(), "second run should report a cache hit");
}

#[tokio::test]
async fn changing_relevant_config_invalidates_the_cache_and_changes_the_result() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    let video_id = VideoId::new("vid-invalidate");
    seed_upstream(&store, &video_id);

    let pipeline = Pipeline::new(store, video_id.clone());
    let mut config = PipelineConfig::default();
    let raw_captions = raw_captions();
    let final_captions = final_captions();
    let analyzer = clipcut_ai::StubSemanticAnalyzer::new();
    let cancel = Cancel::new();
    let input_path = std::path::PathBuf::from("clip.mp4");

    let ctx = build_ctx(&config, &raw_captions, &final_captions, "", &analyzer, &cancel, &input_path);
    let (tx, mut rx) = clipcut_scheduler::channel();
    let drain = tokio::spawn(async move { while rx.recv().await.is_some() {} });
    let before_result = pipeline.exec_step(StepName::Segments, &ctx, &tx).await.unwrap();
    let before_digest = pipeline.status().unwrap().input_digests[StepName::Segments.as_str()];
    drop(tx);
    drain.await.unwrap();

    // `segments` reads `config.silence` (§4.I digest §2): widening the
    // padding must move its digest and force a real re-run, not a cache hit.
    config.silence.padding_sec = 2.0;
    let ctx = build_ctx(&config, &raw_captions, &final_captions, "", &analyzer, &cancel, &input_path);
    let (tx, mut rx) = clipcut_scheduler::channel();
    let drain = tokio::spawn(async move { while rx.recv().await.is_some() {} });
    let after_result = pipeline.exec_step(StepName::Segments, &ctx, &tx).await.unwrap();
    let after_digest = pipeline.status().unwrap().input_digests[StepName::Segments.as_str()];
    drop(tx);
    drain.await.unwrap();

    assert_ne!(before_digest, after_digest);
    assert_ne!(before_result, after_result);
}

#[tokio::test]
async fn cancelling_before_cut_runs_leaves_status_pending_not_error() {
    // `cut` shells out to ffmpeg via `render_cut`, which this suite has no
    // business depending on; cancelling before the step starts exercises
    // the same observable contract (§4.I/§7: a cancelled step comes back
    // `pending`, never `error`) without needing a real ffmpeg binary in the
    // loop. The scheduler's own handling of a cancellation raised *during*
    // a step's execution is unit-tested directly in
    // `clipcut-scheduler::pipeline::tests::apply_failure_returns_cancelled_steps_to_pending`,
    // and `render_cut`'s pre-spawn cancellation check is unit-tested in
    // `clipcut-media::render_cut::tests::cancelled_before_spawn_returns_cancelled_without_invoking_ffmpeg`.
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    let video_id = VideoId::new("vid-cancel-cut");

    let mut status = fresh_status(video_id.as_str());
    seed_completed(
        &mut status,
        &store,
        &video_id,
        StepName::Segments,
        serde_json::json!({
            "segments": [{"index": 0, "startMs": 0, "endMs": 1000, "durationMs": 1000, "enabled": true}],
            "totalDurationMs": 1000,
            "config": {"usedSemanticAnalysis": false},
        }),
    );
    store.save_status(&status).unwrap();

    let pipeline = Pipeline::new(store, video_id.clone());
    let config = PipelineConfig::default();
    let cancel = Cancel::new();
    cancel.cancel();
    let input_path = std::path::PathBuf::from("clip.mp4");
    let ctx = ExecContext {
        input_path: &input_path,
        config: &config,
        raw_captions: None,
        final_captions: None,
        script_source: None,
        segment_overrides: None,
        analyzer: None,
        cancel: &cancel,
    };

    let (tx, mut rx) = clipcut_scheduler::channel();
    let drain = tokio::spawn(async move { while rx.recv().await.is_some() {} });

    let result = pipeline.exec_step(StepName::Cut, &ctx, &tx).await;
    drop(tx);
    drain.await.unwrap();

    assert!(matches!(result, Err(clipcut_core::ClipcutError::Cancelled)));

    let status = pipeline.status().unwrap();
    assert_eq!(status.steps[StepName::Cut.as_str()].status, StepStatus::Pending);
    assert!(status.steps[StepName::Cut.as_str()].error.is_none());
}

#[test]
fn reset_cascade_matches_the_documented_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    let video_id = VideoId::new("vid-reset");

    let mut status = fresh_status(video_id.as_str());
    for step in StepName::ALL {
        seed_completed(&mut status, &store, &video_id, step, serde_json::json!({}));
    }
    store.save_status(&status).unwrap();

    let pipeline = Pipeline::new(store, video_id.clone());
    let reset = pipeline.reset(&[StepName::Segments]).unwrap();

    let expected = [
        StepName::Segments,
        StepName::Cut,
        StepName::Captions,
        StepName::Script,
        StepName::TakeSelection,
        StepName::Rendered,
    ];
    assert_eq!(reset.len(), expected.len());
    for step in expected {
        assert!(reset.contains(&step), "expected {step} to be reset");
    }

    let status = pipeline.status().unwrap();
    assert_eq!(status.steps[StepName::Silences.as_str()].status, StepStatus::Completed);
    assert_eq!(status.steps[StepName::Raw.as_str()].status, StepStatus::Completed);
    for step in expected {
        assert_eq!(status.steps[step.as_str()].status, StepStatus::Pending);
        assert!(!status.input_digests.contains_key(step.as_str()));
    }
}
