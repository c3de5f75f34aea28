//! Subcommands mirroring the control protocol 1:1 (§6): `run-step` /
//! `reset` / `status` / `result`, plus `run-until` as a convenience
//! `executeUntil` wrapper (§4.I).

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use clipcut_ai::{HttpAnalyzerConfig, HttpSemanticAnalyzer, SemanticAnalyzer, StubSemanticAnalyzer};
use clipcut_core::StepName;
use clipcut_scheduler::{ArtifactStore, Cancel, ExecContext, Pipeline};
use tracing::info;

use crate::config;
use crate::input;

#[derive(Parser)]
#[command(name = "clipcut", about = "Drive the clipcut pipeline scheduler from a terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Args)]
pub struct AnalyzerArgs {
    /// Semantic analyzer backend: `stub` (in-memory, no network) or `http`
    /// (calls an external provider over `--analyzer-url`).
    #[arg(long, default_value = "stub")]
    pub analyzer: String,

    #[arg(long, default_value = "http://localhost:8787")]
    pub analyzer_url: String,
}

impl AnalyzerArgs {
    fn build(&self) -> Result<Option<Box<dyn SemanticAnalyzer>>> {
        match self.analyzer.as_str() {
            "stub" => Ok(Some(Box::new(StubSemanticAnalyzer::new()))),
            "http" => {
                let analyzer = HttpSemanticAnalyzer::new(HttpAnalyzerConfig {
                    base_url: self.analyzer_url.clone(),
                    ..HttpAnalyzerConfig::default()
                })?;
                Ok(Some(Box::new(analyzer)))
            }
            "none" => Ok(None),
            other => Err(anyhow!("unknown analyzer backend {other:?}, expected stub|http|none")),
        }
    }
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Workspace root the artifact store reads/writes under.
    #[arg(long)]
    pub workspace: PathBuf,

    #[arg(long = "video-id")]
    pub video_id: String,

    #[arg(long)]
    pub filename: String,

    /// Path to the source media file.
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Original-timeline transcript (JSON array of `Caption`), feeding
    /// `captions-raw`.
    #[arg(long = "captions-raw")]
    pub captions_raw: Option<PathBuf>,

    /// Transcript of the rendered cut (JSON array of `Caption`), feeding
    /// `captions`.
    #[arg(long)]
    pub captions: Option<PathBuf>,

    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Editor overrides to the built segment list (JSON array of
    /// `Segment`), consumed by `cut`/`rendered`.
    #[arg(long = "segment-overrides")]
    pub segment_overrides: Option<PathBuf>,

    #[command(flatten)]
    pub analyzer: AnalyzerArgs,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run exactly one step (`POST /pipeline/step`).
    RunStep {
        #[command(flatten)]
        run: RunArgs,

        #[arg(long)]
        step: String,
    },

    /// Run every pending ancestor of a target step in topological order
    /// (`executeUntil`).
    RunUntil {
        #[command(flatten)]
        run: RunArgs,

        #[arg(long)]
        target: String,
    },

    /// Reset steps and their transitive dependents (`POST
    /// /pipeline/reset-steps`).
    Reset {
        #[arg(long)]
        workspace: PathBuf,

        #[arg(long = "video-id")]
        video_id: String,

        /// Comma-separated step names.
        #[arg(long)]
        steps: String,
    },

    /// Print the persisted `PipelineStatus` (`GET /pipeline/status`).
    Status {
        #[arg(long)]
        workspace: PathBuf,

        #[arg(long = "video-id")]
        video_id: String,
    },

    /// Print one step's cached artifact (`GET /pipeline/result`).
    Result {
        #[arg(long)]
        workspace: PathBuf,

        #[arg(long = "video-id")]
        video_id: String,

        #[arg(long)]
        step: String,
    },
}

fn parse_step(name: &str) -> Result<StepName> {
    StepName::ALL
        .into_iter()
        .find(|s| s.as_str() == name)
        .ok_or_else(|| anyhow!("unknown step {name:?}"))
}

fn parse_steps(names: &str) -> Result<Vec<StepName>> {
    names.split(',').map(str::trim).filter(|s| !s.is_empty()).map(parse_step).collect()
}

pub async fn run(command: Command) -> Result<()> {
    match command {
        Command::RunStep { run, step } => run_step(run, &step).await,
        Command::RunUntil { run, target } => run_until(run, &target).await,
        Command::Reset { workspace, video_id, steps } => do_reset(workspace, video_id, &steps),
        Command::Status { workspace, video_id } => do_status(workspace, video_id),
        Command::Result { workspace, video_id, step } => do_result(workspace, video_id, &step),
    }
}

async fn run_step(run: RunArgs, step_name: &str) -> Result<()> {
    let step = parse_step(step_name)?;
    let (pipeline, owned) = prepare(&run)?;
    let ctx = build_context(&owned);
    let (tx, rx) = clipcut_scheduler::channel();
    let drain = tokio::spawn(drain_events(rx));

    let outcome = pipeline.exec_step(step, &ctx, &tx).await;
    drop(tx);
    let _ = drain.await;

    let step_result = outcome?;
    println!("{}", serde_json::to_string_pretty(&step_result)?);
    Ok(())
}

async fn run_until(run: RunArgs, target_name: &str) -> Result<()> {
    let target = parse_step(target_name)?;
    let (pipeline, owned) = prepare(&run)?;
    let ctx = build_context(&owned);
    let (tx, rx) = clipcut_scheduler::channel();
    let drain = tokio::spawn(drain_events(rx));

    let outcome = pipeline.execute_until(target, &ctx, &tx).await;
    drop(tx);
    let _ = drain.await;

    let steps_run = outcome?;
    println!("ran {steps_run} step(s), target {target} reached");
    Ok(())
}

/// Consume progress events onto the diagnostic log. The scheduler's
/// `ProgressEvent`s are a data channel (§1 ambient stack note); a shell
/// that wants the raw stream (e.g. for SSE) would drain `rx` itself
/// instead of delegating to this helper.
async fn drain_events(mut rx: clipcut_scheduler::Receiver) {
    while let Some(event) = rx.recv().await {
        if let Ok(line) = serde_json::to_string(&event) {
            info!("{line}");
        }
    }
}

/// Build the `Pipeline` and the boxed owned inputs for one invocation.
/// Boxing keeps `OwnedInputs` at a stable heap address, so the caller can
/// safely borrow an `ExecContext` from it after this returns — building
/// the context here instead would leave it referencing a stack slot that
/// moves the moment the tuple is returned.
fn prepare(run: &RunArgs) -> Result<(Pipeline, Box<OwnedInputs>)> {
    let store = ArtifactStore::new(&run.workspace);
    let video_id = clipcut_core::VideoId::new(run.video_id.clone());
    let pipeline = Pipeline::new(store, video_id);
    pipeline.ensure_filename(&run.filename)?;

    let pipeline_config = config::load(run.config.as_deref())?;
    let raw_captions = run.captions_raw.as_deref().map(input::read_captions).transpose()?;
    let final_captions = run.captions.as_deref().map(input::read_captions).transpose()?;
    let script_source = run.script.as_deref().map(input::read_script).transpose()?;
    let segment_overrides = run
        .segment_overrides
        .as_deref()
        .map(input::read_segment_overrides)
        .transpose()?;
    let analyzer = run.analyzer.build()?;
    let cancel = Cancel::new();

    let owned = Box::new(OwnedInputs {
        config: pipeline_config,
        raw_captions,
        final_captions,
        script_source,
        segment_overrides,
        analyzer,
        cancel,
        input_path: run.input.clone(),
    });

    Ok((pipeline, owned))
}

/// Everything an `ExecContext` borrows from, kept alive alongside it.
struct OwnedInputs {
    config: clipcut_scheduler::PipelineConfig,
    raw_captions: Option<Vec<clipcut_core::Caption>>,
    final_captions: Option<Vec<clipcut_core::Caption>>,
    script_source: Option<String>,
    segment_overrides: Option<Vec<clipcut_core::Segment>>,
    analyzer: Option<Box<dyn SemanticAnalyzer>>,
    cancel: Cancel,
    input_path: PathBuf,
}

fn build_context(owned: &OwnedInputs) -> ExecContext<'_> {
    ExecContext {
        input_path: &owned.input_path,
        config: &owned.config,
        raw_captions: owned.raw_captions.as_deref(),
        final_captions: owned.final_captions.as_deref(),
        script_source: owned.script_source.as_deref(),
        segment_overrides: owned.segment_overrides.as_deref(),
        analyzer: owned.analyzer.as_deref(),
        cancel: &owned.cancel,
    }
}

fn do_reset(workspace: PathBuf, video_id: String, steps: &str) -> Result<()> {
    let store = ArtifactStore::new(workspace);
    let pipeline = Pipeline::new(store, clipcut_core::VideoId::new(video_id));
    let targets = parse_steps(steps)?;
    let reset = pipeline.reset(&targets)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "stepsReset": reset.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
        }))?
    );
    Ok(())
}

fn do_status(workspace: PathBuf, video_id: String) -> Result<()> {
    let store = ArtifactStore::new(workspace);
    let pipeline = Pipeline::new(store, clipcut_core::VideoId::new(video_id));
    let status = pipeline.status()?;
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

fn do_result(workspace: PathBuf, video_id: String, step: &str) -> Result<()> {
    let store = ArtifactStore::new(workspace);
    let pipeline = Pipeline::new(store, clipcut_core::VideoId::new(video_id));
    let step = parse_step(step)?;
    match pipeline.result(step)? {
        Some(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        None => Err(anyhow!("no cached result for step {step}")),
    }
}
