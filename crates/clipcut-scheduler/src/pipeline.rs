//! `Pipeline`: one video's run of the step DAG. Implements `execStep`,
//! reset-with-cascade, and `executeUntil` (§4.I), driving the step
//! executors in `crate::steps` and persisting state through an
//! `ArtifactStore`.

use std::collections::HashMap;

use clipcut_core::{ClipcutError, Digest, PipelineStatus, Result, StepName, StepState, StepStatus, VideoId};

use crate::artifact_store::ArtifactStore;
use crate::context::ExecContext;
use crate::digest;
use crate::progress::{self, ProgressEvent, Sender};
use crate::registry;
use crate::steps;

pub struct Pipeline {
    store: ArtifactStore,
    video_id: VideoId,
}

impl Pipeline {
    pub fn new(store: ArtifactStore, video_id: VideoId) -> Self {
        Self { store, video_id }
    }

    pub fn video_id(&self) -> &VideoId {
        &self.video_id
    }

    pub fn status(&self) -> Result<PipelineStatus> {
        match self.store.load_status(&self.video_id)? {
            Some(status) => Ok(status),
            None => Ok(self.fresh_status()),
        }
    }

    pub fn result(&self, step: StepName) -> Result<Option<serde_json::Value>> {
        self.store.load_artifact(&self.video_id, step)
    }

    /// Record the source filename on the persisted status, as the control
    /// protocol's `PipelineStepRequest{videoId, filename, ...}` implies
    /// (§6). Safe to call on every request; only writes when it changes.
    pub fn ensure_filename(&self, filename: &str) -> Result<()> {
        let mut status = self.status()?;
        if status.filename != filename {
            status.filename = filename.to_string();
            status.updated_at = steps::now_iso();
            self.store.save_status(&status)?;
        }
        Ok(())
    }

    fn fresh_status(&self) -> PipelineStatus {
        let steps = StepName::ALL
            .into_iter()
            .map(|s| (s.as_str().to_string(), StepState::pending()))
            .collect::<HashMap<_, _>>();
        PipelineStatus {
            video_id: self.video_id.as_str().to_string(),
            filename: String::new(),
            steps,
            updated_at: steps::now_iso(),
            input_digests: HashMap::new(),
        }
    }

    fn step_state<'a>(status: &'a mut PipelineStatus, step: StepName) -> &'a mut StepState {
        status
            .steps
            .entry(step.as_str().to_string())
            .or_insert_with(StepState::pending)
    }

    fn step_status_of(status: &PipelineStatus, step: StepName) -> StepStatus {
        status
            .steps
            .get(step.as_str())
            .map(|s| s.status)
            .unwrap_or(StepStatus::Pending)
    }

    /// Record a step executor's failure on its state. A cancellation is not
    /// a failure the operator needs to address (§4.I/§7): the step returns
    /// to `pending` with no error recorded, ready to be re-run, rather than
    /// landing in `error`.
    fn apply_failure(state: &mut StepState, err: &ClipcutError) {
        if matches!(err, ClipcutError::Cancelled) {
            state.status = StepStatus::Pending;
            state.error = None;
        } else {
            state.status = StepStatus::Error;
            state.error = Some(err.to_string());
        }
    }

    /// Run one step (§4.I `execStep(name)`): check dependencies are
    /// completed, compute the input digest, skip re-execution if the cached
    /// artifact's digest already matches, otherwise run the step and
    /// persist its result atomically.
    pub async fn exec_step(
        &self,
        step: StepName,
        ctx: &ExecContext<'_>,
        tx: &Sender,
    ) -> Result<serde_json::Value> {
        let mut status = self.status()?;

        let unmet: Vec<String> = step
            .deps()
            .iter()
            .filter(|dep| Self::step_status_of(&status, **dep) != StepStatus::Completed)
            .map(|dep| dep.as_str().to_string())
            .collect();
        if !unmet.is_empty() {
            return Err(ClipcutError::Dependency(unmet));
        }

        let dep_digests: Vec<Digest> = step
            .deps()
            .iter()
            .map(|dep| {
                status
                    .input_digests
                    .get(dep.as_str())
                    .copied()
                    .ok_or_else(|| {
                        ClipcutError::Internal(format!(
                            "dependency {dep} completed but has no recorded input digest"
                        ))
                    })
            })
            .collect::<Result<_>>()?;
        let digest = digest::input_digest(step, &dep_digests, ctx.config)?;

        if Self::step_status_of(&status, step) == StepStatus::Completed
            && status.input_digests.get(step.as_str()) == Some(&digest)
        {
            if let Some(cached) = self.store.load_artifact(&self.video_id, step)? {
                progress::log(tx, step, "using cached artifact, digest unchanged").await?;
                progress::send(tx, ProgressEvent::Complete { step, result: cached.clone() }).await?;
                return Ok(cached);
            }
        }

        ctx.cancel.check()?;

        {
            let state = Self::step_state(&mut status, step);
            state.status = StepStatus::Running;
            state.started_at = Some(steps::now_iso());
            state.completed_at = None;
            state.error = None;
        }
        status.updated_at = steps::now_iso();
        self.store.save_status(&status)?;

        let outcome = steps::exec(step, ctx, &self.store, &self.video_id, tx).await;

        let mut status = self.status()?;
        match outcome {
            Ok(result) => {
                self.store.save_artifact(&self.video_id, step, &result)?;
                let state = Self::step_state(&mut status, step);
                state.status = StepStatus::Completed;
                state.completed_at = Some(steps::now_iso());
                state.error = None;
                state.result_file_ref = Some(self.store.artifact_path(&self.video_id, step).to_string_lossy().into_owned());
                status.input_digests.insert(step.as_str().to_string(), digest);
                status.updated_at = steps::now_iso();
                self.store.save_status(&status)?;

                progress::send(tx, ProgressEvent::Complete { step, result: result.clone() }).await?;
                Ok(result)
            }
            Err(err) => {
                let state = Self::step_state(&mut status, step);
                Self::apply_failure(state, &err);
                status.updated_at = steps::now_iso();
                self.store.save_status(&status)?;

                progress::send(tx, ProgressEvent::Error { step, message: err.to_string() }).await?;
                Err(err)
            }
        }
    }

    /// Reset `steps` and every step that transitively depends on any of
    /// them (§4.I "Reset with cascade"). `raw` is never reset: it has no
    /// config and nothing it could disagree with.
    pub fn reset(&self, steps: &[StepName]) -> Result<Vec<StepName>> {
        let mut status = self.status()?;

        let mut to_reset: Vec<StepName> = Vec::new();
        for &step in steps {
            if step == StepName::Raw {
                continue;
            }
            if !to_reset.contains(&step) {
                to_reset.push(step);
            }
            for dependent in registry::transitive_dependents(step) {
                if dependent != StepName::Raw && !to_reset.contains(&dependent) {
                    to_reset.push(dependent);
                }
            }
        }

        for &step in &to_reset {
            let state = Self::step_state(&mut status, step);
            *state = StepState::pending();
            status.input_digests.remove(step.as_str());
            self.store.delete_artifact(&self.video_id, step)?;
        }
        status.updated_at = steps::now_iso();
        self.store.save_status(&status)?;

        Ok(to_reset)
    }

    /// Run every ancestor of `target` (inclusive) in topological order,
    /// stopping at the first failure (§4.I `executeUntil(target)`).
    pub async fn execute_until(
        &self,
        target: StepName,
        ctx: &ExecContext<'_>,
        tx: &Sender,
    ) -> Result<usize> {
        let order = registry::topological_ancestors(target);
        let mut steps_run = 0;
        for step in order {
            self.exec_step(step, ctx, tx).await?;
            steps_run += 1;
        }
        progress::send(tx, ProgressEvent::Done { steps_run }).await?;
        Ok(steps_run)
    }

    /// Recompute the Effects Rule Engine's output on demand from the
    /// cached `effects-analysis` artifact's enriched captions. Not a
    /// cached DAG artifact: effects are meant to be recomputed every time
    /// the rule set changes, not once per pipeline run.
    pub fn compute_effects(
        &self,
        config: &clipcut_effects::EffectsConfig,
        timeline_duration_ms: clipcut_core::Ms,
    ) -> Result<Vec<clipcut_core::AppliedEffect>> {
        let artifact = self
            .store
            .load_artifact(&self.video_id, StepName::EffectsAnalysis)?
            .ok_or_else(|| {
                ClipcutError::Dependency(vec![StepName::EffectsAnalysis.as_str().to_string()])
            })?;
        let enriched: Vec<clipcut_core::EnrichedCaption> =
            serde_json::from_value(artifact["enrichedCaptions"].clone())?;
        Ok(clipcut_effects::apply_effects(&enriched, config, timeline_duration_ms)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_status_has_all_steps_pending() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let pipeline = Pipeline::new(store, VideoId::new("vid-1"));
        let status = pipeline.status().unwrap();
        assert_eq!(status.steps.len(), StepName::ALL.len());
        assert!(status
            .steps
            .values()
            .all(|s| s.status == StepStatus::Pending));
    }

    #[test]
    fn reset_never_touches_raw() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let pipeline = Pipeline::new(store, VideoId::new("vid-1"));

        let mut status = pipeline.status().unwrap();
        for step in StepName::ALL {
            let state = Pipeline::step_state(&mut status, step);
            state.status = StepStatus::Completed;
        }
        pipeline.store.save_status(&status).unwrap();

        let reset = pipeline.reset(&[StepName::Silences]).unwrap();
        assert!(!reset.contains(&StepName::Raw));
        assert!(reset.contains(&StepName::Silences));
        assert!(reset.contains(&StepName::Segments));
        assert!(reset.contains(&StepName::Rendered));

        let status = pipeline.status().unwrap();
        assert_eq!(
            status.steps[StepName::Raw.as_str()].status,
            StepStatus::Completed
        );
        assert_eq!(
            status.steps[StepName::Silences.as_str()].status,
            StepStatus::Pending
        );
    }

    #[test]
    fn apply_failure_returns_cancelled_steps_to_pending() {
        let mut state = StepState { status: StepStatus::Running, ..StepState::pending() };
        Pipeline::apply_failure(&mut state, &ClipcutError::Cancelled);
        assert_eq!(state.status, StepStatus::Pending);
        assert!(state.error.is_none());
    }

    #[test]
    fn apply_failure_marks_other_errors_as_error() {
        let mut state = StepState { status: StepStatus::Running, ..StepState::pending() };
        Pipeline::apply_failure(&mut state, &ClipcutError::Transcode("ffmpeg exited with 1".into()));
        assert_eq!(state.status, StepStatus::Error);
        assert!(state.error.unwrap().contains("ffmpeg exited"));
    }

    #[test]
    fn exec_step_rejects_unmet_dependencies() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let pipeline = Pipeline::new(store, VideoId::new("vid-1"));
        let status = pipeline.status().unwrap();
        assert_eq!(
            Pipeline::step_status_of(&status, StepName::Silences),
            StepStatus::Pending
        );
    }
}
