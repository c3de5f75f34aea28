//! On-disk artifact layout (§6): `status/<videoId>.json` for the
//! `PipelineStatus`, `artifacts/<videoId>/<step>.json` for each step's
//! `StepResult`. Every write goes through write-temp-then-atomic-rename
//! (§5 "Shared resources") so a crash mid-write never leaves a half-written
//! file where a reader expects a complete one.

use std::fs;
use std::path::{Path, PathBuf};

use clipcut_core::{ClipcutError, PipelineStatus, Result, StepName, VideoId};
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn status_dir(&self) -> PathBuf {
        self.root.join("status")
    }

    pub fn artifacts_dir(&self, video_id: &VideoId) -> PathBuf {
        self.root.join("artifacts").join(video_id.as_str())
    }

    pub fn status_path(&self, video_id: &VideoId) -> PathBuf {
        self.status_dir().join(format!("{}.json", video_id.as_str()))
    }

    pub fn artifact_path(&self, video_id: &VideoId, step: StepName) -> PathBuf {
        self.artifacts_dir(video_id).join(format!("{}.json", step.as_str()))
    }

    /// The rendered cut's media output path. Referenced, not embedded, by
    /// the `cut` step's artifact JSON.
    pub fn cut_output_path(&self, video_id: &VideoId) -> PathBuf {
        self.artifacts_dir(video_id)
            .join(format!("{}_cut.mp4", video_id.as_str()))
    }

    pub fn rendered_output_path(&self, video_id: &VideoId) -> PathBuf {
        self.artifacts_dir(video_id)
            .join(format!("{}_rendered.mp4", video_id.as_str()))
    }

    pub fn load_status(&self, video_id: &VideoId) -> Result<Option<PipelineStatus>> {
        read_json(&self.status_path(video_id))
    }

    pub fn save_status(&self, status: &PipelineStatus) -> Result<()> {
        let video_id = VideoId::new(status.video_id.clone());
        fs::create_dir_all(self.status_dir())?;
        write_json_atomic(&self.status_path(&video_id), status)
    }

    pub fn load_artifact(&self, video_id: &VideoId, step: StepName) -> Result<Option<serde_json::Value>> {
        read_json(&self.artifact_path(video_id, step))
    }

    pub fn save_artifact(&self, video_id: &VideoId, step: StepName, value: &serde_json::Value) -> Result<()> {
        fs::create_dir_all(self.artifacts_dir(video_id))?;
        write_json_atomic(&self.artifact_path(video_id, step), value)
    }

    pub fn delete_artifact(&self, video_id: &VideoId, step: StepName) -> Result<bool> {
        let path = self.artifact_path(video_id, step);
        if path.exists() {
            fs::remove_file(&path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let bytes = fs::read(path)?;
    Ok(Some(serde_json::from_slice(&bytes)?))
}

/// Write `value` to a temp file in the same directory as `path`, then
/// rename it into place. Same-directory rename is atomic on POSIX and NTFS;
/// a reader either sees the old complete file or the new complete file,
/// never a partial write.
fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let dir = path.parent().ok_or_else(|| {
        ClipcutError::Internal(format!("artifact path has no parent: {}", path.display()))
    })?;
    fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut tmp, value)?;
    tmp.persist(path).map_err(|e| ClipcutError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipcut_core::StepState;
    use std::collections::HashMap;

    fn sample_status(video_id: &str) -> PipelineStatus {
        let mut steps = HashMap::new();
        steps.insert(StepName::Raw.as_str().to_string(), StepState::pending());
        PipelineStatus {
            video_id: video_id.to_string(),
            filename: "clip.mp4".to_string(),
            steps,
            updated_at: "2026-01-01T00:00:00Z".to_string(),
            input_digests: HashMap::new(),
        }
    }

    #[test]
    fn status_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let status = sample_status("vid-1");
        store.save_status(&status).unwrap();

        let loaded = store.load_status(&VideoId::new("vid-1")).unwrap().unwrap();
        assert_eq!(loaded.video_id, "vid-1");
    }

    #[test]
    fn missing_status_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        assert!(store.load_status(&VideoId::new("nope")).unwrap().is_none());
    }

    #[test]
    fn artifact_roundtrips_and_deletes() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let video_id = VideoId::new("vid-1");
        let value = serde_json::json!({"hello": "world"});
        store.save_artifact(&video_id, StepName::Silences, &value).unwrap();

        let loaded = store.load_artifact(&video_id, StepName::Silences).unwrap().unwrap();
        assert_eq!(loaded, value);

        assert!(store.delete_artifact(&video_id, StepName::Silences).unwrap());
        assert!(store.load_artifact(&video_id, StepName::Silences).unwrap().is_none());
        assert!(!store.delete_artifact(&video_id, StepName::Silences).unwrap());
    }
}
