//! Progress transport (§4.I "Progress transport", §5 "Backpressure").
//!
//! The engine is transport-agnostic; this is the bounded channel a shell
//! adapter (SSE, or the CLI's own stdout) drains. A 30s stall without a
//! drain fails the step with `TransportStalled` rather than blocking
//! forever.

use std::time::Duration;

use clipcut_core::{ClipcutError, Result, StepName};
use serde::Serialize;
use tokio::sync::mpsc;

/// Bounded per §9: large enough that a step's sub-phase progress ticks
/// don't stall on a slow consumer, small enough that a stuck consumer is
/// detected within one `STALL_TIMEOUT` window.
pub const CHANNEL_CAPACITY: usize = 64;

pub const STALL_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
#[allow(clippy::large_enum_variant)]
pub enum ProgressEvent {
    /// `progress ∈ [0,100]`, weighted so it is monotonic non-decreasing
    /// across a step's sub-phases.
    Progress { step: StepName, progress: u8, message: String },
    Log { step: StepName, message: String },
    Complete { step: StepName, result: serde_json::Value },
    Error { step: StepName, message: String },
    /// Emitted once by `executeUntil`, with the count of steps run.
    Done { steps_run: usize },
}

pub type Sender = mpsc::Sender<ProgressEvent>;
pub type Receiver = mpsc::Receiver<ProgressEvent>;

pub fn channel() -> (Sender, Receiver) {
    mpsc::channel(CHANNEL_CAPACITY)
}

/// Send one event, failing with `TransportStalled` if the consumer hasn't
/// drained within [`STALL_TIMEOUT`].
pub async fn send(tx: &Sender, event: ProgressEvent) -> Result<()> {
    match tokio::time::timeout(STALL_TIMEOUT, tx.send(event)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(_)) => Err(ClipcutError::Internal(
            "progress channel closed before step completed".to_string(),
        )),
        Err(_) => Err(ClipcutError::TransportStalled(STALL_TIMEOUT)),
    }
}

pub async fn progress(tx: &Sender, step: StepName, pct: u8, message: impl Into<String>) -> Result<()> {
    send(
        tx,
        ProgressEvent::Progress {
            step,
            progress: pct.min(100),
            message: message.into(),
        },
    )
    .await
}

pub async fn log(tx: &Sender, step: StepName, message: impl Into<String>) -> Result<()> {
    send(tx, ProgressEvent::Log { step, message: message.into() }).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_and_receive_roundtrip() {
        let (tx, mut rx) = channel();
        progress(&tx, StepName::Raw, 50, "halfway").await.unwrap();
        match rx.recv().await.unwrap() {
            ProgressEvent::Progress { step, progress, .. } => {
                assert_eq!(step, StepName::Raw);
                assert_eq!(progress, 50);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn progress_clamps_above_100() {
        let (tx, mut rx) = channel();
        progress(&tx, StepName::Raw, 255, "overshoot").await.unwrap();
        match rx.recv().await.unwrap() {
            ProgressEvent::Progress { progress, .. } => assert_eq!(progress, 100),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
