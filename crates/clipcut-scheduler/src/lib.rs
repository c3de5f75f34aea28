//! Pipeline Scheduler (§4.I, §5, §6): dependency-ordered step execution,
//! artifact caching keyed by content digest, progress streaming, and
//! reset-with-cascade over the eleven-step video post-production DAG
//! defined in `clipcut_core::StepName`.

mod artifact_store;
mod cancel;
mod config;
mod context;
mod digest;
mod pipeline;
mod progress;
mod registry;
mod steps;

pub use artifact_store::ArtifactStore;
pub use cancel::Cancel;
pub use config::{PipelineConfig, SilenceSettings, TakeSelectionMode, TakeSelectionSettings};
pub use context::ExecContext;
pub use pipeline::Pipeline;
pub use progress::{channel, ProgressEvent, Receiver, Sender, CHANNEL_CAPACITY, STALL_TIMEOUT};
pub use registry::{topological_ancestors, transitive_dependents};

pub use clipcut_core::{ClipcutError, Result, StepName};
