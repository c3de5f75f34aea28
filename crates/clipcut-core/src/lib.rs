//! clipcut-core — foundation types for the clipcut pipeline engine.
//!
//! Shared across every other crate: the error taxonomy, stable content
//! hashing for artifact digests, step/video identifiers, millisecond time
//! helpers, and the snapshot-based undo history used by editor state.

pub mod digest;
pub mod error;
pub mod ids;
pub mod model;
pub mod time;
pub mod undo;

pub use digest::{digest_value, Digest};
pub use error::{ClipcutError, Result};
pub use ids::{StepName, VideoId};
pub use time::{clamp_ms, ms_to_sec, sec_to_ms, Ms};
pub use undo::SnapshotHistory;

pub use model::*;
