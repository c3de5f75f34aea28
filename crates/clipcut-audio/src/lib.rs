//! clipcut-audio — Silence Detector and Segment Builder (§4.B, §4.C).
//!
//! Given an audio file, `silence` measures low-energy intervals; `segment`
//! inverts them into the keep-segment list the cut step renders from, plus
//! the editor mutations (`resize`, `toggle`, `add`) exposed to the UI layer.

pub mod segment;
pub mod silence;

pub use segment::{
    add, build_segments, build_segments_sentence_aware, resize, toggle, ResizeField,
    SegmentBuildResult, SentenceAwareBuildResult,
};
pub use silence::{detect_silence_in_file, SilenceConfig};
