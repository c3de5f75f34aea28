//! Everything one `execStep` call needs that isn't already on disk: the
//! input media, externally-supplied transcripts (captions-raw/captions come
//! from an out-of-scope STT adapter per §1/§2, so the caller hands them in
//! rather than the scheduler producing them), the author's script text, the
//! analyzer port, and the cancellation flag.

use std::path::Path;

use clipcut_ai::SemanticAnalyzer;
use clipcut_core::{Caption, Segment};

use crate::cancel::Cancel;
use crate::config::PipelineConfig;

pub struct ExecContext<'a> {
    pub input_path: &'a Path,
    pub config: &'a PipelineConfig,
    /// The original-timeline transcript, supplied by the external STT
    /// adapter that feeds `captions-raw`.
    pub raw_captions: Option<&'a [Caption]>,
    /// The post-cut transcript, supplied by the external STT adapter that
    /// feeds `captions` (re-transcribed from the rendered preview, per the
    /// "Caption Store (via external STT adapter)" data flow).
    pub final_captions: Option<&'a [Caption]>,
    pub script_source: Option<&'a str>,
    /// Editor overrides to the segment list built by `segments`; when
    /// absent, `cut`/`rendered` use the segments artifact as built.
    pub segment_overrides: Option<&'a [Segment]>,
    pub analyzer: Option<&'a dyn SemanticAnalyzer>,
    pub cancel: &'a Cancel,
}
