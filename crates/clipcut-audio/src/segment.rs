//! Segment Builder (§4.C).
//!
//! Inverts a sorted, non-overlapping silence list into keep-segments with
//! padding, then exposes the editor mutations (`resize`, `toggle`, `add`)
//! that operate on the resulting segment list afterwards.

use clipcut_core::{ClipcutError, Ms, Result, Segment, SilenceRange};

const MIN_SEGMENT_MS: Ms = 100;

/// Output of `build_segments`: the keep list plus the summary numbers the
/// `segments` step's artifact payload reports.
#[derive(Debug, Clone)]
pub struct SegmentBuildResult {
    pub segments: Vec<Segment>,
    pub total_duration_ms: Ms,
    pub edited_duration_ms: Ms,
    pub time_saved_ms: Ms,
    pub percent_saved: f64,
}

/// `build_segments` plus whether a sentence-boundary classifier actually
/// had an opinion on any silence (`usedSemanticAnalysis` in the `segments`
/// artifact, per §9: the hint never blocks building segments).
#[derive(Debug, Clone)]
pub struct SentenceAwareBuildResult {
    pub build: SegmentBuildResult,
    pub used_semantic_analysis: bool,
}

/// Sentence-aware variant of `build_segments` (§4.C optional enhancement).
///
/// `classifier(silence)` returns `Some(true)` when the silence sits at a
/// sentence boundary (cuttable), `Some(false)` when it is an inter-word
/// pause inside a sentence (must not be cut), or `None` when it has no
/// opinion (the silence is cut as if no classifier were supplied). This
/// crate does not depend on the alignment crate that supplies the
/// classifier — it is passed in as a closure to avoid a cyclic dependency.
pub fn build_segments_sentence_aware(
    silences: &[SilenceRange],
    duration_ms: Ms,
    padding_sec: f64,
    mut classifier: impl FnMut(&SilenceRange) -> Option<bool>,
) -> SentenceAwareBuildResult {
    let mut used_semantic_analysis = false;
    let cuttable: Vec<SilenceRange> = silences
        .iter()
        .filter(|s| match classifier(s) {
            Some(at_boundary) => {
                used_semantic_analysis = true;
                at_boundary
            }
            None => true,
        })
        .copied()
        .collect();

    SentenceAwareBuildResult {
        build: build_segments(&cuttable, duration_ms, padding_sec),
        used_semantic_analysis,
    }
}

/// Place a cursor at 0 and, for each silence in order, emit a keep-segment
/// up to `silence.start − padding`, then advance the cursor past
/// `silence.end + padding`. Emit a final segment to `duration_ms`.
pub fn build_segments(silences: &[SilenceRange], duration_ms: Ms, padding_sec: f64) -> SegmentBuildResult {
    let padding_ms = (padding_sec * 1000.0).round() as Ms;
    let mut segments = Vec::new();
    let mut cursor: Ms = 0;

    for silence in silences {
        let silence_start_ms = (silence.start_sec * 1000.0).round() as Ms;
        let silence_end_ms = (silence.end_sec * 1000.0).round() as Ms;

        let seg_end = (silence_start_ms - padding_ms).max(cursor);
        push_if_long_enough(&mut segments, cursor, seg_end);

        cursor = (silence_end_ms + padding_ms).max(cursor);
    }
    push_if_long_enough(&mut segments, cursor, duration_ms);

    for (i, seg) in segments.iter_mut().enumerate() {
        seg.index = i;
    }

    let edited_duration_ms: Ms = segments.iter().map(|s| s.duration_ms).sum();
    let time_saved_ms = (duration_ms - edited_duration_ms).max(0);
    let percent_saved = if duration_ms > 0 {
        time_saved_ms as f64 / duration_ms as f64 * 100.0
    } else {
        0.0
    };

    SegmentBuildResult {
        segments,
        total_duration_ms: duration_ms,
        edited_duration_ms,
        time_saved_ms,
        percent_saved,
    }
}

/// A zero-length or inverted candidate interval is dropped rather than
/// emitted — this is how boundary-touching silences and padding that
/// inverts an interval both resolve to "no segment" per the edge cases.
fn push_if_long_enough(segments: &mut Vec<Segment>, start_ms: Ms, end_ms: Ms) {
    if end_ms - start_ms >= MIN_SEGMENT_MS {
        segments.push(Segment::new(segments.len(), start_ms, end_ms));
    }
}

/// Resize a segment's `startMs` or `endMs`, clamped to `[0, durationMs]`,
/// preserving a 100ms minimum duration, and never crossing into a neighbor
/// (segments stay sorted and non-overlapping after the edit, per §3).
pub fn resize(
    segments: &mut [Segment],
    segment_id: usize,
    field: ResizeField,
    value: Ms,
    duration_ms: Ms,
) -> Result<()> {
    let pos = segments
        .iter()
        .position(|s| s.index == segment_id)
        .ok_or_else(|| ClipcutError::Validation(format!("no segment with index {segment_id}")))?;
    let (seg_start, seg_end) = (segments[pos].start_ms, segments[pos].end_ms);
    let clamped = value.clamp(0, duration_ms);

    match field {
        ResizeField::Start => {
            let floor = segments
                .iter()
                .filter(|s| s.index != segment_id && s.end_ms <= seg_start)
                .map(|s| s.end_ms)
                .max()
                .unwrap_or(0);
            segments[pos].start_ms = clamped.max(floor).min(seg_end - MIN_SEGMENT_MS);
        }
        ResizeField::End => {
            let ceiling = segments
                .iter()
                .filter(|s| s.index != segment_id && s.start_ms >= seg_end)
                .map(|s| s.start_ms)
                .min()
                .unwrap_or(duration_ms);
            segments[pos].end_ms = clamped.min(ceiling).max(seg_start + MIN_SEGMENT_MS);
        }
    }
    segments[pos].duration_ms = segments[pos].end_ms - segments[pos].start_ms;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeField {
    Start,
    End,
}

/// Flip a segment's `enabled` flag.
pub fn toggle(segments: &mut [Segment], segment_id: usize) -> Result<()> {
    let seg = segments
        .iter_mut()
        .find(|s| s.index == segment_id)
        .ok_or_else(|| ClipcutError::Validation(format!("no segment with index {segment_id}")))?;
    seg.enabled = !seg.enabled;
    Ok(())
}

/// Insert a new segment, only if `[start_ms, end_ms)` lies entirely in a gap
/// between existing segments, is at least 100ms long, and overlaps nothing.
pub fn add(segments: &mut Vec<Segment>, start_ms: Ms, end_ms: Ms) -> Result<()> {
    if end_ms - start_ms < MIN_SEGMENT_MS {
        return Err(ClipcutError::Validation(
            "new segment must be at least 100ms".into(),
        ));
    }
    for seg in segments.iter() {
        if start_ms < seg.end_ms && end_ms > seg.start_ms {
            return Err(ClipcutError::Validation(format!(
                "new segment overlaps existing segment {}",
                seg.index
            )));
        }
    }

    segments.push(Segment::new(segments.len(), start_ms, end_ms));
    segments.sort_by_key(|s| s.start_ms);
    for (i, seg) in segments.iter_mut().enumerate() {
        seg.index = i;
    }
    Ok(())
}
