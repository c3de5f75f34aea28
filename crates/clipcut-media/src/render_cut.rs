//! `renderCut(input, keepSegments[], output) → ok|error`.
//!
//! Validates the keep list, builds an ffmpeg `trim`+`concat` filter graph
//! from it, and shells out once rather than re-encoding per segment.

use crate::cancel::Cancel;
use clipcut_core::{ClipcutError, Ms, Result, Segment};
use ffmpeg_sidecar::command::FfmpegCommand;
use std::path::Path;

/// Render the segments to keep from `input` into `output`, in index order.
pub fn render_cut(
    input: &Path,
    keep_segments: &[Segment],
    output: &Path,
    cancel: &Cancel,
) -> Result<()> {
    validate_segments(keep_segments)?;

    if cancel.is_cancelled() {
        return Err(ClipcutError::Cancelled);
    }

    let filter = build_filter_graph(keep_segments);

    let mut child = FfmpegCommand::new()
        .input(input.to_string_lossy().to_string())
        .args([
            "-filter_complex",
            &filter,
            "-map",
            "[outv]",
            "-map",
            "[outa]",
            "-y",
        ])
        .output(output.to_string_lossy().to_string())
        .spawn()
        .map_err(|e| ClipcutError::Transcode(format!("failed to spawn ffmpeg: {e}")))?;

    loop {
        if cancel.is_cancelled() {
            let _ = child.kill();
            return Err(ClipcutError::Cancelled);
        }
        match child.try_wait() {
            Ok(Some(status)) => {
                if status.success() {
                    return Ok(());
                }
                return Err(ClipcutError::Transcode(format!(
                    "ffmpeg exited with {status}"
                )));
            }
            Ok(None) => std::thread::sleep(std::time::Duration::from_millis(50)),
            Err(e) => return Err(ClipcutError::Transcode(format!("ffmpeg wait failed: {e}"))),
        }
    }
}

fn validate_segments(segments: &[Segment]) -> Result<()> {
    if segments.is_empty() {
        return Err(ClipcutError::Transcode("no segments to render".into()));
    }
    let mut sorted: Vec<&Segment> = segments.iter().collect();
    sorted.sort_by_key(|s| s.start_ms);

    for s in &sorted {
        if s.start_ms >= s.end_ms {
            return Err(ClipcutError::Transcode(format!(
                "segment {} is out of bounds: start {} >= end {}",
                s.index, s.start_ms, s.end_ms
            )));
        }
    }
    for pair in sorted.windows(2) {
        if pair[1].start_ms < pair[0].end_ms {
            return Err(ClipcutError::Transcode(format!(
                "segment {} overlaps segment {}",
                pair[0].index, pair[1].index
            )));
        }
    }
    Ok(())
}

/// Build a `trim`+`concat` filter_complex string selecting each segment's
/// video and audio, in the order given, then concatenating them.
fn build_filter_graph(segments: &[Segment]) -> String {
    let mut parts = Vec::new();
    let mut labels = Vec::new();

    for (i, seg) in segments.iter().enumerate() {
        let start = ms_to_ffmpeg_seconds(seg.start_ms);
        let end = ms_to_ffmpeg_seconds(seg.end_ms);
        parts.push(format!(
            "[0:v]trim=start={start}:end={end},setpts=PTS-STARTPTS[v{i}]"
        ));
        parts.push(format!(
            "[0:a]atrim=start={start}:end={end},asetpts=PTS-STARTPTS[a{i}]"
        ));
        labels.push(format!("[v{i}][a{i}]"));
    }

    parts.push(format!(
        "{}concat=n={}:v=1:a=1[outv][outa]",
        labels.concat(),
        segments.len()
    ));
    parts.join(";")
}

fn ms_to_ffmpeg_seconds(ms: Ms) -> String {
    format!("{:.3}", ms as f64 / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(index: usize, start_ms: Ms, end_ms: Ms) -> Segment {
        Segment::new(index, start_ms, end_ms)
    }

    #[test]
    fn rejects_empty_segment_list() {
        assert!(validate_segments(&[]).is_err());
    }

    #[test]
    fn rejects_inverted_segment() {
        let bad = seg(0, 1000, 500);
        assert!(validate_segments(&[bad]).is_err());
    }

    #[test]
    fn rejects_overlapping_segments() {
        let a = seg(0, 0, 1000);
        let b = seg(1, 500, 1500);
        assert!(validate_segments(&[a, b]).is_err());
    }

    #[test]
    fn accepts_disjoint_sorted_segments() {
        let a = seg(0, 0, 1000);
        let b = seg(1, 1000, 2000);
        assert!(validate_segments(&[a, b]).is_ok());
    }

    #[test]
    fn cancelled_before_spawn_returns_cancelled_without_invoking_ffmpeg() {
        let dir = tempfile::tempdir().unwrap();
        let cancel = Cancel::new();
        cancel.cancel();
        let result = render_cut(
            &dir.path().join("missing-input.mp4"),
            &[seg(0, 0, 1000)],
            &dir.path().join("out.mp4"),
            &cancel,
        );
        assert!(matches!(result, Err(ClipcutError::Cancelled)));
    }

    #[test]
    fn filter_graph_has_one_trim_pair_per_segment() {
        let segments = vec![seg(0, 0, 1000), seg(1, 2000, 3000)];
        let graph = build_filter_graph(&segments);
        assert_eq!(graph.matches("trim").count(), 4); // trim + atrim per segment
        assert!(graph.contains("concat=n=2:v=1:a=1[outv][outa]"));
    }
}
