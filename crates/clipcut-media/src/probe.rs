//! `probeDuration(path) → ms` — the first operation of the media port.
//!
//! Shells out to ffmpeg and reads the `Duration: HH:MM:SS.cc` line ffmpeg
//! always prints to stderr when given an input with no output, rather than
//! decoding anything. This keeps the adapter a thin wrapper around the
//! external transcoder instead of a second decoder.

use clipcut_core::{ClipcutError, Ms, Result};
use ffmpeg_sidecar::command::FfmpegCommand;
use std::io::Read;
use std::path::Path;

/// Probe a media file's duration in milliseconds.
pub fn probe_duration(path: &Path) -> Result<Ms> {
    if !path.exists() {
        return Err(ClipcutError::Media(format!(
            "file not found: {}",
            path.display()
        )));
    }

    let mut child = FfmpegCommand::new()
        .input(path.to_string_lossy().to_string())
        .args(["-f", "null", "-"])
        .spawn()
        .map_err(|e| ClipcutError::Media(format!("failed to spawn ffmpeg: {e}")))?;

    let mut stderr = String::new();
    if let Some(mut pipe) = child.take_stderr() {
        pipe.read_to_string(&mut stderr)
            .map_err(|e| ClipcutError::Media(format!("failed to read ffmpeg output: {e}")))?;
    }
    let _ = child.wait();

    parse_duration_line(&stderr).ok_or_else(|| {
        ClipcutError::Media(format!(
            "could not determine duration for {}",
            path.display()
        ))
    })
}

/// Parse `Duration: HH:MM:SS.cc` out of ffmpeg's stderr banner.
fn parse_duration_line(stderr: &str) -> Option<Ms> {
    let idx = stderr.find("Duration: ")?;
    let rest = &stderr[idx + "Duration: ".len()..];
    let end = rest.find(',').unwrap_or(rest.len());
    let timecode = &rest[..end];
    parse_timecode(timecode)
}

/// Parse `HH:MM:SS.cc` into milliseconds.
fn parse_timecode(timecode: &str) -> Option<Ms> {
    let mut parts = timecode.trim().split(':');
    let hours: i64 = parts.next()?.parse().ok()?;
    let minutes: i64 = parts.next()?.parse().ok()?;
    let seconds: f64 = parts.next()?.parse().ok()?;
    Some(hours * 3_600_000 + minutes * 60_000 + (seconds * 1000.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_timecode() {
        assert_eq!(parse_timecode("00:00:10.50"), Some(10_500));
        assert_eq!(parse_timecode("01:02:03.00"), Some(3_723_000));
    }

    #[test]
    fn parses_duration_line_from_banner() {
        let banner = "Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'x.mp4':\n  Duration: 00:00:05.25, start: 0.000000, bitrate: 128 kb/s\n";
        assert_eq!(parse_duration_line(banner), Some(5_250));
    }

    #[test]
    fn missing_duration_line_returns_none() {
        assert_eq!(parse_duration_line("no duration here"), None);
    }
}
