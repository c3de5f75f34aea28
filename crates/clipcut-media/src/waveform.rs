//! `extractWaveform(path, samplesPerSecond) → {samples[0..1], sampleRate, durationSec}`.
//!
//! Decodes mono PCM via ffmpeg and downsamples by peak magnitude per bucket,
//! the way the reduction in a visual waveform display works, except the
//! contract here calls for a resolution in samples-per-second rather than
//! samples-per-pixel, and the output must already be normalised to `[0,1]`
//! (ffmpeg's `f32le` PCM is already in `[-1,1]`, so normalising is just
//! taking the absolute value of the peak).

use crate::cancel::Cancel;
use clipcut_core::{ClipcutError, Result};
use ffmpeg_sidecar::command::FfmpegCommand;
use std::io::Read;
use std::path::Path;

/// Internal decode sample rate; high enough that any requested
/// `samples_per_second` divides it cleanly enough for bucketing.
const DECODE_SAMPLE_RATE: u32 = 48_000;

/// Result of `extractWaveform`.
#[derive(Debug, Clone)]
pub struct WaveformData {
    /// Peak magnitude per bucket, each in `[0, 1]`.
    pub samples: Vec<f32>,
    /// Resolution of `samples`, in samples per second.
    pub sample_rate: u32,
    /// Duration implied by `samples.len() / sample_rate`.
    pub duration_sec: f64,
}

/// Extract a downsampled, normalised waveform from the audio in `path`.
pub fn extract_waveform(
    path: &Path,
    samples_per_second: u32,
    cancel: &Cancel,
) -> Result<WaveformData> {
    if samples_per_second == 0 {
        return Err(ClipcutError::Validation(
            "samplesPerSecond must be > 0".into(),
        ));
    }

    let mut child = FfmpegCommand::new()
        .input(path.to_string_lossy().to_string())
        .args([
            "-vn",
            "-ac",
            "1",
            "-ar",
            &DECODE_SAMPLE_RATE.to_string(),
            "-f",
            "f32le",
            "pipe:1",
        ])
        .spawn()
        .map_err(|e| ClipcutError::Media(format!("failed to spawn ffmpeg: {e}")))?;

    let mut raw = Vec::new();
    if let Some(mut pipe) = child.take_stdout() {
        pipe.read_to_end(&mut raw)
            .map_err(|e| ClipcutError::Media(format!("failed to read ffmpeg audio: {e}")))?;
    }

    if cancel.is_cancelled() {
        let _ = child.kill();
        return Err(ClipcutError::Cancelled);
    }
    let _ = child.wait();

    let pcm: Vec<f32> = raw
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();

    let bucket_size = (DECODE_SAMPLE_RATE / samples_per_second).max(1) as usize;
    let samples = downsample_peak(&pcm, bucket_size, cancel)?;
    let duration_sec = samples.len() as f64 / samples_per_second as f64;

    Ok(WaveformData {
        samples,
        sample_rate: samples_per_second,
        duration_sec,
    })
}

fn downsample_peak(pcm: &[f32], bucket_size: usize, cancel: &Cancel) -> Result<Vec<f32>> {
    let mut out = Vec::with_capacity(pcm.len() / bucket_size.max(1) + 1);
    for chunk in pcm.chunks(bucket_size.max(1)) {
        if cancel.is_cancelled() {
            return Err(ClipcutError::Cancelled);
        }
        let peak = chunk.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
        out.push(peak.min(1.0));
    }
    Ok(out)
}

/// Validate a waveform's implied duration against the probed duration and,
/// if within the tolerated band, return the rescale factor the caller
/// should apply to `samplesPerMs` to align the two.
///
/// Returns `Err` if the mismatch exceeds 5%.
pub fn validate_against_probe(waveform_duration_ms: f64, probed_duration_ms: f64) -> Result<f64> {
    if probed_duration_ms <= 0.0 {
        return Err(ClipcutError::Validation(
            "probed duration must be positive".into(),
        ));
    }
    let diff = (waveform_duration_ms - probed_duration_ms).abs();
    let ratio = diff / probed_duration_ms;
    if ratio > 0.05 {
        return Err(ClipcutError::Media(format!(
            "waveform duration {waveform_duration_ms}ms diverges from probed duration {probed_duration_ms}ms by {:.1}%",
            ratio * 100.0
        )));
    }
    if diff <= 50.0 {
        return Ok(1.0);
    }
    Ok(waveform_duration_ms / probed_duration_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downsample_produces_expected_bucket_count() {
        let pcm = vec![0.0f32; 48_000];
        let cancel = Cancel::new();
        let samples = downsample_peak(&pcm, 480, &cancel).unwrap();
        assert_eq!(samples.len(), 100);
    }

    #[test]
    fn downsample_clamps_to_unit_range() {
        let pcm = vec![2.0f32, -3.0f32];
        let cancel = Cancel::new();
        let samples = downsample_peak(&pcm, 2, &cancel).unwrap();
        assert_eq!(samples, vec![1.0]);
    }

    #[test]
    fn validate_within_tolerance_passes_through() {
        let factor = validate_against_probe(10_010.0, 10_000.0).unwrap();
        assert_eq!(factor, 1.0);
    }

    #[test]
    fn validate_beyond_floor_rescales() {
        let factor = validate_against_probe(9_800.0, 10_000.0).unwrap();
        assert!((factor - 0.98).abs() < 1e-9);
    }

    #[test]
    fn validate_beyond_five_percent_errors() {
        let result = validate_against_probe(9_000.0, 10_000.0);
        assert!(result.is_err());
    }

    #[test]
    fn cancelled_downsample_aborts() {
        let pcm = vec![0.0f32; 1000];
        let cancel = Cancel::new();
        cancel.cancel();
        assert!(downsample_peak(&pcm, 10, &cancel).is_err());
    }
}
