//! Silence Detector (§4.B).
//!
//! Runs an RMS-over-short-windows pass equivalent to an external
//! audio-analysis filter: emit every maximal interval where RMS is
//! continuously below `threshold_db` and whose duration is at least
//! `min_duration_sec`.

use clipcut_core::{ClipcutError, Result, SilenceRange};
use ffmpeg_sidecar::command::FfmpegCommand;
use std::io::Read;
use std::path::Path;

const DECODE_SAMPLE_RATE: u32 = 48_000;

/// Detector configuration. Defaults per the config surface (§6).
#[derive(Debug, Clone, Copy)]
pub struct SilenceConfig {
    pub threshold_db: f32,
    pub min_duration_sec: f32,
}

impl Default for SilenceConfig {
    fn default() -> Self {
        Self {
            threshold_db: -35.0,
            min_duration_sec: 0.5,
        }
    }
}

/// Decode `path` to mono PCM and detect silences in it.
pub fn detect_silence_in_file(path: &Path, config: SilenceConfig) -> Result<Vec<SilenceRange>> {
    if !path.exists() {
        return Err(ClipcutError::Media(format!(
            "file not found: {}",
            path.display()
        )));
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
    let _ = child.wait();

    let samples: Vec<f32> = raw
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();

    Ok(detect_silence(&samples, DECODE_SAMPLE_RATE, config))
}

/// Detect silence ranges over already-decoded mono samples. Pure function,
/// the part of this component that is actually tested directly.
pub fn detect_silence(samples: &[f32], sample_rate: u32, config: SilenceConfig) -> Vec<SilenceRange> {
    if samples.is_empty() || sample_rate == 0 {
        return Vec::new();
    }

    let threshold_linear = 10.0_f32.powf(config.threshold_db / 20.0);
    let window_size = (sample_rate / 20).max(1) as usize; // ~50ms windows

    let mut ranges = Vec::new();
    let mut silence_start: Option<usize> = None;

    let num_windows = samples.len().div_ceil(window_size);
    for w in 0..num_windows {
        let start = w * window_size;
        let end = (start + window_size).min(samples.len());
        let window = &samples[start..end];

        let rms = rms_of(window);
        let is_silent = rms < threshold_linear;

        if is_silent {
            silence_start.get_or_insert(start);
        } else if let Some(s) = silence_start.take() {
            push_if_long_enough(&mut ranges, s, start, sample_rate, config.min_duration_sec);
        }
    }
    if let Some(s) = silence_start {
        push_if_long_enough(&mut ranges, s, samples.len(), sample_rate, config.min_duration_sec);
    }

    ranges
}

fn rms_of(window: &[f32]) -> f32 {
    if window.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = window.iter().map(|s| s * s).sum();
    (sum_sq / window.len() as f32).sqrt()
}

fn push_if_long_enough(
    ranges: &mut Vec<SilenceRange>,
    start_sample: usize,
    end_sample: usize,
    sample_rate: u32,
    min_duration_sec: f32,
) {
    let start_sec = start_sample as f64 / sample_rate as f64;
    let end_sec = end_sample as f64 / sample_rate as f64;
    let duration_sec = end_sec - start_sec;
    if duration_sec >= min_duration_sec as f64 {
        ranges.push(SilenceRange {
            start_sec,
            end_sec,
            duration_sec,
        });
    }
}
