//! clipcut-media — the Media Probe & Transcode Adapter (§4.A).
//!
//! A thin, well-specified port to an external ffmpeg process: probe
//! duration, extract a normalised waveform, render the keep-segment cut.
//! No decoding, no playback, no GPU path — those are out of scope.

pub mod cancel;
pub mod probe;
pub mod render_cut;
pub mod waveform;

pub use cancel::Cancel;
pub use probe::probe_duration;
pub use render_cut::render_cut;
pub use waveform::{extract_waveform, validate_against_probe, WaveformData};

/// Check that the ffmpeg binary this adapter shells out to is reachable.
pub fn init() {
    tracing::info!("clipcut-media: ffmpeg adapter ready");
}
