//! The five deterministic scoring criteria (§4.F "Deterministic scoring").
//!
//! Each function returns a value in `[0,100]`; `select_takes` (in `select.rs`)
//! combines them into a `ScoreBreakdown` and applies the configured weights.

use clipcut_core::{Caption, Ms, ScriptLine, Segment};

use crate::trigram;

/// `scriptMatch`: best-matching contiguous span of script lines, by
/// trigram-shingle coverage. Returns `(score, matched span as (first, last)
/// line index, inclusive)`. Defaults to `(60.0, None)` when no script is
/// supplied.
pub fn script_match_score(window_text: &str, script_lines: Option<&[ScriptLine]>) -> (f64, Option<(usize, usize)>) {
    let Some(lines) = script_lines else {
        return (60.0, None);
    };
    if lines.is_empty() || window_text.trim().is_empty() {
        return (60.0, None);
    }

    let mut best_score = 0.0;
    let mut best_span = None;
    for start in 0..lines.len() {
        let mut span_text = String::new();
        for end in start..lines.len() {
            if end > start {
                span_text.push(' ');
            }
            span_text.push_str(&lines[end].text);
            let score = trigram::coverage(window_text, &span_text) * 100.0;
            if score > best_score {
                best_score = score;
                best_span = Some((start, end));
            }
        }
    }
    (best_score, best_span)
}

/// `whisperConfidence`: mean token confidence scaled to `[0,100]`, or `80.0`
/// when no token in the window carries a confidence value.
pub fn whisper_confidence_score(window: &[&Caption]) -> f64 {
    let values: Vec<f64> = window.iter().filter_map(|c| c.confidence).collect();
    if values.is_empty() {
        return 80.0;
    }
    (values.iter().sum::<f64>() / values.len() as f64) * 100.0
}

/// `takeOrder`: `rank` is this candidate's 0-based chronological position
/// among `total` candidates mapped to the same script span. Singletons
/// score 100; otherwise linear from 60 (earliest) to 100 (latest).
pub fn take_order_score(rank: usize, total: usize) -> f64 {
    if total <= 1 {
        return 100.0;
    }
    60.0 + 40.0 * (rank as f64 / (total - 1) as f64)
}

const FULL_CREDIT_MS: f64 = 150.0;
const ZERO_CREDIT_MS: f64 = 1000.0;

/// Partial credit for one boundary: full 50 within 150ms, ramping linearly
/// to 0 by 1000ms.
fn boundary_component(distance_ms: Ms) -> f64 {
    let d = distance_ms as f64;
    if d <= FULL_CREDIT_MS {
        50.0
    } else if d >= ZERO_CREDIT_MS {
        0.0
    } else {
        50.0 * (1.0 - (d - FULL_CREDIT_MS) / (ZERO_CREDIT_MS - FULL_CREDIT_MS))
    }
}

/// `completeness`: boundary score. The start component is zeroed if the
/// segment start falls strictly inside a caption token's span ("mid-word")
/// rather than near a token boundary.
pub fn completeness_score(segment: &Segment, captions: &[Caption]) -> f64 {
    let mid_word = captions
        .iter()
        .any(|c| c.start_ms < segment.start_ms && segment.start_ms < c.end_ms);

    let start_component = if mid_word {
        0.0
    } else {
        let nearest = captions
            .iter()
            .map(|c| (c.start_ms - segment.start_ms).abs())
            .min()
            .unwrap_or(Ms::MAX);
        boundary_component(nearest)
    };

    let nearest_end = captions
        .iter()
        .map(|c| (c.end_ms - segment.end_ms).abs())
        .min()
        .unwrap_or(Ms::MAX);
    let end_component = boundary_component(nearest_end);

    (start_component + end_component).min(100.0)
}

const IDEAL_LOW_MS: f64 = 2000.0;
const IDEAL_HIGH_MS: f64 = 12000.0;
const MIN_MS: f64 = 500.0;
const MAX_MS: f64 = 25000.0;

/// `duration`: triangular score over the ideal duration range.
pub fn duration_score(duration_ms: Ms) -> f64 {
    let d = duration_ms as f64;
    if d < MIN_MS || d > MAX_MS {
        return 0.0;
    }
    if d < IDEAL_LOW_MS {
        return 100.0 * (d - MIN_MS) / (IDEAL_LOW_MS - MIN_MS);
    }
    if d <= IDEAL_HIGH_MS {
        return 100.0;
    }
    100.0 * (1.0 - (d - IDEAL_HIGH_MS) / (MAX_MS - IDEAL_HIGH_MS))
}
