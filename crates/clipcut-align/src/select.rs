//! Top-level orchestration (§4.F): combine the five criteria (or the AI
//! path) into one `PreselectionScore` per segment, enforce the
//! single-enabled-take-per-span invariant, and emit the audit trail.

use clipcut_ai::{SegmentTextWindow, SemanticAnalyzer, TakeDecision, TakeSelectionQuery};
use clipcut_core::{
    Caption, ClipcutError, CriterionReasons, PreselectionScore, Result, ScoreBreakdown,
    ScoreWeights, ScriptLine, Segment, TakeCandidate,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::scoring;
use crate::takes::{self, TakeGroup};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Deterministic,
    AiAssisted,
    AiFirst,
}

pub struct AlignInput<'a> {
    pub captions: &'a [Caption],
    pub segments: &'a [Segment],
    pub script_lines: Option<&'a [ScriptLine]>,
    pub weights: ScoreWeights,
    pub mode: SelectionMode,
    pub min_score: f64,
}

/// The AI path's audit record (§4.F "AI-first mode"), persisted alongside
/// the `PreselectionScore`s in the `take-selection` step's artifact (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiPreselectionTrace {
    pub decisions: Vec<TakeDecision>,
    pub summary: String,
    pub warnings: Vec<String>,
}

pub struct SelectionOutput {
    /// One score per segment, in the same order as `segments`.
    pub scores: Vec<PreselectionScore>,
    pub candidates: Vec<TakeCandidate>,
    pub ai_trace: Option<AiPreselectionTrace>,
}

const DEFAULT_SIN_ANALISIS: &str = "sin análisis";

pub async fn select_takes(
    input: &AlignInput<'_>,
    analyzer: Option<&dyn SemanticAnalyzer>,
) -> Result<SelectionOutput> {
    let windows: Vec<Vec<&Caption>> = input
        .segments
        .iter()
        .map(|s| takes::window_for_segment(s, input.captions))
        .collect();
    let window_texts: Vec<String> = windows.iter().map(|w| takes::window_text(w)).collect();

    let script_matches: Vec<(f64, Option<(usize, usize)>)> = window_texts
        .iter()
        .map(|text| scoring::script_match_score(text, input.script_lines))
        .collect();
    let spans: Vec<Option<(usize, usize)>> = script_matches.iter().map(|(_, s)| *s).collect();
    let groups = takes::group_by_span(input.segments, &spans);

    let coverage_scores: Vec<f64> = script_matches.iter().map(|(score, _)| *score).collect();
    let candidates = takes::build_candidates(input.segments, &groups, &coverage_scores);

    let mut ranks = vec![(0usize, 1usize); input.segments.len()];
    for group in &groups {
        let total = group.members.len();
        for (rank, &seg_idx) in group.members.iter().enumerate() {
            ranks[seg_idx] = (rank, total);
        }
    }

    let mut scores: Vec<PreselectionScore> = Vec::with_capacity(input.segments.len());
    for (i, segment) in input.segments.iter().enumerate() {
        let (script_match, matched_span) = script_matches[i];
        let whisper_confidence = scoring::whisper_confidence_score(&windows[i]);
        let (rank, total) = ranks[i];
        let take_order = scoring::take_order_score(rank, total);
        let completeness = scoring::completeness_score(segment, input.captions);
        let duration = scoring::duration_score(segment.duration_ms);

        let breakdown = ScoreBreakdown {
            script_match,
            whisper_confidence,
            take_order,
            completeness,
            duration,
        };
        let weights = effective_weights(input.weights, input.script_lines.is_some());
        let weighted = ScoreBreakdown {
            script_match: weights.script_match * breakdown.script_match,
            whisper_confidence: weights.whisper_confidence * breakdown.whisper_confidence,
            take_order: weights.take_order * breakdown.take_order,
            completeness: weights.completeness * breakdown.completeness,
            duration: weights.duration * breakdown.duration,
        };
        let total_score = (weighted.script_match
            + weighted.whisper_confidence
            + weighted.take_order
            + weighted.completeness
            + weighted.duration)
            .clamp(0.0, 100.0);

        let criterion_reasons = CriterionReasons {
            script_match: match matched_span {
                Some((lo, hi)) => format!("best match: script lines {lo}-{hi}, coverage {script_match:.0}%"),
                None => "no script present, default 60".to_string(),
            },
            whisper_confidence: if windows[i].iter().any(|c| c.confidence.is_some()) {
                format!("mean confidence over {} tokens", windows[i].len())
            } else {
                "no confidence data, default 80".to_string()
            },
            take_order: format!("take {} of {}", rank + 1, total),
            completeness: format!("completeness {completeness:.0}/100 at segment boundaries"),
            duration: format!("duration {}ms against ideal 2000-12000ms", segment.duration_ms),
        };

        scores.push(PreselectionScore {
            segment_id: segment.index,
            total: total_score,
            breakdown,
            weighted,
            reason: format!("deterministic score {total_score:.1}"),
            criterion_reasons,
            enabled: false, // resolved below, uniformly across modes
        });
    }

    if !matches!(input.mode, SelectionMode::Deterministic) && analyzer.is_none() {
        return Err(ClipcutError::Validation(
            "ai-assisted/ai-first mode requires a SemanticAnalyzer".to_string(),
        ));
    }

    let ai_trace = match input.mode {
        SelectionMode::Deterministic => None,
        SelectionMode::AiAssisted => match run_ai_pass(input, &window_texts, analyzer).await {
            Ok(trace) => {
                apply_ai_trace(&mut scores, &trace);
                Some(trace)
            }
            Err(e) => {
                warn!(error = %e, "ai-assisted analysis failed, falling back to deterministic scores");
                Some(AiPreselectionTrace {
                    decisions: Vec::new(),
                    summary: "AI call failed; using deterministic scores".to_string(),
                    warnings: vec![format!("AI call failed: {e}")],
                })
            }
        },
        SelectionMode::AiFirst => {
            let trace = match run_ai_pass(input, &window_texts, analyzer).await {
                Ok(trace) => trace,
                Err(_) => run_ai_pass(input, &window_texts, analyzer).await.map_err(|e| {
                    ClipcutError::Analysis {
                        provider: "semantic-analyzer".to_string(),
                        cause: e.to_string(),
                    }
                })?,
            };
            apply_ai_trace(&mut scores, &trace);
            Some(trace)
        }
    };

    resolve_enabled(&mut scores, &groups, input.min_score, input.segments);

    Ok(SelectionOutput {
        scores,
        candidates,
        ai_trace,
    })
}

/// Renormalise weights when no script is present, per §4.F failure
/// semantics: `scriptMatch` is omitted from the weighted sum and the
/// remainder is renormalised to still sum to 1.
fn effective_weights(weights: ScoreWeights, has_script: bool) -> ScoreWeights {
    if has_script {
        return weights;
    }
    let remainder = 1.0 - weights.script_match;
    if remainder <= 0.0 {
        return weights;
    }
    ScoreWeights {
        script_match: 0.0,
        whisper_confidence: weights.whisper_confidence / remainder,
        take_order: weights.take_order / remainder,
        completeness: weights.completeness / remainder,
        duration: weights.duration / remainder,
    }
}

async fn run_ai_pass(
    input: &AlignInput<'_>,
    window_texts: &[String],
    analyzer: Option<&dyn SemanticAnalyzer>,
) -> std::result::Result<AiPreselectionTrace, clipcut_ai::AiError> {
    let analyzer = analyzer.expect("checked by caller before entering run_ai_pass");
    let query = TakeSelectionQuery {
        segments: input
            .segments
            .iter()
            .zip(window_texts.iter())
            .map(|(s, text)| SegmentTextWindow {
                segment_id: s.index,
                start_ms: s.start_ms,
                end_ms: s.end_ms,
                text: text.clone(),
            })
            .collect(),
        script_lines: input.script_lines.map(|s| s.to_vec()).unwrap_or_default(),
    };
    let result = analyzer.select_takes(&query).await?;
    Ok(AiPreselectionTrace {
        decisions: result.decisions,
        summary: result.summary,
        warnings: result.warnings,
    })
}

/// Overlay AI decisions onto the deterministic scaffolding: total/enabled
/// come from the AI, and every breakdown/criterion-reason field the AI
/// did not itself compute defaults to 50 / "sin análisis" per §4.F.
fn apply_ai_trace(scores: &mut [PreselectionScore], trace: &AiPreselectionTrace) {
    for decision in &trace.decisions {
        if let Some(score) = scores.iter_mut().find(|s| s.segment_id == decision.segment_id) {
            score.total = decision.score.clamp(0.0, 100.0);
            score.reason = decision.reason.clone();
            score.breakdown = ScoreBreakdown {
                script_match: 50.0,
                whisper_confidence: 50.0,
                take_order: 50.0,
                completeness: 50.0,
                duration: 50.0,
            };
            score.weighted = score.breakdown;
            score.criterion_reasons = CriterionReasons {
                script_match: DEFAULT_SIN_ANALISIS.to_string(),
                whisper_confidence: DEFAULT_SIN_ANALISIS.to_string(),
                take_order: DEFAULT_SIN_ANALISIS.to_string(),
                completeness: DEFAULT_SIN_ANALISIS.to_string(),
                duration: DEFAULT_SIN_ANALISIS.to_string(),
            };
        }
    }
}

/// A segment is enabled iff its total clears `min_score` and, among any
/// other candidates in the same span, it has the maximum total (later
/// `startMs` wins ties). Applied uniformly regardless of which mode
/// produced the scores, so the §8 uniqueness invariant always holds.
fn resolve_enabled(
    scores: &mut [PreselectionScore],
    groups: &[TakeGroup],
    min_score: f64,
    segments: &[Segment],
) {
    for group in groups {
        let winner = group
            .members
            .iter()
            .copied()
            .filter(|&i| scores[i].total >= min_score)
            .max_by(|&a, &b| {
                scores[a]
                    .total
                    .partial_cmp(&scores[b].total)
                    .unwrap()
                    .then(segments[a].start_ms.cmp(&segments[b].start_ms))
            });
        for &i in &group.members {
            scores[i].enabled = Some(i) == winner;
        }
    }
}
