//! Rule resolution, candidate generation, conflict resolution and the rate
//! cap (§4.H). `apply_effects` is the single entry point the scheduler's
//! `effects` step calls.

use clipcut_core::{AppliedEffect, EffectRule, EffectType, EnrichedCaption, Ms};

use crate::condition;
use crate::config::{ActivePreset, EffectsConfig};
use crate::error::EffectsError;
use crate::presets;
use crate::rate_cap;

/// The minimum gap, in milliseconds, between any two accepted effects'
/// [start, effective end] intervals (§4.H "Conflict rule").
pub const MIN_EFFECT_GAP_MS: Ms = 500;

fn resolve_rules(config: &EffectsConfig) -> Vec<EffectRule> {
    let mut rules = match config.active_preset {
        ActivePreset::Balanced => presets::balanced(),
        ActivePreset::Minimal => presets::minimal(),
        ActivePreset::Aggressive => presets::aggressive(),
        ActivePreset::Custom => config.custom_rules.clone(),
    };
    rules.retain(|r| r.enabled);
    rules.sort_by(|a, b| b.priority.cmp(&a.priority));
    rules
}

fn build_candidate(rule: &EffectRule, caption: &EnrichedCaption) -> AppliedEffect {
    match rule.effect.kind {
        EffectType::Highlight => AppliedEffect {
            kind: EffectType::Highlight,
            style: rule.effect.style,
            start_ms: caption.caption.start_ms,
            end_ms: Some(caption.caption.end_ms),
            duration_ms: None,
            word: caption.caption.text.clone(),
            rule_id: rule.id.clone(),
            confidence: caption.semantic.topic_relevance,
        },
        EffectType::Zoom => AppliedEffect {
            kind: EffectType::Zoom,
            style: Some(rule.effect.style.unwrap_or(clipcut_core::EffectStyle::Punch)),
            start_ms: caption.caption.start_ms,
            end_ms: None,
            duration_ms: Some(rule.effect.duration_ms.unwrap_or(500)),
            word: caption.caption.text.clone(),
            rule_id: rule.id.clone(),
            confidence: caption.semantic.topic_relevance,
        },
    }
}

/// One candidate per caption: the first rule (in priority order) whose
/// conditions hold, if any.
fn generate_candidates(
    captions: &[EnrichedCaption],
    rules: &[EffectRule],
    threshold_multiplier: f64,
) -> Vec<AppliedEffect> {
    captions
        .iter()
        .filter_map(|caption| {
            rules
                .iter()
                .find(|rule| condition::evaluate_rule(rule, caption, threshold_multiplier))
                .map(|rule| build_candidate(rule, caption))
        })
        .collect()
}

/// The gap in ms between two `[start, end)` intervals: positive when
/// disjoint, negative (magnitude = overlap depth) when they overlap.
fn interval_gap(a_start: Ms, a_end: Ms, b_start: Ms, b_end: Ms) -> Ms {
    if a_end <= b_start {
        b_start - a_end
    } else if b_end <= a_start {
        a_start - b_end
    } else {
        -1
    }
}

/// Reject a candidate that overlaps, or sits under [`MIN_EFFECT_GAP_MS`]
/// from, an already-accepted effect of the *same* type. The worked example
/// in §4.H pairs a highlight ending at 200ms with a zoom starting 50ms
/// later and accepts both, so the gap check is scoped per-type the same
/// way the overlap check is, rather than against the whole accepted set.
/// Candidates are considered in caption (chronological) order, so earlier
/// effects always get first claim.
fn resolve_conflicts(candidates: Vec<AppliedEffect>) -> Vec<AppliedEffect> {
    let mut accepted: Vec<AppliedEffect> = Vec::new();
    for candidate in candidates {
        let conflicts = accepted.iter().any(|existing| {
            if existing.kind != candidate.kind {
                return false;
            }
            let gap = interval_gap(
                existing.start_ms,
                existing.effective_end_ms(),
                candidate.start_ms,
                candidate.effective_end_ms(),
            );
            gap < MIN_EFFECT_GAP_MS
        });
        if !conflicts {
            accepted.push(candidate);
        }
    }
    accepted
}

/// If `maxEffectsPerMinute > 0` and the accepted count exceeds the cap for
/// `timelineDurationMs`, keep only the top-N by `confidence`, then re-sort
/// by `startMs`.
fn apply_rate_cap(effects: Vec<AppliedEffect>, max_per_minute: u32, timeline_duration_ms: Ms) -> Vec<AppliedEffect> {
    if max_per_minute == 0 {
        return effects;
    }
    let duration_minutes = timeline_duration_ms as f64 / 60_000.0;
    let cap = (duration_minutes * max_per_minute as f64).ceil() as usize;
    if effects.len() <= cap {
        return effects;
    }
    let mut kept = rate_cap::top_n_by(effects, cap, |e| e.confidence);
    kept.sort_by_key(|e| e.start_ms);
    kept
}

/// Validate every rule the config would actually use, then run the full
/// resolution → candidates → conflicts → rate-cap pipeline.
pub fn apply_effects(
    captions: &[EnrichedCaption],
    config: &EffectsConfig,
    timeline_duration_ms: Ms,
) -> Result<Vec<AppliedEffect>, EffectsError> {
    let rules = resolve_rules(config);
    for rule in &rules {
        condition::validate_rule(rule)?;
    }

    let candidates = generate_candidates(captions, &rules, config.threshold_multiplier);
    let accepted = resolve_conflicts(candidates);
    Ok(apply_rate_cap(accepted, config.max_effects_per_minute, timeline_duration_ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipcut_core::{Caption, SemanticCategory, SemanticScores, SentencePosition};

    fn caption(
        text: &str,
        start_ms: Ms,
        end_ms: Ms,
        topic_relevance: f64,
        is_keyword: bool,
        emphasis_score: f64,
        emotional_intensity: f64,
        category: SemanticCategory,
    ) -> EnrichedCaption {
        EnrichedCaption {
            caption: Caption {
                text: text.to_string(),
                start_ms,
                end_ms,
                confidence: Some(0.9),
            },
            semantic: SemanticScores {
                topic_relevance,
                emphasis_score,
                emotional_intensity,
                is_keyword,
                category,
            },
            sentence_index: 0,
            sentence_position: SentencePosition::Middle,
            whisper_confidence: 0.9,
        }
    }

    #[test]
    fn balanced_preset_scenario_from_spec() {
        // Mirrors the documented scenario: hola/mundo produce effects, y (a
        // connector with no other qualifying semantic scores) produces none.
        let captions = vec![
            caption("hola", 0, 200, 0.9, true, 0.1, 0.1, SemanticCategory::Concept),
            caption("mundo", 250, 500, 0.2, false, 0.8, 0.7, SemanticCategory::Concept),
            caption("y", 1200, 1300, 0.1, false, 0.1, 0.1, SemanticCategory::Connector),
        ];
        let config = EffectsConfig {
            active_preset: ActivePreset::Balanced,
            ..Default::default()
        };
        let effects = apply_effects(&captions, &config, 2000).unwrap();
        assert_eq!(effects.len(), 2);
        assert_eq!(effects[0].kind, EffectType::Highlight);
        assert_eq!(effects[0].word, "hola");
        assert_eq!(effects[1].kind, EffectType::Zoom);
        assert_eq!(effects[1].word, "mundo");
        assert_eq!(effects[1].duration_ms, Some(500));
    }

    #[test]
    fn gap_rule_rejects_same_type_effect_too_close_to_previous() {
        let captions = vec![
            // Highlight 0-200.
            caption("hola", 0, 200, 0.9, true, 0.0, 0.0, SemanticCategory::Concept),
            // Another highlight only 200ms later: rejected, under the 500ms gap.
            caption("otra", 400, 500, 0.95, true, 0.0, 0.0, SemanticCategory::Concept),
            // A highlight far enough past "hola" is accepted.
            caption("lejos", 900, 1000, 0.95, true, 0.0, 0.0, SemanticCategory::Concept),
        ];
        let config = EffectsConfig {
            active_preset: ActivePreset::Balanced,
            ..Default::default()
        };
        let effects = apply_effects(&captions, &config, 2000).unwrap();
        assert_eq!(effects.len(), 2);
        assert_eq!(effects[0].word, "hola");
        assert_eq!(effects[1].word, "lejos");
    }

    #[test]
    fn different_types_may_sit_closer_than_the_gap_minimum() {
        // Matches the documented worked example: a highlight ending at 200ms
        // and a zoom starting at 250ms (different types) are both accepted.
        let captions = vec![
            caption("hola", 0, 200, 0.9, true, 0.1, 0.1, SemanticCategory::Concept),
            caption("mundo", 250, 500, 0.2, false, 0.8, 0.7, SemanticCategory::Concept),
        ];
        let config = EffectsConfig {
            active_preset: ActivePreset::Balanced,
            ..Default::default()
        };
        let effects = apply_effects(&captions, &config, 2000).unwrap();
        assert_eq!(effects.len(), 2);
    }

    #[test]
    fn same_type_overlap_is_rejected() {
        let captions = vec![
            caption("uno", 0, 100, 0.95, true, 0.0, 0.0, SemanticCategory::Concept),
            caption("dos", 50, 150, 0.95, true, 0.0, 0.0, SemanticCategory::Concept),
        ];
        let config = EffectsConfig {
            active_preset: ActivePreset::Balanced,
            ..Default::default()
        };
        let effects = apply_effects(&captions, &config, 2000).unwrap();
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].word, "uno");
    }

    #[test]
    fn threshold_multiplier_is_plumbed_through() {
        let captions = vec![caption(
            "casi",
            0,
            200,
            0.5,
            true,
            0.0,
            0.0,
            SemanticCategory::Concept,
        )];
        let strict = EffectsConfig {
            active_preset: ActivePreset::Balanced,
            threshold_multiplier: 1.0,
            ..Default::default()
        };
        assert!(apply_effects(&captions, &strict, 2000).unwrap().is_empty());

        let lenient = EffectsConfig {
            active_preset: ActivePreset::Balanced,
            threshold_multiplier: 2.0,
            ..Default::default()
        };
        assert_eq!(apply_effects(&captions, &lenient, 2000).unwrap().len(), 1);
    }

    #[test]
    fn rate_cap_keeps_top_confidence_then_resorts_by_start() {
        let captions = vec![
            caption("a", 0, 100, 0.85, true, 0.0, 0.0, SemanticCategory::Concept),
            caption("b", 5_000, 5_100, 0.99, true, 0.0, 0.0, SemanticCategory::Concept),
            caption("c", 10_000, 10_100, 0.90, true, 0.0, 0.0, SemanticCategory::Concept),
        ];
        let config = EffectsConfig {
            active_preset: ActivePreset::Balanced,
            max_effects_per_minute: 2,
            ..Default::default()
        };
        // 11.1s timeline -> durationMinutes ~= 0.185 -> ceil(0.185 * 2) = 1 effect allowed.
        let effects = apply_effects(&captions, &config, 11_100).unwrap();
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].word, "b");
    }

    #[test]
    fn validate_rejects_custom_rule_with_unknown_field() {
        let bad_rule = clipcut_core::EffectRule {
            id: "bad".into(),
            name: "bad".into(),
            enabled: true,
            priority: 0,
            conditions: vec![clipcut_core::Condition {
                field: "nope.nope".into(),
                operator: clipcut_core::ComparisonOperator::Equals,
                value: clipcut_core::ConditionValue::Bool(true),
            }],
            condition_logic: clipcut_core::ConditionLogic::And,
            effect: clipcut_core::EffectTemplate {
                kind: EffectType::Highlight,
                style: None,
                duration_ms: None,
            },
        };
        let config = EffectsConfig {
            active_preset: ActivePreset::Custom,
            custom_rules: vec![bad_rule],
            ..Default::default()
        };
        assert!(apply_effects(&[], &config, 1000).is_err());
    }
}
