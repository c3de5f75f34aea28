//! Condition and rule evaluation (§4.H).
//!
//! Numeric comparisons coerce both sides to a number when both parse as
//! one; an undefined field fails every operator except `notEquals`, but
//! with a fixed whitelist of fields ([`crate::context`]) "undefined" only
//! ever means a rule referenced a field outside that whitelist, which is
//! rejected at load time by [`validate_rule`] rather than discovered here.

use clipcut_core::{
    ComparisonOperator, Condition, ConditionLogic, ConditionValue, EffectRule, EnrichedCaption,
};

use crate::context;
use crate::error::EffectsError;

/// Check every rule's conditions reference only whitelisted fields.
pub fn validate_rule(rule: &EffectRule) -> Result<(), EffectsError> {
    if rule.conditions.is_empty() {
        return Err(EffectsError::EmptyConditions {
            rule_id: rule.id.clone(),
        });
    }
    for condition in &rule.conditions {
        if !context::KNOWN_FIELDS.contains(&condition.field.as_str()) {
            return Err(EffectsError::UnknownField {
                rule_id: rule.id.clone(),
                field: condition.field.clone(),
            });
        }
    }
    Ok(())
}

fn as_number(value: &ConditionValue) -> Option<f64> {
    match value {
        ConditionValue::Number(n) => Some(*n),
        ConditionValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        ConditionValue::Text(s) => s.parse::<f64>().ok(),
    }
}

fn values_equal(a: &ConditionValue, b: &ConditionValue) -> bool {
    if let (Some(x), Some(y)) = (as_number(a), as_number(b)) {
        return (x - y).abs() < 1e-9;
    }
    match (a, b) {
        (ConditionValue::Text(x), ConditionValue::Text(y)) => x == y,
        (ConditionValue::Bool(x), ConditionValue::Bool(y)) => x == y,
        _ => false,
    }
}

/// Apply `threshold_multiplier` to a `greaterThan[OrEqual]` threshold:
/// `value' = clip01(value / multiplier)`. Leaves non-numeric thresholds and
/// other operators untouched.
fn scale_threshold(value: &ConditionValue, multiplier: f64) -> ConditionValue {
    match value {
        ConditionValue::Number(n) => ConditionValue::Number((n / multiplier).clamp(0.0, 1.0)),
        other => other.clone(),
    }
}

fn evaluate_one(condition: &Condition, field_value: &ConditionValue, threshold_multiplier: f64) -> bool {
    let threshold = match condition.operator {
        ComparisonOperator::GreaterThan | ComparisonOperator::GreaterThanOrEqual => {
            scale_threshold(&condition.value, threshold_multiplier)
        }
        _ => condition.value.clone(),
    };

    match condition.operator {
        ComparisonOperator::Equals => values_equal(field_value, &threshold),
        ComparisonOperator::NotEquals => !values_equal(field_value, &threshold),
        ComparisonOperator::GreaterThan => match (as_number(field_value), as_number(&threshold)) {
            (Some(a), Some(b)) => a > b,
            _ => false,
        },
        ComparisonOperator::GreaterThanOrEqual => match (as_number(field_value), as_number(&threshold)) {
            (Some(a), Some(b)) => a >= b,
            _ => false,
        },
        ComparisonOperator::LessThan => match (as_number(field_value), as_number(&threshold)) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        },
        ComparisonOperator::LessThanOrEqual => match (as_number(field_value), as_number(&threshold)) {
            (Some(a), Some(b)) => a <= b,
            _ => false,
        },
    }
}

/// Evaluate every condition against `caption`, combined per the rule's
/// `conditionLogic`. A condition whose field doesn't resolve fails every
/// operator except `notEquals` (undefined vacuously differs from anything).
pub fn evaluate_rule(rule: &EffectRule, caption: &EnrichedCaption, threshold_multiplier: f64) -> bool {
    let mut results = rule.conditions.iter().map(|condition| {
        match context::resolve(caption, &condition.field) {
            Some(value) => evaluate_one(condition, &value, threshold_multiplier),
            None => matches!(condition.operator, ComparisonOperator::NotEquals),
        }
    });

    match rule.condition_logic {
        ConditionLogic::And => results.all(|r| r),
        ConditionLogic::Or => results.any(|r| r),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipcut_core::{Caption, SemanticCategory, SemanticScores, SentencePosition};

    fn caption(topic_relevance: f64, is_keyword: bool) -> EnrichedCaption {
        EnrichedCaption {
            caption: Caption {
                text: "hola".into(),
                start_ms: 0,
                end_ms: 200,
                confidence: Some(0.9),
            },
            semantic: SemanticScores {
                topic_relevance,
                emphasis_score: 0.2,
                emotional_intensity: 0.1,
                is_keyword,
                category: SemanticCategory::Concept,
            },
            sentence_index: 0,
            sentence_position: SentencePosition::Start,
            whisper_confidence: 0.9,
        }
    }

    fn rule(conditions: Vec<Condition>, logic: ConditionLogic) -> EffectRule {
        EffectRule {
            id: "r1".into(),
            name: "test".into(),
            enabled: true,
            priority: 0,
            conditions,
            condition_logic: logic,
            effect: clipcut_core::EffectTemplate {
                kind: clipcut_core::EffectType::Highlight,
                style: None,
                duration_ms: None,
            },
        }
    }

    #[test]
    fn and_requires_all_conditions() {
        let r = rule(
            vec![
                Condition {
                    field: "semantic.is_keyword".into(),
                    operator: ComparisonOperator::Equals,
                    value: ConditionValue::Bool(true),
                },
                Condition {
                    field: "semantic.topic_relevance".into(),
                    operator: ComparisonOperator::GreaterThanOrEqual,
                    value: ConditionValue::Number(0.8),
                },
            ],
            ConditionLogic::And,
        );
        assert!(evaluate_rule(&r, &caption(0.9, true), 1.0));
        assert!(!evaluate_rule(&r, &caption(0.9, false), 1.0));
        assert!(!evaluate_rule(&r, &caption(0.5, true), 1.0));
    }

    #[test]
    fn or_requires_any_condition() {
        let r = rule(
            vec![
                Condition {
                    field: "semantic.is_keyword".into(),
                    operator: ComparisonOperator::Equals,
                    value: ConditionValue::Bool(true),
                },
                Condition {
                    field: "semantic.topic_relevance".into(),
                    operator: ComparisonOperator::GreaterThanOrEqual,
                    value: ConditionValue::Number(0.95),
                },
            ],
            ConditionLogic::Or,
        );
        assert!(evaluate_rule(&r, &caption(0.5, true), 1.0));
        assert!(!evaluate_rule(&r, &caption(0.5, false), 1.0));
    }

    #[test]
    fn threshold_multiplier_loosens_greater_than() {
        let r = rule(
            vec![Condition {
                field: "semantic.topic_relevance".into(),
                operator: ComparisonOperator::GreaterThanOrEqual,
                value: ConditionValue::Number(0.8),
            }],
            ConditionLogic::And,
        );
        // 0.8 / 2.0 = 0.4, so a caption at 0.5 now passes though it failed at multiplier 1.
        assert!(!evaluate_rule(&r, &caption(0.5, true), 1.0));
        assert!(evaluate_rule(&r, &caption(0.5, true), 2.0));
    }

    #[test]
    fn validate_rejects_unknown_field() {
        let r = rule(
            vec![Condition {
                field: "semantic.nonexistent".into(),
                operator: ComparisonOperator::Equals,
                value: ConditionValue::Bool(true),
            }],
            ConditionLogic::And,
        );
        assert!(validate_rule(&r).is_err());
    }

    #[test]
    fn validate_rejects_empty_conditions() {
        let r = rule(Vec::new(), ConditionLogic::And);
        assert!(validate_rule(&r).is_err());
    }
}
