//! Built-in rule sets (§4.H `presets[activePreset]`).

use clipcut_core::{
    ComparisonOperator, Condition, ConditionLogic, ConditionValue, EffectRule, EffectStyle,
    EffectTemplate, EffectType,
};

fn cond(field: &str, operator: ComparisonOperator, value: ConditionValue) -> Condition {
    Condition {
        field: field.to_string(),
        operator,
        value,
    }
}

fn rule(
    id: &str,
    name: &str,
    priority: i32,
    conditions: Vec<Condition>,
    logic: ConditionLogic,
    effect: EffectTemplate,
) -> EffectRule {
    EffectRule {
        id: id.to_string(),
        name: name.to_string(),
        enabled: true,
        priority,
        conditions,
        condition_logic: logic,
        effect,
    }
}

/// The default preset: highlight keywords, zoom on emphasis or on
/// action-flavored sentences.
pub fn balanced() -> Vec<EffectRule> {
    vec![
        rule(
            "highlight-keyword",
            "Highlight keyword",
            100,
            vec![
                cond("semantic.is_keyword", ComparisonOperator::Equals, ConditionValue::Bool(true)),
                cond(
                    "semantic.topic_relevance",
                    ComparisonOperator::GreaterThanOrEqual,
                    ConditionValue::Number(0.8),
                ),
            ],
            ConditionLogic::And,
            EffectTemplate {
                kind: EffectType::Highlight,
                style: None,
                duration_ms: None,
            },
        ),
        rule(
            "zoom-emphasis",
            "Zoom on emphasis",
            90,
            vec![
                cond(
                    "semantic.emphasis_score",
                    ComparisonOperator::GreaterThanOrEqual,
                    ConditionValue::Number(0.7),
                ),
                cond(
                    "semantic.emotional_intensity",
                    ComparisonOperator::GreaterThanOrEqual,
                    ConditionValue::Number(0.5),
                ),
            ],
            ConditionLogic::And,
            EffectTemplate {
                kind: EffectType::Zoom,
                style: Some(EffectStyle::Punch),
                duration_ms: Some(500),
            },
        ),
        rule(
            "zoom-action",
            "Zoom on action beats",
            80,
            vec![
                cond(
                    "semantic.category",
                    ComparisonOperator::Equals,
                    ConditionValue::Text("action".to_string()),
                ),
                cond(
                    "semantic.topic_relevance",
                    ComparisonOperator::GreaterThanOrEqual,
                    ConditionValue::Number(0.6),
                ),
            ],
            ConditionLogic::And,
            EffectTemplate {
                kind: EffectType::Zoom,
                style: Some(EffectStyle::Slow),
                duration_ms: Some(600),
            },
        ),
    ]
}

/// A sparser preset: only the clearest keyword moments get highlighted, no
/// zooms.
pub fn minimal() -> Vec<EffectRule> {
    vec![rule(
        "highlight-keyword-strict",
        "Highlight high-confidence keyword",
        100,
        vec![
            cond("semantic.is_keyword", ComparisonOperator::Equals, ConditionValue::Bool(true)),
            cond(
                "semantic.topic_relevance",
                ComparisonOperator::GreaterThanOrEqual,
                ConditionValue::Number(0.9),
            ),
        ],
        ConditionLogic::And,
        EffectTemplate {
            kind: EffectType::Highlight,
            style: None,
            duration_ms: None,
        },
    )]
}

/// A denser preset: lower thresholds than `balanced`, plus an
/// emotional-intensity-only zoom trigger.
pub fn aggressive() -> Vec<EffectRule> {
    vec![
        rule(
            "highlight-keyword-loose",
            "Highlight keyword",
            100,
            vec![
                cond("semantic.is_keyword", ComparisonOperator::Equals, ConditionValue::Bool(true)),
                cond(
                    "semantic.topic_relevance",
                    ComparisonOperator::GreaterThanOrEqual,
                    ConditionValue::Number(0.6),
                ),
            ],
            ConditionLogic::And,
            EffectTemplate {
                kind: EffectType::Highlight,
                style: None,
                duration_ms: None,
            },
        ),
        rule(
            "zoom-emphasis-loose",
            "Zoom on emphasis",
            90,
            vec![cond(
                "semantic.emphasis_score",
                ComparisonOperator::GreaterThanOrEqual,
                ConditionValue::Number(0.5),
            )],
            ConditionLogic::And,
            EffectTemplate {
                kind: EffectType::Zoom,
                style: Some(EffectStyle::Punch),
                duration_ms: Some(400),
            },
        ),
        rule(
            "zoom-emotional",
            "Zoom on emotional intensity",
            70,
            vec![cond(
                "semantic.emotional_intensity",
                ComparisonOperator::GreaterThanOrEqual,
                ConditionValue::Number(0.6),
            )],
            ConditionLogic::And,
            EffectTemplate {
                kind: EffectType::Zoom,
                style: Some(EffectStyle::Slow),
                duration_ms: Some(700),
            },
        ),
    ]
}
