//! Reflective dot-path access into `EnrichedCaption` (§4.H condition
//! evaluation). The field whitelist is fixed at compile time — there is no
//! runtime expression language, per §9.

use clipcut_core::{ConditionValue, EnrichedCaption, SemanticCategory, SentencePosition};

/// Resolve `path` against `caption`. `None` means the path is outside the
/// known whitelist; callers distinguish this from a field that resolves but
/// is numerically absent (this model has none — every whitelisted field is
/// always populated).
pub fn resolve(caption: &EnrichedCaption, path: &str) -> Option<ConditionValue> {
    match path {
        "text" => Some(ConditionValue::Text(caption.caption.text.clone())),
        "start_ms" => Some(ConditionValue::Number(caption.caption.start_ms as f64)),
        "end_ms" => Some(ConditionValue::Number(caption.caption.end_ms as f64)),
        "whisper_confidence" => Some(ConditionValue::Number(caption.whisper_confidence)),
        "sentence_index" => Some(ConditionValue::Number(caption.sentence_index as f64)),
        "sentence_position" => Some(ConditionValue::Text(sentence_position_str(caption.sentence_position).to_string())),
        "semantic.topic_relevance" => Some(ConditionValue::Number(caption.semantic.topic_relevance)),
        "semantic.emphasis_score" => Some(ConditionValue::Number(caption.semantic.emphasis_score)),
        "semantic.emotional_intensity" => Some(ConditionValue::Number(caption.semantic.emotional_intensity)),
        "semantic.is_keyword" => Some(ConditionValue::Bool(caption.semantic.is_keyword)),
        "semantic.category" => Some(ConditionValue::Text(category_str(caption.semantic.category).to_string())),
        _ => None,
    }
}

/// Every path `resolve` recognizes. Used to validate rules at load time
/// rather than discovering an unknown field mid-evaluation.
pub const KNOWN_FIELDS: &[&str] = &[
    "text",
    "start_ms",
    "end_ms",
    "whisper_confidence",
    "sentence_index",
    "sentence_position",
    "semantic.topic_relevance",
    "semantic.emphasis_score",
    "semantic.emotional_intensity",
    "semantic.is_keyword",
    "semantic.category",
];

fn sentence_position_str(pos: SentencePosition) -> &'static str {
    match pos {
        SentencePosition::Start => "start",
        SentencePosition::Middle => "middle",
        SentencePosition::End => "end",
    }
}

fn category_str(category: SemanticCategory) -> &'static str {
    match category {
        SemanticCategory::Action => "action",
        SemanticCategory::Concept => "concept",
        SemanticCategory::Emotion => "emotion",
        SemanticCategory::Connector => "connector",
        SemanticCategory::Filler => "filler",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipcut_core::{Caption, SemanticScores};

    fn caption() -> EnrichedCaption {
        EnrichedCaption {
            caption: Caption {
                text: "hola".into(),
                start_ms: 0,
                end_ms: 200,
                confidence: Some(0.95),
            },
            semantic: SemanticScores {
                topic_relevance: 0.9,
                emphasis_score: 0.2,
                emotional_intensity: 0.1,
                is_keyword: true,
                category: SemanticCategory::Concept,
            },
            sentence_index: 0,
            sentence_position: SentencePosition::Start,
            whisper_confidence: 0.95,
        }
    }

    #[test]
    fn resolves_known_scalar_fields() {
        assert_eq!(resolve(&caption(), "text"), Some(ConditionValue::Text("hola".into())));
        assert_eq!(resolve(&caption(), "start_ms"), Some(ConditionValue::Number(0.0)));
    }

    #[test]
    fn resolves_nested_semantic_fields() {
        assert_eq!(
            resolve(&caption(), "semantic.topic_relevance"),
            Some(ConditionValue::Number(0.9))
        );
        assert_eq!(
            resolve(&caption(), "semantic.is_keyword"),
            Some(ConditionValue::Bool(true))
        );
        assert_eq!(
            resolve(&caption(), "semantic.category"),
            Some(ConditionValue::Text("concept".into()))
        );
    }

    #[test]
    fn unknown_path_resolves_to_none() {
        assert_eq!(resolve(&caption(), "semantic.nonexistent"), None);
    }

    #[test]
    fn every_known_field_resolves() {
        let c = caption();
        for field in KNOWN_FIELDS {
            assert!(resolve(&c, field).is_some(), "field {field} should resolve");
        }
    }
}
