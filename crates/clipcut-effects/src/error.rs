//! Effects engine errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EffectsError {
    #[error("rule {rule_id:?} references unknown field {field:?}")]
    UnknownField { rule_id: String, field: String },

    #[error("rule {rule_id:?} has an empty condition list")]
    EmptyConditions { rule_id: String },
}

impl From<EffectsError> for clipcut_core::ClipcutError {
    fn from(err: EffectsError) -> Self {
        clipcut_core::ClipcutError::Validation(err.to_string())
    }
}
