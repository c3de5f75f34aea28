//! clipcut-effects — the Effects Rule Engine (§4.H).
//!
//! Evaluates a priority-ordered set of [`clipcut_core::EffectRule`]s
//! (one of three built-in presets, or a custom list) against enriched
//! captions, resolves conflicts between candidate effects, and applies the
//! per-minute rate cap.

pub mod condition;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod presets;
pub mod rate_cap;

pub use config::{ActivePreset, EffectsConfig};
pub use engine::{apply_effects, MIN_EFFECT_GAP_MS};
pub use error::EffectsError;
