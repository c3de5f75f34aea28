//! clipcut-align — Alignment & Take Selector (§4.F).
//!
//! Scores every segment against five weighted criteria (or, in AI modes,
//! defers to the `SemanticAnalyzer` port), groups segments that cover the
//! same script span, and enforces that exactly one take per span is
//! enabled.

pub mod scoring;
pub mod select;
pub mod takes;
pub mod trigram;

pub use select::{select_takes, AiPreselectionTrace, AlignInput, SelectionMode, SelectionOutput};
pub use takes::{build_candidates, group_by_span, window_for_segment, window_text, TakeGroup};
