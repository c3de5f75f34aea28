//! clipcut-ai — the `SemanticAnalyzer` port (§4.G).
//!
//! A narrow interface to an LLM-backed captions enricher and
//! take-selection advisor, plus one production adapter (HTTP) and one
//! in-memory test double. The provider itself is out of scope (§1) — this
//! crate only defines the contract and calls it.

pub mod error;
pub mod http;
pub mod port;
pub mod stub;

pub use error::{AiError, AiResult};
pub use http::{HttpAnalyzerConfig, HttpSemanticAnalyzer};
pub use port::{
    captions_hash, EnrichmentMetadata, EnrichmentResult, SegmentTextWindow, SemanticAnalyzer,
    TakeDecision, TakeSelectionQuery, TakeSelectionResult,
};
pub use stub::StubSemanticAnalyzer;
