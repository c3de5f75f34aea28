//! clipcut-captions — Caption Store and Script Parser (§4.D, §4.E).
//!
//! `CaptionTrack` is the canonical, editor-mutable holder of transcript
//! tokens and knows how to group them into display pages. `parse_script`
//! turns an author-supplied script into ordered lines with inline
//! `[zoom]`/`{highlight}` markers.

pub mod script;
pub mod store;

pub use script::parse_script;
pub use store::{ends_sentence, CaptionTrack, PageConfig, SENTENCE_TERMINATORS};
