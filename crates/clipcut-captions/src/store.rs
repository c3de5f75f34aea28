//! Caption Store (§4.D).
//!
//! Canonical holder of transcript tokens: immutable per transcription run,
//! but mutable by the editor (per-token text and timing). Owns the page
//! grouping used for display.

use clipcut_core::{Caption, CaptionPage, ClipcutError, Ms, Result};

/// Sentence-terminal punctuation used both here (page boundaries) and by
/// the alignment crate's `completeness` criterion.
pub const SENTENCE_TERMINATORS: &[char] = &['.', '!', '?', '…'];

pub fn ends_sentence(text: &str) -> bool {
    text.trim_end()
        .chars()
        .next_back()
        .is_some_and(|c| SENTENCE_TERMINATORS.contains(&c))
}

/// Configuration for `CaptionTrack::group_into_pages`.
#[derive(Debug, Clone, Copy)]
pub struct PageConfig {
    pub max_page_duration_ms: Ms,
    pub sentence_aware: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            max_page_duration_ms: 1200,
            sentence_aware: true,
        }
    }
}

/// Ordered, editor-mutable collection of transcript tokens for one video.
#[derive(Debug, Clone, Default)]
pub struct CaptionTrack {
    tokens: Vec<Caption>,
}

impl CaptionTrack {
    /// Build a track from tokens already sorted by `startMs`. Returns
    /// `ValidationError` if the tokens are unsorted or overlapping — a
    /// malformed track per §3's invariant.
    pub fn new(tokens: Vec<Caption>) -> Result<Self> {
        let track = Self { tokens };
        track.validate()?;
        Ok(track)
    }

    fn validate(&self) -> Result<()> {
        for pair in self.tokens.windows(2) {
            if pair[0].start_ms > pair[1].start_ms {
                return Err(ClipcutError::Validation(
                    "captions must be sorted by start_ms".into(),
                ));
            }
            if pair[0].end_ms > pair[1].start_ms {
                return Err(ClipcutError::Validation(format!(
                    "caption overlap: [{}, {}] vs [{}, {}]",
                    pair[0].start_ms, pair[0].end_ms, pair[1].start_ms, pair[1].end_ms
                )));
            }
        }
        for tok in &self.tokens {
            if tok.start_ms > tok.end_ms {
                return Err(ClipcutError::Validation(format!(
                    "caption start_ms {} after end_ms {}",
                    tok.start_ms, tok.end_ms
                )));
            }
        }
        Ok(())
    }

    pub fn tokens(&self) -> &[Caption] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Editor mutation: rewrite one token's text.
    pub fn set_text(&mut self, index: usize, text: impl Into<String>) -> Result<()> {
        let tok = self
            .tokens
            .get_mut(index)
            .ok_or_else(|| ClipcutError::Validation(format!("no caption at index {index}")))?;
        tok.text = text.into();
        Ok(())
    }

    /// Editor mutation: retime one token. Re-validates the whole track so a
    /// retime that introduces an overlap is rejected rather than silently
    /// accepted.
    pub fn set_timing(&mut self, index: usize, start_ms: Ms, end_ms: Ms) -> Result<()> {
        if start_ms > end_ms {
            return Err(ClipcutError::Validation(
                "caption start_ms must be <= end_ms".into(),
            ));
        }
        let previous = self
            .tokens
            .get(index)
            .cloned()
            .ok_or_else(|| ClipcutError::Validation(format!("no caption at index {index}")))?;
        self.tokens[index].start_ms = start_ms;
        self.tokens[index].end_ms = end_ms;
        if let Err(e) = self.validate() {
            self.tokens[index] = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Group tokens into display pages that never cross a sentence
    /// boundary, per §4.D: accumulate until adding the next token would
    /// push the page's total token duration past `max_page_duration_ms`,
    /// or until a sentence-terminal token is reached.
    pub fn group_into_pages(&self, config: PageConfig) -> Vec<CaptionPage> {
        let mut pages = Vec::new();
        let mut current: Vec<Caption> = Vec::new();
        let mut current_dur: Ms = 0;

        for tok in &self.tokens {
            let tok_dur = tok.end_ms - tok.start_ms;
            if !current.is_empty() && current_dur + tok_dur > config.max_page_duration_ms {
                pages.push(make_page(std::mem::take(&mut current)));
                current_dur = 0;
            }
            current_dur += tok_dur;
            let is_terminal = config.sentence_aware && ends_sentence(&tok.text);
            current.push(tok.clone());
            if is_terminal {
                pages.push(make_page(std::mem::take(&mut current)));
                current_dur = 0;
            }
        }
        if !current.is_empty() {
            pages.push(make_page(current));
        }
        pages
    }
}

fn make_page(tokens: Vec<Caption>) -> CaptionPage {
    let start_ms = tokens.first().map(|t| t.start_ms).unwrap_or(0);
    let end_ms = tokens.last().map(|t| t.end_ms).unwrap_or(0);
    CaptionPage {
        tokens,
        start_ms,
        end_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cap(text: &str, start_ms: Ms, end_ms: Ms) -> Caption {
        Caption {
            text: text.to_string(),
            start_ms,
            end_ms,
            confidence: None,
        }
    }

    #[test]
    fn rejects_overlapping_tokens() {
        let tokens = vec![cap("a", 0, 100), cap("b", 50, 150)];
        assert!(CaptionTrack::new(tokens).is_err());
    }

    #[test]
    fn accepts_well_formed_track() {
        let tokens = vec![cap("a", 0, 100), cap("b", 100, 200)];
        assert!(CaptionTrack::new(tokens).is_ok());
    }

    #[test]
    fn page_splits_on_duration_cap() {
        let tokens = vec![
            cap("a", 0, 500),
            cap("b", 500, 1000),
            cap("c", 1000, 1500),
        ];
        let track = CaptionTrack::new(tokens).unwrap();
        let pages = track.group_into_pages(PageConfig {
            max_page_duration_ms: 900,
            sentence_aware: false,
        });
        assert_eq!(pages.len(), 2);
        for page in &pages {
            let sum: Ms = page.tokens.iter().map(|t| t.end_ms - t.start_ms).sum();
            assert!(sum <= 900);
        }
    }

    #[test]
    fn page_splits_on_sentence_terminal() {
        let tokens = vec![cap("Hello.", 0, 200), cap("World", 200, 400)];
        let track = CaptionTrack::new(tokens).unwrap();
        let pages = track.group_into_pages(PageConfig {
            max_page_duration_ms: 5000,
            sentence_aware: true,
        });
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].tokens.len(), 1);
    }

    #[test]
    fn set_text_updates_token() {
        let mut track = CaptionTrack::new(vec![cap("a", 0, 100)]).unwrap();
        track.set_text(0, "b").unwrap();
        assert_eq!(track.tokens()[0].text, "b");
    }

    #[test]
    fn set_timing_rejects_introduced_overlap() {
        let mut track = CaptionTrack::new(vec![cap("a", 0, 100), cap("b", 100, 200)]).unwrap();
        assert!(track.set_timing(0, 0, 150).is_err());
        assert_eq!(track.tokens()[0].end_ms, 100);
    }
}
