//! Character-trigram-shingle similarity, used by the `scriptMatch`
//! criterion (§4.F criterion 1) to find the best-matching contiguous span
//! of script lines for a segment's transcript window.

use std::collections::HashSet;

/// The set of overlapping 3-character shingles in `text`, lowercased and
/// with runs of whitespace collapsed so formatting differences between the
/// transcript and the script don't starve the match.
fn trigrams(text: &str) -> HashSet<[char; 3]> {
    let normalized: Vec<char> = text
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .collect();

    if normalized.len() < 3 {
        return HashSet::new();
    }
    normalized
        .windows(3)
        .map(|w| [w[0], w[1], w[2]])
        .collect()
}

/// Coverage of `reference`'s trigrams found in `candidate`, as a
/// proportion in `[0,1]` of `reference`'s trigram count — "matched script
/// chars / total script-line chars in span" approximated at the trigram
/// granularity the spec's own similarity measure operates on.
pub fn coverage(candidate: &str, reference: &str) -> f64 {
    let reference_set = trigrams(reference);
    if reference_set.is_empty() {
        return 0.0;
    }
    let candidate_set = trigrams(candidate);
    let matched = reference_set.intersection(&candidate_set).count();
    matched as f64 / reference_set.len() as f64
}
