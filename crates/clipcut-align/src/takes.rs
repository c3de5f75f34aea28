//! Transcript-window computation and take-candidate grouping (§3
//! `TakeCandidate`, §4.F).

use clipcut_core::{Caption, Segment, TakeCandidate};
use std::collections::HashMap;

/// The transcript window `W(S)`: tokens whose `[startMs,endMs]` lies
/// entirely within `[segment.startMs, segment.endMs]`.
pub fn window_for_segment<'a>(segment: &Segment, captions: &'a [Caption]) -> Vec<&'a Caption> {
    captions
        .iter()
        .filter(|c| c.start_ms >= segment.start_ms && c.end_ms <= segment.end_ms)
        .collect()
}

pub fn window_text(window: &[&Caption]) -> String {
    window
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A group of segments whose transcript windows mapped onto the same
/// script span (or, script-less, each segment is its own singleton group).
#[derive(Debug, Clone)]
pub struct TakeGroup {
    /// `(first, last)` script line index, inclusive; `None` when no script
    /// is present.
    pub span: Option<(usize, usize)>,
    /// Segment indices in chronological (`startMs`) order.
    pub members: Vec<usize>,
}

/// Group segments by matched script span. Segments with no script (or no
/// match) form their own singleton group so `takeOrder` degrades to 100
/// for everyone, per §4.F's "singletons receive 100".
pub fn group_by_span(segments: &[Segment], spans: &[Option<(usize, usize)>]) -> Vec<TakeGroup> {
    let mut by_span: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
    let mut singletons = Vec::new();

    for (i, span) in spans.iter().enumerate() {
        match span {
            Some(s) => by_span.entry(*s).or_default().push(i),
            None => singletons.push(i),
        }
    }

    let mut groups: Vec<TakeGroup> = by_span
        .into_iter()
        .map(|(span, mut members)| {
            members.sort_by_key(|&i| segments[i].start_ms);
            TakeGroup {
                span: Some(span),
                members,
            }
        })
        .collect();
    groups.sort_by_key(|g| segments[g.members[0]].start_ms);

    for i in singletons {
        groups.push(TakeGroup {
            span: None,
            members: vec![i],
        });
    }
    groups
}

/// Build the `TakeCandidate` audit record for every segment in a group.
pub fn build_candidates(
    segments: &[Segment],
    groups: &[TakeGroup],
    coverage_scores: &[f64],
) -> Vec<TakeCandidate> {
    let mut candidates = vec![
        TakeCandidate {
            segment_id: 0,
            script_line_indices: Vec::new(),
            coverage_score: 0.0,
            is_repetition: false,
            take_number: 1,
            total_takes: 1,
        };
        segments.len()
    ];

    for group in groups {
        let total = group.members.len();
        let script_line_indices: Vec<usize> = match group.span {
            Some((lo, hi)) => (lo..=hi).collect(),
            None => Vec::new(),
        };
        for (rank, &seg_idx) in group.members.iter().enumerate() {
            candidates[seg_idx] = TakeCandidate {
                segment_id: segments[seg_idx].index,
                script_line_indices: script_line_indices.clone(),
                coverage_score: coverage_scores[seg_idx],
                is_repetition: total > 1,
                take_number: rank + 1,
                total_takes: total,
            };
        }
    }
    candidates
}
