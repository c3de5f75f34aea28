//! DAG queries built on `StepName::deps()` (§4.I): the reverse-edge
//! closure `reset` cascades through, and the topological order
//! `executeUntil` runs in. `clipcut_core::StepName` already encodes the
//! DAG itself, so this module only derives queries over it.

use std::collections::HashSet;

use clipcut_core::StepName;

/// Every step that transitively depends on `step`, not including `step`
/// itself. Order is unspecified.
pub fn transitive_dependents(step: StepName) -> Vec<StepName> {
    let mut included: HashSet<StepName> = HashSet::new();
    included.insert(step);
    let mut result = Vec::new();

    loop {
        let mut added = false;
        for candidate in StepName::ALL {
            if included.contains(&candidate) {
                continue;
            }
            if candidate.deps().iter().any(|dep| included.contains(dep)) {
                included.insert(candidate);
                result.push(candidate);
                added = true;
            }
        }
        if !added {
            break;
        }
    }
    result
}

/// `target` plus every transitive ancestor, in a topological order where
/// every step appears after all of its dependencies (Kahn's algorithm
/// restricted to the ancestor set).
pub fn topological_ancestors(target: StepName) -> Vec<StepName> {
    let mut ancestors: HashSet<StepName> = HashSet::new();
    collect_ancestors(target, &mut ancestors);
    ancestors.insert(target);

    let mut ordered = Vec::with_capacity(ancestors.len());
    let mut remaining: HashSet<StepName> = ancestors.clone();

    while !remaining.is_empty() {
        let ready: Vec<StepName> = StepName::ALL
            .into_iter()
            .filter(|s| remaining.contains(s) && s.deps().iter().all(|d| !remaining.contains(d)))
            .collect();
        debug_assert!(!ready.is_empty(), "step DAG must be acyclic");
        for step in &ready {
            remaining.remove(step);
        }
        ordered.extend(ready);
    }
    ordered
}

fn collect_ancestors(step: StepName, acc: &mut HashSet<StepName>) {
    for dep in step.deps() {
        if acc.insert(*dep) {
            collect_ancestors(*dep, acc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependents_of_raw_is_everything_else() {
        let dependents = transitive_dependents(StepName::Raw);
        assert_eq!(dependents.len(), StepName::ALL.len() - 1);
    }

    #[test]
    fn dependents_of_rendered_is_empty() {
        assert!(transitive_dependents(StepName::Rendered).is_empty());
    }

    #[test]
    fn dependents_of_segments_includes_downstream_only() {
        let dependents = transitive_dependents(StepName::Segments);
        assert!(dependents.contains(&StepName::Cut));
        assert!(dependents.contains(&StepName::Rendered));
        assert!(!dependents.contains(&StepName::Silences));
        assert!(!dependents.contains(&StepName::Semantic));
    }

    #[test]
    fn topological_order_respects_dependencies() {
        let order = topological_ancestors(StepName::Rendered);
        assert_eq!(order.len(), StepName::ALL.len());
        let pos = |s: StepName| order.iter().position(|x| *x == s).unwrap();
        assert!(pos(StepName::Raw) < pos(StepName::Silences));
        assert!(pos(StepName::Segments) < pos(StepName::Cut));
        assert!(pos(StepName::TakeSelection) < pos(StepName::Rendered));
    }

    #[test]
    fn topological_ancestors_of_segments_excludes_unrelated_branches() {
        let order = topological_ancestors(StepName::Segments);
        assert!(!order.contains(&StepName::CaptionsRaw));
        assert!(order.contains(&StepName::Raw));
        assert!(order.contains(&StepName::Silences));
    }
}
