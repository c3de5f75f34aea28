//! A reusable rate-limited top-N helper (§4.H "Rate cap").
//!
//! Keeps the highest-scoring `n` items, then restores `items`' original
//! relative order — the caller decides what that order means (here,
//! chronological by `startMs`).

pub fn top_n_by<T, F>(items: Vec<T>, n: usize, score: F) -> Vec<T>
where
    F: Fn(&T) -> f64,
{
    if items.len() <= n {
        return items;
    }
    let mut indexed: Vec<(usize, T)> = items.into_iter().enumerate().collect();
    indexed.sort_by(|(_, a), (_, b)| score(b).partial_cmp(&score(a)).unwrap());
    indexed.truncate(n);
    indexed.sort_by_key(|(i, _)| *i);
    indexed.into_iter().map(|(_, item)| item).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_highest_scoring_n_in_original_order() {
        let items = vec![("a", 0.2), ("b", 0.9), ("c", 0.5), ("d", 0.8)];
        let kept = top_n_by(items, 2, |(_, score)| *score);
        // b and d are the top two by score; original order (b before d) is preserved.
        assert_eq!(kept, vec![("b", 0.9), ("d", 0.8)]);
    }

    #[test]
    fn no_truncation_when_under_cap() {
        let items = vec![1, 2, 3];
        assert_eq!(top_n_by(items.clone(), 10, |x| *x as f64), items);
    }
}
