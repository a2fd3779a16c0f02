use std::cmp::Ordering;

use crate::entry::{Entry, ValidationLimits};

/// Keep only entries that satisfy the invariants in
/// [`Entry::is_valid`](crate::Entry::is_valid).
pub fn filter_valid(entries: &[Entry], limits: &ValidationLimits) -> Vec<Entry> {
    entries
        .iter()
        .filter(|e| e.is_valid(limits))
        .cloned()
        .collect()
}

/// Sort in place: score descending, then externally-supplied position
/// ascending (absent positions sort last), then name ascending
/// case-insensitively so equal scores order the same way on every call.
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(compare);
}

fn compare(a: &Entry, b: &Entry) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| rank_key(a.rank_hint).cmp(&rank_key(b.rank_hint)))
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
}

fn rank_key(hint: i64) -> i64 {
    if hint <= 0 {
        i64::MAX
    } else {
        hint
    }
}

/// Top `n` entries: re-validates defensively, sorts, then truncates to
/// `min(n, valid)`. Pure and idempotent.
pub fn top_n(entries: &[Entry], n: usize, limits: &ValidationLimits) -> Vec<Entry> {
    let mut valid = filter_valid(entries, limits);
    sort_entries(&mut valid);
    valid.truncate(n);
    valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Category;

    fn entry(name: &str, score: f64, rank_hint: i64) -> Entry {
        Entry {
            name: name.to_string(),
            rank_hint,
            score,
            affiliation: None,
            category: Category::ALeague,
        }
    }

    fn limits() -> ValidationLimits {
        ValidationLimits::default()
    }

    #[test]
    fn test_sorted_by_score_descending() {
        let entries = vec![
            entry("Low", 10.0, 0),
            entry("High", 99.0, 0),
            entry("Mid", 50.0, 0),
        ];
        let top = top_n(&entries, 10, &limits());
        let names: Vec<_> = top.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["High", "Mid", "Low"]);
        for pair in top.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_truncates_to_min() {
        let entries = vec![
            entry("A", 3.0, 0),
            entry("B", 2.0, 0),
            entry("C", 1.0, 0),
        ];
        assert_eq!(top_n(&entries, 2, &limits()).len(), 2);
        assert_eq!(top_n(&entries, 5, &limits()).len(), 3);
        assert!(top_n(&entries, 0, &limits()).is_empty());
    }

    #[test]
    fn test_tie_break_rank_hint_ascending() {
        let entries = vec![
            entry("NoHint", 50.0, 0),
            entry("Third", 50.0, 3),
            entry("First", 50.0, 1),
        ];
        let top = top_n(&entries, 10, &limits());
        let names: Vec<_> = top.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Third", "NoHint"], "absent hint sorts last");
    }

    #[test]
    fn test_tie_break_name_ascending() {
        let entries = vec![
            entry("zoe", 50.0, 1),
            entry("Abe", 50.0, 1),
            entry("mia", 50.0, 1),
        ];
        let top = top_n(&entries, 10, &limits());
        let names: Vec<_> = top.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Abe", "mia", "zoe"]);

        // Reproducible across repeated calls.
        assert_eq!(top_n(&entries, 10, &limits()), top);
    }

    #[test]
    fn test_filters_invalid_before_ranking() {
        let entries = vec![
            entry("Valid", 10.0, 0),
            entry("", 99.0, 0),
            entry("NaN", f64::NAN, 0),
            entry("Negative", -5.0, 0),
        ];
        let top = top_n(&entries, 10, &limits());
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].name, "Valid");
    }

    #[test]
    fn test_idempotent() {
        let entries = vec![
            entry("A", 3.0, 0),
            entry("B", 7.0, 2),
            entry("C", 7.0, 1),
            entry("D", 1.0, 0),
        ];
        let once = top_n(&entries, 3, &limits());
        let twice = top_n(&once, 3, &limits());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_pure_no_input_mutation() {
        let entries = vec![entry("B", 1.0, 0), entry("A", 2.0, 0)];
        let before = entries.clone();
        let _ = top_n(&entries, 1, &limits());
        assert_eq!(entries, before);
    }
}
