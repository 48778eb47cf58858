//! Suggestion scoring against the reference distribution.

use crate::types::{FieldValueCount, Suggestion, SuggestionScore};
use ahash::{AHashMap, AHashSet};

/// Distance between a value's count under a candidate query and its reference count.
///
/// Zero means the candidate query keeps every item carrying the value.
pub fn distance_from_total(candidate_count: u64, reference_count: u64) -> f64 {
    candidate_count.abs_diff(reference_count) as f64
}

/// Combine per-candidate value sequences into scored suggestions.
///
/// `responses[i]` holds the values returned for `candidates[i]`. Values
/// absent from `reference` score against a count of zero. The first
/// occurrence of a value wins, and values in `selected` are dropped. The
/// output keeps source order.
pub(crate) fn score_suggestions(
    candidates: &[String],
    responses: &[Vec<FieldValueCount>],
    reference: &[FieldValueCount],
    selected: &[String],
) -> Vec<Suggestion> {
    let mut reference_counts: AHashMap<&str, u64> = AHashMap::with_capacity(reference.len());
    for entry in reference {
        reference_counts
            .entry(entry.value.as_str())
            .or_insert(entry.number_of_results);
    }

    let selected: AHashSet<&str> = selected.iter().map(String::as_str).collect();
    let mut seen: AHashSet<&str> = AHashSet::new();
    let mut suggestions = Vec::new();

    for (keyword, values) in candidates.iter().zip(responses) {
        for entry in values {
            if selected.contains(entry.value.as_str()) || !seen.insert(entry.value.as_str()) {
                continue;
            }

            let reference_count = reference_counts
                .get(entry.value.as_str())
                .copied()
                .unwrap_or(0);
            suggestions.push(Suggestion {
                value: entry.value.clone(),
                keyword: keyword.clone(),
                number_of_results: entry.number_of_results,
                score: SuggestionScore {
                    distance_from_total_for_field: distance_from_total(
                        entry.number_of_results,
                        reference_count,
                    ),
                },
            });
        }
    }

    suggestions
}

/// Order suggestions for display: closest to the reference first.
///
/// The sort is stable, so equal distances keep source order. `limit`
/// truncates after sorting.
pub fn rank_suggestions(mut suggestions: Vec<Suggestion>, limit: Option<usize>) -> Vec<Suggestion> {
    suggestions.sort_by(|a, b| {
        a.score
            .distance_from_total_for_field
            .total_cmp(&b.score.distance_from_total_for_field)
    });
    if let Some(limit) = limit {
        suggestions.truncate(limit);
    }
    suggestions
}
