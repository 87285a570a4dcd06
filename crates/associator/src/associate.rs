//! Greedy sort-and-claim association.

use std::cmp::Reverse;
use std::collections::HashSet;

use contracts::{Match, Timestamp, TimestampedRecords};
use tracing::instrument;

/// All `(first, second)` pairs with `second - first < max_offset`.
///
/// Returned in claim order: largest offset first, ties broken by the larger
/// first stamp, then the larger second stamp. `(first, second)` pairs are
/// unique, so the order is total and independent of input iteration order.
pub fn candidates(
    first: &TimestampedRecords,
    second: &TimestampedRecords,
    max_offset: Timestamp,
) -> Vec<Match> {
    let mut pairs: Vec<Match> = first
        .keys()
        .flat_map(|&a| {
            second
                .keys()
                .filter(move |&&b| i128::from(b) - i128::from(a) < i128::from(max_offset))
                .map(move |&b| Match::new(a, b))
        })
        .collect();

    pairs.sort_unstable_by_key(|m| Reverse((m.wide_offset(), m.first, m.second)));
    pairs
}

/// Pair every first-stream stamp with one second-stream stamp.
///
/// Candidates are walked in [`candidates`] order; a first stamp is claimed by
/// the first candidate that reaches it. Second stamps are never consumed and
/// may back several matches. First stamps with no candidate (every second
/// record is `max_offset` or more ahead) are left out.
///
/// The result is sorted by first stamp.
#[instrument(
    level = "debug",
    name = "associate",
    skip(first, second),
    fields(first_len = first.len(), second_len = second.len())
)]
pub fn associate(
    first: &TimestampedRecords,
    second: &TimestampedRecords,
    max_offset: Timestamp,
) -> Vec<Match> {
    let mut unclaimed: HashSet<Timestamp> = first.keys().copied().collect();
    let mut matches = Vec::with_capacity(unclaimed.len());

    for candidate in candidates(first, second, max_offset) {
        if unclaimed.is_empty() {
            break;
        }
        if unclaimed.remove(&candidate.first) {
            matches.push(candidate);
        }
    }

    matches.sort_unstable_by_key(|m| m.first);
    matches
}
