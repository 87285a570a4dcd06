//! Timestamped records - parsed form of every session log

use std::collections::BTreeMap;

/// Integer timestamp as written by the recording app
pub type Timestamp = i64;

/// Largest accepted `|timestamp|`.
///
/// The difference of two stamps within this range always fits in a `Timestamp`.
pub const MAX_TIMESTAMP_MAGNITUDE: Timestamp = Timestamp::MAX / 2;

/// Whether `timestamp` lies within `±MAX_TIMESTAMP_MAGNITUDE`
pub fn timestamp_in_range(timestamp: Timestamp) -> bool {
    timestamp.unsigned_abs() <= MAX_TIMESTAMP_MAGNITUDE.unsigned_abs()
}

/// Log contents keyed by timestamp.
///
/// Iteration is in ascending timestamp order. A duplicate timestamp in the
/// source replaces the earlier record.
pub type TimestampedRecords = BTreeMap<Timestamp, Vec<String>>;

/// Earliest timestamp in a collection, if any
pub fn first_timestamp(records: &TimestampedRecords) -> Option<Timestamp> {
    records.keys().next().copied()
}
