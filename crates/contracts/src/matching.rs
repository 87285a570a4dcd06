//! Match - Associator output

use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// Pairing of a first-stream record with a second-stream record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Match {
    /// Timestamp in the first collection (claimed at most once)
    pub first: Timestamp,
    /// Timestamp in the second collection (may repeat across matches)
    pub second: Timestamp,
}

impl Match {
    pub fn new(first: Timestamp, second: Timestamp) -> Self {
        Self { first, second }
    }

    /// `second - first`; negative when the second record precedes the first.
    ///
    /// Saturates for stamps outside `±MAX_TIMESTAMP_MAGNITUDE`; see [`Match::wide_offset`].
    #[inline]
    pub fn offset(&self) -> Timestamp {
        self.second.saturating_sub(self.first)
    }

    /// Exact `second - first` for any pair of stamps
    #[inline]
    pub fn wide_offset(&self) -> i128 {
        i128::from(self.second) - i128::from(self.first)
    }
}

impl From<(Timestamp, Timestamp)> for Match {
    fn from((first, second): (Timestamp, Timestamp)) -> Self {
        Self::new(first, second)
    }
}
