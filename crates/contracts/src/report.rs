//! SessionReport - Session Matcher output summary

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::{Policy, Timestamp};

/// The three cached stages of session matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStage {
    /// Frames associated with control signals
    FrameCtrl,
    /// Frame/control rows associated with commands or goals
    FrameCmd,
    /// Filtering and label file generation
    Finalize,
}

impl MatchStage {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchStage::FrameCtrl => "frame_ctrl",
            MatchStage::FrameCmd => "frame_cmd",
            MatchStage::Finalize => "finalize",
        }
    }
}

impl fmt::Display for MatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a stage ran or was satisfied by an existing output file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageOutcome {
    #[default]
    Computed,
    Cached,
}

/// What happened while matching one session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionReport {
    /// Session directory
    pub session: PathBuf,

    pub policy: Policy,

    pub frame_ctrl: StageOutcome,
    pub frame_cmd: StageOutcome,
    pub finalize: StageOutcome,

    /// `ctrl - frame` per match; empty when the stage was cached
    pub ctrl_offsets: Vec<Timestamp>,

    /// `cmd - frame` per match; empty when the stage was cached
    pub cmd_offsets: Vec<Timestamp>,

    /// Rows in the final label file
    pub labeled: usize,

    /// Stationary frames dropped (0 when finalize was cached)
    pub removed: usize,

    /// Short records skipped (0 when finalize was cached)
    pub skipped: usize,
}

impl SessionReport {
    pub fn new(session: impl Into<PathBuf>, policy: Policy) -> Self {
        Self {
            session: session.into(),
            policy,
            ..Default::default()
        }
    }

    pub fn outcome(&self, stage: MatchStage) -> StageOutcome {
        match stage {
            MatchStage::FrameCtrl => self.frame_ctrl,
            MatchStage::FrameCmd => self.frame_cmd,
            MatchStage::Finalize => self.finalize,
        }
    }

    /// True when every stage was served from existing files
    pub fn fully_cached(&self) -> bool {
        [self.frame_ctrl, self.frame_cmd, self.finalize]
            .iter()
            .all(|o| *o == StageOutcome::Cached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fully_cached() {
        let mut report = SessionReport::new("s1", Policy::Autopilot);
        assert!(!report.fully_cached());
        report.frame_ctrl = StageOutcome::Cached;
        report.frame_cmd = StageOutcome::Cached;
        report.finalize = StageOutcome::Cached;
        assert!(report.fully_cached());
        assert_eq!(report.outcome(MatchStage::FrameCmd), StageOutcome::Cached);
    }
}
