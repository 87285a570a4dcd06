//! Policy - 会话标注所用的控制方案
//!
//! 每个变体持有一个静态 [`PolicySpec`]，描述文件名、CSV 表头与标签布局，
//! 匹配器无需按字符串分支。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::LabelError;

/// Control-signal scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// Direct wheel commands plus indicator command
    #[default]
    Autopilot,
    /// Wheel commands plus goal distance and bearing
    PointGoalNav,
}

/// Per-policy file names and output schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicySpec {
    /// Command log read in the second matching pass
    pub command_log: &'static str,
    /// Output of the second matching pass
    pub matched_file: &'static str,
    /// Final label file
    pub processed_file: &'static str,
    /// Header of `matched_file`
    pub matched_header: &'static str,
    /// Header of `processed_file`
    pub processed_header: &'static str,
    /// Appended to the frame id to build the image file name
    pub image_suffix: &'static str,
    /// Records in `matched_file` with fewer fields are skipped
    pub min_fields: usize,
}

const AUTOPILOT_SPEC: PolicySpec = PolicySpec {
    command_log: "indicatorLog.txt",
    matched_file: "matched_frame_ctrl_cmd.txt",
    processed_file: "matched_frame_ctrl_cmd_processed.txt",
    matched_header: "timestamp (frame),time_offset (cmd-frame),time_offset (ctrl-frame),frame,left,right,cmd",
    processed_header: "timestamp,frame,left,right,cmd",
    image_suffix: "_crop.jpeg",
    min_fields: 6,
};

const POINT_GOAL_NAV_SPEC: PolicySpec = PolicySpec {
    command_log: "goalLog.txt",
    matched_file: "matched_frame_ctrl_goal.txt",
    processed_file: "matched_frame_ctrl_goal_processed.txt",
    matched_header: "timestamp (frame),time_offset (goal-frame),time_offset (ctrl-frame),frame,left,right,dist,sinYaw,cosYaw",
    processed_header: "timestamp,frame,left,right,dist,sinYaw,cosYaw",
    image_suffix: ".jpeg",
    min_fields: 8,
};

impl Policy {
    pub const ALL: [Policy; 2] = [Policy::Autopilot, Policy::PointGoalNav];

    /// Static schema for this policy
    pub fn spec(self) -> &'static PolicySpec {
        match self {
            Policy::Autopilot => &AUTOPILOT_SPEC,
            Policy::PointGoalNav => &POINT_GOAL_NAV_SPEC,
        }
    }

    /// Config / CLI spelling
    pub fn as_str(self) -> &'static str {
        match self {
            Policy::Autopilot => "autopilot",
            Policy::PointGoalNav => "point_goal_nav",
        }
    }

    /// Whether an empty command log aborts the session.
    ///
    /// Autopilot instead assumes a neutral indicator until the first event.
    pub fn requires_command_log(self) -> bool {
        matches!(self, Policy::PointGoalNav)
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Policy {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Policy::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| LabelError::UnknownPolicy {
                value: s.to_string(),
            })
    }
}
