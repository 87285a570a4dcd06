//! Typed control labels parsed from the frame/control/command file
//!
//! Record layout after the second pass (timestamp is the key):
//!
//! ```text
//! [cmd_offset, ctrl_offset, frame, left, right, <command fields>...]
//! ```

use std::fmt;

use contracts::{LabelError, Policy, Result, Timestamp};

pub(crate) const FRAME_FIELD: usize = 2;
const LEFT_FIELD: usize = 3;
const RIGHT_FIELD: usize = 4;
const COMMAND_FIELD: usize = 5;

/// Left/right wheel controls
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Wheels {
    Int { left: i64, right: i64 },
    Float { left: f64, right: f64 },
}

impl Wheels {
    /// Parse the wheel fields with the numeric type of `policy`
    pub fn parse(policy: Policy, timestamp: Timestamp, fields: &[String]) -> Result<Self> {
        Ok(match policy {
            Policy::Autopilot => Wheels::Int {
                left: parse_field(timestamp, "left", fields, LEFT_FIELD)?,
                right: parse_field(timestamp, "right", fields, RIGHT_FIELD)?,
            },
            Policy::PointGoalNav => Wheels::Float {
                left: parse_field(timestamp, "left", fields, LEFT_FIELD)?,
                right: parse_field(timestamp, "right", fields, RIGHT_FIELD)?,
            },
        })
    }

    /// Both wheels exactly zero
    pub fn is_stationary(&self) -> bool {
        match *self {
            Wheels::Int { left, right } => left == 0 && right == 0,
            Wheels::Float { left, right } => left == 0.0 && right == 0.0,
        }
    }
}

/// Final label columns after the frame path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlLabel {
    Autopilot {
        left: i64,
        right: i64,
        cmd: i64,
    },
    PointGoalNav {
        left: f64,
        right: f64,
        dist: f64,
        sin_yaw: f64,
        cos_yaw: f64,
    },
}

impl ControlLabel {
    /// Complete `wheels` with the command fields of the record
    pub fn from_record(wheels: Wheels, timestamp: Timestamp, fields: &[String]) -> Result<Self> {
        Ok(match wheels {
            Wheels::Int { left, right } => ControlLabel::Autopilot {
                left,
                right,
                cmd: parse_field(timestamp, "cmd", fields, COMMAND_FIELD)?,
            },
            Wheels::Float { left, right } => ControlLabel::PointGoalNav {
                left,
                right,
                dist: parse_field(timestamp, "dist", fields, COMMAND_FIELD)?,
                sin_yaw: parse_field(timestamp, "sinYaw", fields, COMMAND_FIELD + 1)?,
                cos_yaw: parse_field(timestamp, "cosYaw", fields, COMMAND_FIELD + 2)?,
            },
        })
    }
}

impl fmt::Display for ControlLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ControlLabel::Autopilot { left, right, cmd } => write!(f, "{left},{right},{cmd}"),
            ControlLabel::PointGoalNav {
                left,
                right,
                dist,
                sin_yaw,
                cos_yaw,
            } => write!(
                f,
                "{left:.6},{right:.6},{dist:.6},{sin_yaw:.6},{cos_yaw:.6}"
            ),
        }
    }
}

fn parse_field<T: std::str::FromStr>(
    timestamp: Timestamp,
    field: &'static str,
    fields: &[String],
    index: usize,
) -> Result<T> {
    let raw = fields.get(index).map(String::as_str).unwrap_or_default();
    raw.trim().parse().map_err(|_| LabelError::FieldParse {
        timestamp,
        field,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_autopilot_label() {
        let record = fields(&["0", "-5", "17", "120", "-80", "1"]);
        let wheels = Wheels::parse(Policy::Autopilot, 100, &record).unwrap();
        assert!(!wheels.is_stationary());
        let label = ControlLabel::from_record(wheels, 100, &record).unwrap();
        assert_eq!(label.to_string(), "120,-80,1");
    }

    #[test]
    fn test_point_goal_label_formatting() {
        let record = fields(&["-3", "-5", "17", "0.5", "0.25", "3.2", "0.1", "0.995"]);
        let wheels = Wheels::parse(Policy::PointGoalNav, 100, &record).unwrap();
        let label = ControlLabel::from_record(wheels, 100, &record).unwrap();
        assert_eq!(
            label.to_string(),
            "0.500000,0.250000,3.200000,0.100000,0.995000"
        );
    }

    #[test]
    fn test_stationary() {
        let int_zero = fields(&["0", "0", "1", "0", "0", "0"]);
        assert!(Wheels::parse(Policy::Autopilot, 1, &int_zero)
            .unwrap()
            .is_stationary());

        let float_zero = fields(&["0", "0", "1", "0.0", "-0.0", "1", "0", "1"]);
        assert!(Wheels::parse(Policy::PointGoalNav, 1, &float_zero)
            .unwrap()
            .is_stationary());

        let one_wheel = fields(&["0", "0", "1", "0", "3", "0"]);
        assert!(!Wheels::parse(Policy::Autopilot, 1, &one_wheel)
            .unwrap()
            .is_stationary());
    }

    #[test]
    fn test_float_wheels_rejected_for_autopilot() {
        let record = fields(&["0", "0", "1", "0.5", "1", "0"]);
        let err = Wheels::parse(Policy::Autopilot, 42, &record).unwrap_err();
        match err {
            LabelError::FieldParse {
                timestamp,
                field,
                value,
            } => {
                assert_eq!(timestamp, 42);
                assert_eq!(field, "left");
                assert_eq!(value, "0.5");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_goal_field_is_parse_error() {
        let record = fields(&["0", "0", "1", "0.5", "1", "2.0"]);
        let wheels = Wheels::parse(Policy::PointGoalNav, 7, &record).unwrap();
        let err = ControlLabel::from_record(wheels, 7, &record).unwrap_err();
        assert!(matches!(err, LabelError::FieldParse { field: "sinYaw", .. }));
    }
}
