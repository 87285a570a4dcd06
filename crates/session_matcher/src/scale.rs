//! Control range helpers
//!
//! Wheel commands are logged in the app's native range. These helpers find
//! the range actually used in a session and rescale values to `±255`.

use contracts::{Policy, Result, TimestampedRecords};

use crate::label::Wheels;

/// Upper end of the rescaled range
pub const CTRL_SCALE: i64 = 255;

/// Observed left/right range of a session, rescaled to `±CTRL_SCALE`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlRange {
    /// Scale reference, see [`max_control`]
    pub max_control: i64,
    /// Rescaled `(min, max)` of the left wheel
    pub left: (i64, i64),
    /// Rescaled `(min, max)` of the right wheel
    pub right: (i64, i64),
}

/// Largest absolute left/right control in a frame/control/command file.
///
/// Only autopilot records with the full field count are considered. Falls
/// back to [`CTRL_SCALE`] when every control is zero or there are no records.
pub fn max_control(records: &TimestampedRecords) -> Result<i64> {
    Ok(scale_reference(&wheel_values(records)?))
}

/// Left/right extremes of a frame/control/command file, rescaled with [`normalize`].
///
/// `None` when no record carries a full set of autopilot fields.
pub fn control_range(records: &TimestampedRecords) -> Result<Option<ControlRange>> {
    let values = wheel_values(records)?;
    if values.is_empty() {
        return Ok(None);
    }

    let max_ctrl = scale_reference(&values);
    let bounds = |side: fn(&(i64, i64)) -> i64| {
        let (lo, hi) = values
            .iter()
            .map(side)
            .fold((i64::MAX, i64::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));
        (normalize(max_ctrl, lo), normalize(max_ctrl, hi))
    };

    Ok(Some(ControlRange {
        max_control: max_ctrl,
        left: bounds(|&(left, _)| left),
        right: bounds(|&(_, right)| right),
    }))
}

/// Rescale `value` from `[-max_ctrl, max_ctrl]` to `[-255, 255]`, truncating
pub fn normalize(max_ctrl: i64, value: i64) -> i64 {
    (value as f64 / max_ctrl as f64 * CTRL_SCALE as f64) as i64
}

fn wheel_values(records: &TimestampedRecords) -> Result<Vec<(i64, i64)>> {
    let min_fields = Policy::Autopilot.spec().min_fields;
    let mut values = Vec::new();

    for (&timestamp, fields) in records {
        if fields.len() < min_fields {
            continue;
        }
        if let Wheels::Int { left, right } = Wheels::parse(Policy::Autopilot, timestamp, fields)? {
            values.push((left, right));
        }
    }

    Ok(values)
}

fn scale_reference(values: &[(i64, i64)]) -> i64 {
    let max_val = values
        .iter()
        .map(|&(left, right)| left.saturating_abs().max(right.saturating_abs()))
        .max()
        .unwrap_or(0);
    if max_val == 0 {
        CTRL_SCALE
    } else {
        max_val
    }
}
