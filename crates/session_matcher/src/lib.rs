//! # Session Matcher
//!
//! Turns one recording session into a training label file.
//!
//! Responsibilities:
//! - Associate frames with control signals, then with commands or goals
//! - Cache every intermediate file; skip stages whose output exists
//! - Filter incomplete and stationary records, attach image paths
//!
//! ## Usage Example
//!
//! ```no_run
//! use contracts::{MatchOptions, Policy};
//! use session_matcher::match_session;
//! use std::path::Path;
//!
//! let options = MatchOptions {
//!     max_offset: 1000,
//!     policy: Policy::Autopilot,
//!     ..Default::default()
//! };
//! let labels = match_session(Path::new("data/train_data/session_1"), &options).unwrap();
//! for (timestamp, fields) in &labels {
//!     println!("{timestamp}: {}", fields[0]);
//! }
//! ```

mod batch;
mod label;
mod matcher;
mod scale;
mod writer;

pub use batch::{discover_sessions, match_frame_ctrl_input};
pub use contracts::{MatchOptions, Policy, SessionReport};
pub use label::{ControlLabel, Wheels};
pub use matcher::{match_session, match_session_with_report, SessionMatcher};
pub use scale::{control_range, max_control, normalize, ControlRange, CTRL_SCALE};
