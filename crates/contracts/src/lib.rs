//! # Contracts
//!
//! Shared data structures for the labeling workspace. Every other crate
//! depends on this one; it depends on none of them.
//!
//! ## Time Model
//! - Timestamps are integer ticks as written by the recording app
//!   (milliseconds in practice), stored as `i64`
//! - Offsets are always `second - first` and may be negative

mod config;
mod error;
mod matching;
mod policy;
mod record;
mod report;
mod session;

pub use config::*;
pub use error::*;
pub use matching::Match;
pub use policy::*;
pub use record::*;
pub use report::*;
pub use session::*;
