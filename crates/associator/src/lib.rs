//! # Associator
//!
//! 两条事件流之间的最近时间戳关联。
//!
//! Controls and commands are logged on change, frames are sampled
//! periodically, so stamps never line up exactly. For every first-stream
//! record the associator picks one second-stream record:
//! - any earlier record is allowed (the last known value is held)
//! - a later record is allowed only if it is less than `max_offset` ahead
//!
//! ## 使用示例
//!
//! ```
//! use associator::associate;
//! use contracts::{Match, TimestampedRecords};
//!
//! let frames = TimestampedRecords::from([
//!     (100, vec!["img1".to_string()]),
//!     (200, vec!["img2".to_string()]),
//! ]);
//! let controls = TimestampedRecords::from([
//!     (95, vec!["10".to_string(), "20".to_string()]),
//!     (250, vec!["5".to_string(), "5".to_string()]),
//! ]);
//!
//! let matches = associate(&frames, &controls, 50);
//! assert_eq!(matches, vec![Match::new(100, 95), Match::new(200, 95)]);
//! ```

mod associate;

pub use associate::{associate, candidates};
pub use contracts::{Match, Timestamp, TimestampedRecords};
