//! # Ingestion
//!
//! Reads session logs and discovers sessions on disk.
//!
//! Responsibilities:
//! - Parse delimited log files into `TimestampedRecords`
//! - List dataset and session directories
//!
//! ## Log format
//!
//! ```text
//! timestamp[ns],frame          <- header, always discarded
//! # comment lines are skipped
//! 1609459200123,0               <- "<timestamp> <field> ..." (comma/tab/space)
//! 1609459200160                 <- no data fields, dropped
//! ```
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::{list_dirs, read_records};
//!
//! for session in list_dirs(&dataset_dir)? {
//!     let frames = read_records(&dataset_dir.join(session).join("sensor_data/rgbFrames.txt"))?;
//! }
//! ```

mod discovery;
mod reader;

pub use contracts::{LabelError, Result, Timestamp, TimestampedRecords};
pub use discovery::list_dirs;
pub use reader::{parse_records, read_records, ParseReport};
