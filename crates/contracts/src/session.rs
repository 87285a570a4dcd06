//! SessionLayout - on-disk layout of one recording session
//!
//! ```text
//! <session>/
//!   sensor_data/   raw logs and matcher outputs
//!   images/        frame images
//! ```

use std::path::{Path, PathBuf};

use crate::Policy;

pub const SENSOR_DATA_DIR: &str = "sensor_data";
pub const IMAGES_DIR: &str = "images";

pub const FRAMES_LOG: &str = "rgbFrames.txt";
pub const CTRL_LOG: &str = "ctrlLog.txt";

pub const FRAME_CTRL_FILE: &str = "matched_frame_ctrl.txt";
pub const FRAME_CTRL_HEADER: &str = "timestamp (frame),time_offset (ctrl-frame),frame,left,right";

/// Resolved paths for a session directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLayout {
    root: PathBuf,
}

impl SessionLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn sensor_dir(&self) -> PathBuf {
        self.root.join(SENSOR_DATA_DIR)
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join(IMAGES_DIR)
    }

    pub fn frames_log(&self) -> PathBuf {
        self.sensor_dir().join(FRAMES_LOG)
    }

    pub fn ctrl_log(&self) -> PathBuf {
        self.sensor_dir().join(CTRL_LOG)
    }

    /// Output of the frame/control pass
    pub fn frame_ctrl_file(&self) -> PathBuf {
        self.sensor_dir().join(FRAME_CTRL_FILE)
    }

    pub fn command_log(&self, policy: Policy) -> PathBuf {
        self.sensor_dir().join(policy.spec().command_log)
    }

    /// Output of the merged/command pass
    pub fn matched_file(&self, policy: Policy) -> PathBuf {
        self.sensor_dir().join(policy.spec().matched_file)
    }

    /// Final label file
    pub fn processed_file(&self, policy: Policy) -> PathBuf {
        self.sensor_dir().join(policy.spec().processed_file)
    }

    /// Image written by the app for `frame_id`
    pub fn image_path(&self, policy: Policy, frame_id: &str) -> PathBuf {
        self.images_dir()
            .join(format!("{frame_id}{}", policy.spec().image_suffix))
    }
}
