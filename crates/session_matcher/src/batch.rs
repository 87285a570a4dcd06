//! Dataset-level driver

use std::path::{Path, PathBuf};

use contracts::{MatchOptions, Result};
use ingestion::list_dirs;
use tracing::info;

use crate::matcher::match_session;

/// Session directories of every dataset, in dataset order then name order
pub fn discover_sessions(data_dir: &Path, datasets: &[String]) -> Result<Vec<PathBuf>> {
    let mut sessions = Vec::new();
    for dataset in datasets {
        let dataset_dir = data_dir.join(dataset);
        let names = list_dirs(&dataset_dir)?;
        info!(dataset = %dataset, sessions = names.len(), "Dataset discovered");
        sessions.extend(names.into_iter().map(|name| dataset_dir.join(name)));
    }
    Ok(sessions)
}

/// Match every session and collect the labeled frame image paths.
///
/// Sessions run one after another; the first fatal error aborts the batch.
pub fn match_frame_ctrl_input(
    data_dir: &Path,
    datasets: &[String],
    options: &MatchOptions,
) -> Result<Vec<String>> {
    let mut frames = Vec::new();
    for session_dir in discover_sessions(data_dir, datasets)? {
        let labels = match_session(&session_dir, options)?;
        frames.extend(labels.into_values().filter_map(|fields| fields.into_iter().next()));
    }
    Ok(frames)
}
