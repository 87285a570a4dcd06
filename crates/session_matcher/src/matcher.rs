//! Per-session matching pipeline.
//!
//! ```text
//! rgbFrames.txt ─┐
//!                ├─ associate ─> matched_frame_ctrl.txt ─┐
//! ctrlLog.txt ───┘                                       ├─ associate ─> matched_frame_ctrl_{cmd,goal}.txt
//! {indicator,goal}Log.txt ───────────────────────────────┘                          │
//!                                                     filter / finalize <───────────┘
//!                                                            │
//!                                           matched_frame_ctrl_{cmd,goal}_processed.txt
//! ```
//!
//! Every stage is skipped when its output exists, unless `redo_matching`.

use std::io::Write;
use std::path::Path;

use associator::associate;
use contracts::{
    first_timestamp, LabelError, MatchOptions, Result, SessionLayout, SessionReport,
    StageOutcome, Timestamp, TimestampedRecords, FRAME_CTRL_HEADER,
};
use ingestion::read_records;
use tracing::{debug, info, instrument};

use crate::label::{ControlLabel, Wheels, FRAME_FIELD};
use crate::writer::{write_atomic, write_matches};

/// Indicator value assumed before the first logged command
const NEUTRAL_COMMAND: &str = "0";

/// Matches one session directory
#[derive(Debug, Clone)]
pub struct SessionMatcher {
    layout: SessionLayout,
    options: MatchOptions,
}

/// Counts from the finalize stage
#[derive(Debug, Default)]
struct FinalizeCounts {
    removed: usize,
    skipped: usize,
}

impl SessionMatcher {
    pub fn new(session_dir: impl AsRef<Path>, options: MatchOptions) -> Self {
        Self {
            layout: SessionLayout::new(session_dir.as_ref()),
            options,
        }
    }

    pub fn layout(&self) -> &SessionLayout {
        &self.layout
    }

    /// Run all three stages and return the final labels.
    ///
    /// The result maps frame timestamp to `[frame_path, left, right, ...]`.
    #[instrument(
        name = "match_session",
        skip(self),
        fields(session = %self.layout.root().display(), policy = %self.options.policy)
    )]
    pub fn run(&self) -> Result<(TimestampedRecords, SessionReport)> {
        info!("Processing session");
        let policy = self.options.policy;
        let mut report = SessionReport::new(self.layout.root(), policy);

        if self.is_cached(&self.layout.frame_ctrl_file()) {
            info!("Frames and controls already matched");
            report.frame_ctrl = StageOutcome::Cached;
        } else {
            report.ctrl_offsets = self.match_frames_with_controls()?;
            info!(matches = report.ctrl_offsets.len(), "Frames and controls matched");
        }

        if self.is_cached(&self.layout.matched_file(policy)) {
            info!("Frames and commands already matched");
            report.frame_cmd = StageOutcome::Cached;
        } else {
            report.cmd_offsets = self.match_frames_with_commands()?;
            info!(
                matches = report.cmd_offsets.len(),
                "Frames and high-level commands matched"
            );
        }

        let processed = self.layout.processed_file(policy);
        if self.is_cached(&processed) {
            info!("Preprocessing already completed");
            report.finalize = StageOutcome::Cached;
        } else {
            let counts = self.finalize()?;
            report.removed = counts.removed;
            report.skipped = counts.skipped;
            info!(
                removed = counts.removed,
                skipped = counts.skipped,
                "Preprocessing completed"
            );
        }

        let labels = read_records(&processed)?;
        report.labeled = labels.len();
        Ok((labels, report))
    }

    fn is_cached(&self, output: &Path) -> bool {
        !self.options.redo_matching && output.is_file()
    }

    /// Stage 1: frames ↔ control signals
    fn match_frames_with_controls(&self) -> Result<Vec<Timestamp>> {
        let frames = read_required(&self.layout.frames_log())?;
        let ctrls = read_required(&self.layout.ctrl_log())?;

        let matches = associate(&frames, &ctrls, self.options.max_offset);
        write_matches(
            &self.layout.frame_ctrl_file(),
            FRAME_CTRL_HEADER,
            &matches,
            &frames,
            &ctrls,
        )?;

        Ok(matches.iter().map(|m| m.offset()).collect())
    }

    /// Stage 2: frame/control rows ↔ indicator commands or goals
    fn match_frames_with_commands(&self) -> Result<Vec<Timestamp>> {
        let policy = self.options.policy;
        let frames = read_required(&self.layout.frame_ctrl_file())?;
        let command_path = self.layout.command_log(policy);

        let commands = if policy.requires_command_log() {
            read_required(&command_path)?
        } else {
            with_neutral_command(&frames, read_records(&command_path)?)
        };

        let matches = associate(&frames, &commands, self.options.max_offset);
        write_matches(
            &self.layout.matched_file(policy),
            policy.spec().matched_header,
            &matches,
            &frames,
            &commands,
        )?;

        Ok(matches.iter().map(|m| m.offset()).collect())
    }

    /// Stage 3: drop short and stationary records, attach image paths
    fn finalize(&self) -> Result<FinalizeCounts> {
        let policy = self.options.policy;
        let spec = policy.spec();
        let matched = read_records(&self.layout.matched_file(policy))?;

        let mut rows = Vec::with_capacity(matched.len());
        let mut counts = FinalizeCounts::default();

        for (&timestamp, fields) in &matched {
            if fields.len() < spec.min_fields {
                debug!(timestamp, fields = fields.len(), "Skipping incomplete record");
                counts.skipped += 1;
                continue;
            }

            let wheels = Wheels::parse(policy, timestamp, fields)?;
            if self.options.remove_zeros && wheels.is_stationary() {
                info!(timestamp, "Removed timestamp");
                counts.removed += 1;
                continue;
            }

            let label = ControlLabel::from_record(wheels, timestamp, fields)?;
            let frame_path = self.layout.image_path(policy, &fields[FRAME_FIELD]);
            rows.push((timestamp, frame_path, label));
        }

        write_atomic(&self.layout.processed_file(policy), |w| {
            writeln!(w, "{}", spec.processed_header)?;
            for (timestamp, frame_path, label) in &rows {
                writeln!(w, "{timestamp},{},{label}", frame_path.display())?;
            }
            Ok(())
        })?;

        Ok(counts)
    }
}

/// Read a log that must contain at least one record
fn read_required(path: &Path) -> Result<TimestampedRecords> {
    let records = read_records(path)?;
    if records.is_empty() {
        return Err(LabelError::empty_log(path));
    }
    Ok(records)
}

/// Hold a neutral indicator from the first frame until the first command.
///
/// Frames logged before any command would otherwise have nothing to hold.
fn with_neutral_command(
    frames: &TimestampedRecords,
    mut commands: TimestampedRecords,
) -> TimestampedRecords {
    if let Some(first_frame) = first_timestamp(frames) {
        let needs_neutral =
            first_timestamp(&commands).map_or(true, |first_cmd| first_frame < first_cmd);
        if needs_neutral {
            commands.insert(first_frame, vec![NEUTRAL_COMMAND.to_string()]);
        }
    }
    commands
}

/// Match one session with the given options.
///
/// See [`SessionMatcher::run`].
pub fn match_session(session_dir: &Path, options: &MatchOptions) -> Result<TimestampedRecords> {
    match_session_with_report(session_dir, options).map(|(labels, _)| labels)
}

/// Like [`match_session`], also returning what each stage did
pub fn match_session_with_report(
    session_dir: &Path,
    options: &MatchOptions,
) -> Result<(TimestampedRecords, SessionReport)> {
    SessionMatcher::new(session_dir, *options).run()
}
