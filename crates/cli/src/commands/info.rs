//! `info` command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use contracts::{LabelerConfig, MatchStage, Policy, SessionLayout};
use ingestion::read_records;
use serde::Serialize;
use session_matcher::{control_range, discover_sessions, ControlRange};
use tracing::{info, warn};

use crate::cli::InfoArgs;
use crate::settings::resolve_config;

/// Run info for JSON output
#[derive(Serialize)]
struct RunInfo {
    data_dir: String,
    datasets: Vec<String>,
    policy: String,
    max_offset: i64,
    sessions: Vec<SessionInfo>,
}

#[derive(Serialize)]
struct SessionInfo {
    path: String,
    /// `None` when the log is missing or unreadable
    frames: Option<usize>,
    controls: Option<usize>,
    stages: Vec<StageInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    control_range: Option<ControlRangeInfo>,
}

/// Wheel range rescaled to ±255
#[derive(Serialize, Debug, PartialEq)]
struct ControlRangeInfo {
    max_control: i64,
    left: [i64; 2],
    right: [i64; 2],
}

impl From<ControlRange> for ControlRangeInfo {
    fn from(range: ControlRange) -> Self {
        Self {
            max_control: range.max_control,
            left: [range.left.0, range.left.1],
            right: [range.right.0, range.right.1],
        }
    }
}

#[derive(Serialize)]
struct StageInfo {
    stage: &'static str,
    file: String,
    cached: bool,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    let config = resolve_config(&args.source)?;
    info!(data_dir = %config.data_dir.display(), "Inspecting sessions");

    let sessions = discover_sessions(&config.data_dir, &config.datasets)
        .context("Failed to discover sessions")?;

    let sessions = sessions
        .iter()
        .map(|session| inspect_session(session, config.matching.policy, args.controls))
        .collect();
    let info = build_run_info(&config, sessions);

    if args.json {
        let json = serde_json::to_string_pretty(&info).context("Failed to serialize run info")?;
        println!("{}", json);
    } else {
        print_run_info(&info);
    }

    Ok(())
}

fn build_run_info(config: &LabelerConfig, sessions: Vec<SessionInfo>) -> RunInfo {
    RunInfo {
        data_dir: config.data_dir.display().to_string(),
        datasets: config.datasets.clone(),
        policy: config.matching.policy.to_string(),
        max_offset: config.matching.max_offset,
        sessions,
    }
}

fn inspect_session(session: &Path, policy: Policy, controls: bool) -> SessionInfo {
    let layout = SessionLayout::new(session);
    let stages: Vec<StageInfo> = [
        (MatchStage::FrameCtrl, layout.frame_ctrl_file()),
        (MatchStage::FrameCmd, layout.matched_file(policy)),
        (MatchStage::Finalize, layout.processed_file(policy)),
    ]
    .into_iter()
    .map(|(stage, file)| StageInfo {
        stage: stage.as_str(),
        cached: file.is_file(),
        file: file.display().to_string(),
    })
    .collect();

    // A later stage's file without the earlier one is still reused as-is.
    if let Some(pair) = stages.windows(2).find(|w| !w[0].cached && w[1].cached) {
        warn!(
            session = %session.display(),
            missing = pair[0].stage,
            cached = pair[1].stage,
            "Stage output cached without its input"
        );
    }

    let matched = layout.matched_file(policy);
    let range = (controls && policy == Policy::Autopilot && matched.is_file())
        .then(|| read_records(&matched).and_then(|records| control_range(&records)))
        .and_then(|result| match result {
            Ok(range) => range.map(ControlRangeInfo::from),
            Err(e) => {
                warn!(session = %session.display(), error = %e, "Control range unavailable");
                None
            }
        });

    SessionInfo {
        path: session.display().to_string(),
        frames: count_records(&layout.frames_log()),
        controls: count_records(&layout.ctrl_log()),
        stages,
        control_range: range,
    }
}

fn count_records(path: &Path) -> Option<usize> {
    read_records(path).map(|records| records.len()).ok()
}

fn print_run_info(info: &RunInfo) {
    println!("=== Session Labeler ===\n");
    println!("Data dir: {}", info.data_dir);
    println!("Datasets: {}", info.datasets.join(", "));
    println!("Policy: {}", info.policy);
    println!("Max offset: {}", info.max_offset);

    println!("\nSessions ({})", info.sessions.len());
    for (i, session) in info.sessions.iter().enumerate() {
        let is_last = i == info.sessions.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        let child_prefix = if is_last { "   " } else { "│  " };

        println!("   {} {}", prefix, session.path);
        println!(
            "   {}  ├─ frames: {}, controls: {}",
            child_prefix,
            display_count(session.frames),
            display_count(session.controls)
        );
        if let Some(range) = &session.control_range {
            println!(
                "   {}  ├─ max control: {} (left {:?}, right {:?} at ±255)",
                child_prefix, range.max_control, range.left, range.right
            );
        }
        let stages: Vec<String> = session
            .stages
            .iter()
            .map(|s| format!("{}={}", s.stage, if s.cached { "cached" } else { "pending" }))
            .collect();
        println!("   {}  └─ {}", child_prefix, stages.join(", "));
    }

    println!();
}

fn display_count(count: Option<usize>) -> String {
    count.map_or_else(|| "unreadable".to_string(), |n| n.to_string())
}
