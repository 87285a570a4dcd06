//! `run` command implementation.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use contracts::{LabelerConfig, MatchOptions, SessionReport};
use observability::{record_session_failed, record_session_metrics, LabelStatsAggregator};
use session_matcher::{discover_sessions, match_session_with_report};
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::error::{self, CliError};
use crate::settings::resolve_config;

/// What one session contributed to the batch
#[derive(Debug)]
struct SessionOutcome {
    report: SessionReport,
    frames: Vec<String>,
}

/// Execute the `run` command
pub async fn run_labeling(args: &RunArgs) -> Result<()> {
    let mut config = resolve_config(&args.source)?;
    if args.redo_matching {
        config.matching.redo_matching = true;
    }
    if args.keep_zeros {
        config.matching.remove_zeros = false;
    }

    info!(
        data_dir = %config.data_dir.display(),
        datasets = ?config.datasets,
        policy = %config.matching.policy,
        max_offset = config.matching.max_offset,
        redo_matching = config.matching.redo_matching,
        remove_zeros = config.matching.remove_zeros,
        "Configuration loaded"
    );

    let sessions = discover_sessions(&config.data_dir, &config.datasets)
        .context("Failed to discover sessions")?;

    if args.dry_run {
        info!("Dry run mode - listing sessions, exiting");
        print_session_list(&config, &sessions);
        return Ok(());
    }

    if sessions.is_empty() {
        warn!("No sessions found");
    }

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
        info!("Metrics endpoint available on port {}", args.metrics_port);
    }

    let start_time = Instant::now();
    let jobs = args.jobs.max(1);
    info!(sessions = sessions.len(), jobs, "Starting labeling...");

    let outcomes = label_sessions(sessions, config.matching, jobs).await?;

    let mut aggregator = LabelStatsAggregator::new();
    let mut frames = Vec::new();
    for outcome in outcomes {
        aggregator.update(&outcome.report);
        frames.extend(outcome.frames);
    }

    if let Some(path) = &args.frame_list {
        write_frame_list(path, &frames)
            .with_context(|| format!("Failed to write frame list to {}", path.display()))?;
        info!(path = %path.display(), frames = frames.len(), "Frame list written");
    }

    info!(
        frames = frames.len(),
        duration_secs = start_time.elapsed().as_secs_f64(),
        "Labeling completed successfully"
    );
    println!("\n{}", aggregator.summary());

    Ok(())
}

/// Match sessions on the blocking pool, at most `jobs` at a time.
///
/// Outcomes come back in session order. The first failure aborts the batch.
async fn label_sessions(
    sessions: Vec<PathBuf>,
    options: MatchOptions,
    jobs: usize,
) -> error::Result<Vec<SessionOutcome>> {
    let mut outcomes: Vec<Option<SessionOutcome>> = sessions.iter().map(|_| None).collect();
    let mut pending = sessions.into_iter().enumerate();
    let mut tasks = JoinSet::new();

    loop {
        while tasks.len() < jobs {
            let Some((index, session)) = pending.next() else {
                break;
            };
            tasks.spawn_blocking(move || (index, label_session(&session, &options)));
        }

        let Some(joined) = tasks.join_next().await else {
            break;
        };
        let (index, result) = joined.map_err(|e| CliError::worker(e.to_string()))?;
        match result {
            Ok(outcome) => outcomes[index] = Some(outcome),
            Err(e) => {
                tasks.abort_all();
                return Err(e);
            }
        }
    }

    Ok(outcomes.into_iter().flatten().collect())
}

fn label_session(session: &Path, options: &MatchOptions) -> error::Result<SessionOutcome> {
    let (labels, report) = match_session_with_report(session, options).map_err(|e| {
        record_session_failed(options.policy.as_str());
        CliError::session_failed(session, e)
    })?;
    record_session_metrics(&report);

    let frames = labels
        .into_values()
        .filter_map(|fields| fields.into_iter().next())
        .collect();
    Ok(SessionOutcome { report, frames })
}

fn write_frame_list(path: &Path, frames: &[String]) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for frame in frames {
        writeln!(writer, "{frame}")?;
    }
    writer.flush()
}

/// Print the sessions for dry-run mode
fn print_session_list(config: &LabelerConfig, sessions: &[PathBuf]) {
    println!("\n=== Sessions ({}) ===\n", sessions.len());
    println!("Data dir: {}", config.data_dir.display());
    println!("Policy: {}", config.matching.policy);
    println!("Max offset: {}", config.matching.max_offset);
    println!();
    for session in sessions {
        println!("  - {}", session.display());
    }
    println!();
}
