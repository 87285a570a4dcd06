//! Delimited log reader

use std::path::Path;

use contracts::{timestamp_in_range, LabelError, Result, Timestamp, TimestampedRecords};
use metrics::counter;
use tracing::{debug, instrument};

/// Line accounting for one parsed log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseReport {
    /// Records kept
    pub records: usize,
    /// Comment lines skipped
    pub comments: usize,
    /// Lines with a timestamp but no data fields
    pub short_lines: usize,
    /// Records that replaced an earlier one with the same timestamp
    pub duplicates: usize,
}

/// Read a log file from disk
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn read_records(path: &Path) -> Result<TimestampedRecords> {
    let content = std::fs::read_to_string(path).map_err(|e| LabelError::io(path, e))?;
    let (records, report) = parse_records(&content, path)?;

    if report.short_lines > 0 {
        counter!("labeler_log_lines_dropped_total").increment(report.short_lines as u64);
    }
    debug!(
        records = report.records,
        comments = report.comments,
        short_lines = report.short_lines,
        duplicates = report.duplicates,
        "Log parsed"
    );

    Ok(records)
}

/// Parse log content. `source` is only used in error messages.
///
/// The first line is a header and is always discarded. Commas and tabs
/// separate fields like spaces do.
pub fn parse_records(content: &str, source: &Path) -> Result<(TimestampedRecords, ParseReport)> {
    let mut records = TimestampedRecords::new();
    let mut report = ParseReport::default();

    // line numbers are 1-based and count the header
    for (line_no, line) in content.lines().enumerate().skip(1).map(|(i, l)| (i + 1, l)) {
        if line.trim_start().starts_with('#') {
            report.comments += 1;
            continue;
        }

        let normalized = line.replace([',', '\t'], " ");
        let mut tokens = normalized.split_whitespace();
        let Some(first) = tokens.next() else {
            continue;
        };
        let fields: Vec<String> = tokens.map(str::to_string).collect();
        if fields.is_empty() {
            report.short_lines += 1;
            continue;
        }

        let timestamp = first
            .parse::<Timestamp>()
            .ok()
            .filter(|&ts| timestamp_in_range(ts))
            .ok_or_else(|| LabelError::TimestampParse {
                path: source.to_path_buf(),
                line: line_no,
                value: first.to_string(),
            })?;

        if records.insert(timestamp, fields).is_some() {
            report.duplicates += 1;
        }
    }

    report.records = records.len();
    Ok((records, report))
}
