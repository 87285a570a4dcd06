//! 标注指标收集模块
//!
//! 从 `SessionReport` 记录 Prometheus 计数器，并在内存中汇总运行结束时的统计。

use contracts::{MatchStage, SessionReport, StageOutcome};
use metrics::{counter, histogram};

/// Record metrics for one finished session
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_session_metrics;
///
/// let (_, report) = match_session_with_report(&session, &options)?;
/// record_session_metrics(&report);
/// ```
pub fn record_session_metrics(report: &SessionReport) {
    let policy = report.policy.as_str();

    counter!("labeler_sessions_total", "policy" => policy, "status" => "ok").increment(1);

    for stage in [MatchStage::FrameCtrl, MatchStage::FrameCmd, MatchStage::Finalize] {
        let outcome = match report.outcome(stage) {
            StageOutcome::Computed => "computed",
            StageOutcome::Cached => "cached",
        };
        counter!(
            "labeler_stages_total",
            "stage" => stage.as_str(),
            "outcome" => outcome
        )
        .increment(1);
    }

    // 匹配偏移（tick，有符号）
    for offset in &report.ctrl_offsets {
        histogram!("labeler_match_offset", "stage" => MatchStage::FrameCtrl.as_str())
            .record(*offset as f64);
    }
    for offset in &report.cmd_offsets {
        histogram!("labeler_match_offset", "stage" => MatchStage::FrameCmd.as_str())
            .record(*offset as f64);
    }

    counter!("labeler_frames_labeled_total", "policy" => policy).increment(report.labeled as u64);
    if report.removed > 0 {
        counter!("labeler_frames_removed_total", "policy" => policy)
            .increment(report.removed as u64);
    }
    if report.skipped > 0 {
        counter!("labeler_records_skipped_total", "policy" => policy)
            .increment(report.skipped as u64);
    }
}

/// 记录因致命错误中止的会话
pub fn record_session_failed(policy: &str) {
    counter!(
        "labeler_sessions_total",
        "policy" => policy.to_string(),
        "status" => "failed"
    )
    .increment(1);
}

/// 运行级聚合器
///
/// 在内存中汇总会话报告，用于运行结束时打印摘要。
#[derive(Debug, Clone, Default)]
pub struct LabelStatsAggregator {
    /// Sessions processed
    pub sessions: u64,

    /// Sessions where every stage was cached
    pub fully_cached_sessions: u64,

    /// Stages computed / served from cache
    pub stages_computed: u64,
    pub stages_cached: u64,

    /// Final label rows
    pub frames_labeled: u64,

    /// Stationary frames dropped
    pub frames_removed: u64,

    /// Short records skipped
    pub records_skipped: u64,

    /// `ctrl - frame` offsets
    pub ctrl_offset_stats: RunningStats,

    /// `cmd - frame` offsets
    pub cmd_offset_stats: RunningStats,
}

impl LabelStatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one session into the totals
    pub fn update(&mut self, report: &SessionReport) {
        self.sessions += 1;
        if report.fully_cached() {
            self.fully_cached_sessions += 1;
        }

        for stage in [MatchStage::FrameCtrl, MatchStage::FrameCmd, MatchStage::Finalize] {
            match report.outcome(stage) {
                StageOutcome::Computed => self.stages_computed += 1,
                StageOutcome::Cached => self.stages_cached += 1,
            }
        }

        self.frames_labeled += report.labeled as u64;
        self.frames_removed += report.removed as u64;
        self.records_skipped += report.skipped as u64;

        for offset in &report.ctrl_offsets {
            self.ctrl_offset_stats.push(*offset as f64);
        }
        for offset in &report.cmd_offsets {
            self.cmd_offset_stats.push(*offset as f64);
        }
    }

    /// Build the summary report
    pub fn summary(&self) -> RunSummary {
        let considered = self.frames_labeled + self.frames_removed;
        RunSummary {
            sessions: self.sessions,
            fully_cached_sessions: self.fully_cached_sessions,
            stages_computed: self.stages_computed,
            stages_cached: self.stages_cached,
            frames_labeled: self.frames_labeled,
            frames_removed: self.frames_removed,
            records_skipped: self.records_skipped,
            removal_rate: if considered > 0 {
                self.frames_removed as f64 / considered as f64 * 100.0
            } else {
                0.0
            },
            ctrl_offset: StatsSummary::from(&self.ctrl_offset_stats),
            cmd_offset: StatsSummary::from(&self.cmd_offset_stats),
        }
    }
}

/// Run summary
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub sessions: u64,
    pub fully_cached_sessions: u64,
    pub stages_computed: u64,
    pub stages_cached: u64,
    pub frames_labeled: u64,
    pub frames_removed: u64,
    pub records_skipped: u64,
    pub removal_rate: f64,
    pub ctrl_offset: StatsSummary,
    pub cmd_offset: StatsSummary,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Labeling Summary ===")?;
        writeln!(
            f,
            "Sessions: {} ({} fully cached)",
            self.sessions, self.fully_cached_sessions
        )?;
        writeln!(
            f,
            "Stages: {} computed, {} cached",
            self.stages_computed, self.stages_cached
        )?;
        writeln!(f, "Frames labeled: {}", self.frames_labeled)?;
        writeln!(
            f,
            "Frames removed: {} ({:.2}%)",
            self.frames_removed, self.removal_rate
        )?;
        writeln!(f, "Records skipped: {}", self.records_skipped)?;
        writeln!(f, "Ctrl offset: {}", self.ctrl_offset)?;
        writeln!(f, "Cmd offset: {}", self.cmd_offset)?;
        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.1}, max={:.1}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计（Welford 算法）
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a sample
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
