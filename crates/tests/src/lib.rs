//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 基于生成数据流的 Associator 性质测试
//! - 在临时目录树上运行完整的会话与批处理

#[cfg(test)]
mod contract_tests {
    use contracts::{MatchOptions, Policy};

    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
    }

    #[test]
    fn test_default_options_snapshot() {
        let options = MatchOptions::default();
        assert_eq!(options.max_offset, 1000);
        assert!(!options.redo_matching);
        assert!(options.remove_zeros);
        assert_eq!(options.policy, Policy::Autopilot);
    }
}

/// Shared fixtures
#[cfg(test)]
mod fixtures {
    use std::fs;
    use std::path::{Path, PathBuf};

    use contracts::TimestampedRecords;

    /// Write `files` into `<root>/sensor_data/` and return the session root
    pub fn write_session(root: &Path, files: &[(&str, &str)]) -> PathBuf {
        let sensor = root.join("sensor_data");
        fs::create_dir_all(&sensor).unwrap();
        for (name, content) in files {
            fs::write(sensor.join(name), content).unwrap();
        }
        root.to_path_buf()
    }

    pub fn autopilot_session(root: &Path, frames: &str, ctrls: &str) -> PathBuf {
        write_session(
            root,
            &[
                ("rgbFrames.txt", frames),
                ("ctrlLog.txt", ctrls),
                ("indicatorLog.txt", "timestamp cmd\n"),
            ],
        )
    }

    /// Deterministic LCG so property tests need no RNG crate
    pub struct Lcg(u64);

    impl Lcg {
        pub fn new(seed: u64) -> Self {
            Self(seed)
        }

        pub fn next_below(&mut self, bound: i64) -> i64 {
            self.0 = self
                .0
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((self.0 >> 33) % bound as u64) as i64
        }

        pub fn stream(&mut self, len: usize, span: i64) -> TimestampedRecords {
            (0..len)
                .map(|i| (self.next_below(span), vec![format!("v{i}")]))
                .collect()
        }
    }
}

#[cfg(test)]
mod associator_properties {
    use std::collections::HashSet;

    use associator::{associate, candidates};

    use crate::fixtures::Lcg;

    #[test]
    fn test_matches_unique_sorted_and_bounded() {
        let mut rng = Lcg::new(7);
        for round in 0..50 {
            let first = rng.stream(1 + round % 13, 500);
            let second = rng.stream(1 + round % 7, 500);
            let max_offset = 1 + rng.next_below(120);

            let matches = associate(&first, &second, max_offset);

            let firsts: Vec<_> = matches.iter().map(|m| m.first).collect();
            let mut sorted = firsts.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(firsts, sorted, "round {round}: not strictly ascending");

            for m in &matches {
                assert!(first.contains_key(&m.first));
                assert!(second.contains_key(&m.second));
                assert!(m.offset() < max_offset, "round {round}: offset bound");
            }

            // Every first stamp with at least one candidate is matched.
            let reachable: HashSet<_> = candidates(&first, &second, max_offset)
                .iter()
                .map(|m| m.first)
                .collect();
            assert_eq!(reachable.len(), matches.len());
        }
    }

    #[test]
    fn test_each_first_takes_latest_allowed_second() {
        let mut rng = Lcg::new(42);
        let first = rng.stream(40, 1000);
        let second = rng.stream(25, 1000);
        let max_offset = 60;

        let expected: Vec<(i64, i64)> = first
            .keys()
            .filter_map(|&a| {
                second
                    .keys()
                    .rev()
                    .find(|&&b| b - a < max_offset)
                    .map(|&b| (a, b))
            })
            .collect();

        let actual: Vec<(i64, i64)> = associate(&first, &second, max_offset)
            .iter()
            .map(|m| (m.first, m.second))
            .collect();
        assert_eq!(actual, expected);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::fs;
    use std::path::Path;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{LabelError, MatchOptions, Policy, StageOutcome};
    use ingestion::read_records;
    use observability::LabelStatsAggregator;
    use session_matcher::{match_frame_ctrl_input, match_session, match_session_with_report};
    use tempfile::tempdir;

    use crate::fixtures::{autopilot_session, write_session};

    const FRAMES: &str = "timestamp frame\n100 img1\n200 img2\n";
    const CTRLS: &str = "timestamp left right\n95 10 20\n250 5 5\n";

    fn options(max_offset: i64) -> MatchOptions {
        MatchOptions {
            max_offset,
            ..Default::default()
        }
    }

    #[test]
    fn test_reference_example() {
        let dir = tempdir().unwrap();
        let session = autopilot_session(dir.path(), FRAMES, CTRLS);

        let (labels, report) = match_session_with_report(&session, &options(50)).unwrap();

        let pairs: Vec<_> = read_records(&session.join("sensor_data/matched_frame_ctrl.txt"))
            .unwrap()
            .iter()
            .map(|(ts, fields)| (*ts, fields[0].parse::<i64>().unwrap() + ts))
            .collect();
        assert_eq!(pairs, vec![(100, 95), (200, 95)]);

        assert_eq!(labels.keys().copied().collect::<Vec<_>>(), vec![100, 200]);
        assert_eq!(&labels[&100][1..], &["10", "20", "0"]);
        assert_eq!(report.ctrl_offsets, vec![-5, -105]);
    }

    #[test]
    fn test_written_files_parse_back() {
        let dir = tempdir().unwrap();
        let session = autopilot_session(dir.path(), FRAMES, CTRLS);
        match_session(&session, &options(50)).unwrap();

        let matched = read_records(&session.join("sensor_data/matched_frame_ctrl_cmd.txt")).unwrap();
        assert_eq!(matched[&100], vec!["0", "-5", "img1", "10", "20", "0"]);
        assert_eq!(matched[&200], vec!["-100", "-105", "img2", "10", "20", "0"]);
    }

    #[test]
    fn test_empty_ctrl_log_is_fatal_and_writes_nothing() {
        let dir = tempdir().unwrap();
        let session = autopilot_session(dir.path(), FRAMES, "timestamp left right\n");

        let err = match_session(&session, &options(50)).unwrap_err();
        assert!(matches!(err, LabelError::EmptyLog { .. }));

        let written: Vec<_> = fs::read_dir(session.join("sensor_data"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with("matched"))
            .collect();
        assert!(written.is_empty(), "unexpected outputs: {written:?}");
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let dir = tempdir().unwrap();
        let session = autopilot_session(dir.path(), FRAMES, CTRLS);
        let sensor = session.join("sensor_data");
        let outputs = [
            "matched_frame_ctrl.txt",
            "matched_frame_ctrl_cmd.txt",
            "matched_frame_ctrl_cmd_processed.txt",
        ];

        let first = match_session(&session, &options(50)).unwrap();
        let snapshot: Vec<_> = outputs
            .iter()
            .map(|name| fs::read_to_string(sensor.join(name)).unwrap())
            .collect();

        // Inputs changed after the first run are ignored while caches exist.
        fs::write(sensor.join("ctrlLog.txt"), "timestamp left right\n").unwrap();

        let (second, report) = match_session_with_report(&session, &options(50)).unwrap();
        assert_eq!(first, second);
        assert!(report.fully_cached());
        for (name, before) in outputs.iter().zip(&snapshot) {
            assert_eq!(&fs::read_to_string(sensor.join(name)).unwrap(), before);
        }
    }

    #[test]
    fn test_zero_controls_filtered() {
        let dir = tempdir().unwrap();
        let session = autopilot_session(
            dir.path(),
            "timestamp frame\n100 a\n200 b\n300 c\n",
            "timestamp left right\n100 0 0\n200 0 7\n300 0 0\n",
        );

        let (labels, report) = match_session_with_report(&session, &options(50)).unwrap();
        assert_eq!(labels.keys().copied().collect::<Vec<_>>(), vec![200]);
        assert_eq!(report.removed, 2);

        let kept = MatchOptions {
            remove_zeros: false,
            redo_matching: true,
            ..options(50)
        };
        let (labels, report) = match_session_with_report(&session, &kept).unwrap();
        assert_eq!(labels.len(), 3);
        assert_eq!(report.removed, 0);
        assert_eq!(report.frame_ctrl, StageOutcome::Computed);
    }

    #[test]
    fn test_point_goal_nav_session() {
        let dir = tempdir().unwrap();
        let session = write_session(
            dir.path(),
            &[
                ("rgbFrames.txt", FRAMES),
                ("ctrlLog.txt", "timestamp left right\n95 0.5 0.25\n"),
                ("goalLog.txt", "timestamp dist sinYaw cosYaw\n90 3.2 0.1 0.995\n"),
            ],
        );
        let goal = MatchOptions {
            policy: Policy::PointGoalNav,
            ..options(50)
        };

        let labels = match_session(&session, &goal).unwrap();
        let frame = Path::new(&labels[&100][0]);
        assert_eq!(frame.file_name().unwrap(), "img1.jpeg");
        assert_eq!(
            &labels[&100][1..],
            &["0.500000", "0.250000", "3.200000", "0.100000", "0.995000"]
        );
    }

    #[test]
    fn test_configured_batch_run() {
        let data = tempdir().unwrap();
        autopilot_session(&data.path().join("train/s2"), "h\n10 x\n", "h\n0 1 1\n");
        autopilot_session(&data.path().join("train/s1"), FRAMES, CTRLS);
        autopilot_session(&data.path().join("val/s3"), "h\n5 y\n", "h\n0 2 2\n");
        fs::create_dir_all(data.path().join("train/.cache")).unwrap();

        let toml = format!(
            "data_dir = {:?}\ndatasets = [\"train\", \"val\"]\n\n[matching]\nmax_offset = 50\n",
            data.path().display().to_string()
        );
        let config = ConfigLoader::load_from_str(&toml, ConfigFormat::Toml).unwrap();

        let frames =
            match_frame_ctrl_input(&config.data_dir, &config.datasets, &config.matching).unwrap();

        let names: Vec<_> = frames
            .iter()
            .map(|f| Path::new(f).file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["img1_crop.jpeg", "img2_crop.jpeg", "x_crop.jpeg", "y_crop.jpeg"]
        );
    }

    #[test]
    fn test_aggregator_over_real_reports() {
        let data = tempdir().unwrap();
        let s1 = autopilot_session(&data.path().join("s1"), FRAMES, CTRLS);
        let s2 = autopilot_session(&data.path().join("s2"), "h\n10 x\n", "h\n0 0 0\n");

        let mut aggregator = LabelStatsAggregator::new();
        for session in [&s1, &s2, &s1] {
            let (_, report) = match_session_with_report(session, &options(50)).unwrap();
            aggregator.update(&report);
        }

        let summary = aggregator.summary();
        assert_eq!(summary.sessions, 3);
        assert_eq!(summary.fully_cached_sessions, 1);
        assert_eq!(summary.frames_labeled, 4);
        assert_eq!(summary.frames_removed, 1);
        assert_eq!(summary.ctrl_offset.count, 3);
    }

    #[tokio::test]
    async fn test_blocking_pool_matches_sequential() {
        let data = tempdir().unwrap();
        let sessions: Vec<_> = (0..4)
            .map(|i| {
                autopilot_session(
                    &data.path().join(format!("s{i}")),
                    &format!("h\n{} f{i}\n", 100 + i),
                    "h\n90 3 4\n",
                )
            })
            .collect();

        let handles: Vec<_> = sessions
            .iter()
            .cloned()
            .map(|s| tokio::task::spawn_blocking(move || match_session(&s, &options(50))))
            .collect();
        let mut parallel = Vec::new();
        for handle in handles {
            parallel.push(handle.await.unwrap().unwrap());
        }

        let rerun = MatchOptions {
            redo_matching: true,
            ..options(50)
        };
        for (session, labels) in sessions.iter().zip(&parallel) {
            assert_eq!(&match_session(session, &rerun).unwrap(), labels);
        }
    }
}
