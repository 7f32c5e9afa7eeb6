//! Aggregation of task outcomes into a build summary.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{BuildId, TaskOutcome};

/// Caller-facing result of one build run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildSummary {
    /// Run this summary belongs to.
    pub build_id: BuildId,

    /// True iff no target failed.
    pub success: bool,

    /// `"<label>: <path>"` for each built target, in completion order.
    pub built_targets: Vec<String>,

    /// `"<label>: <diagnostic>"` for each failed target, in completion order.
    pub failed_targets: Vec<String>,

    /// Output directory the executables were written to.
    pub output_dir: PathBuf,

    /// How many of the failed targets were cancelled rather than rejected
    /// by the toolchain.
    pub cancelled: usize,

    /// When aggregation happened.
    pub finished_at: DateTime<Utc>,
}

impl BuildSummary {
    /// Partition `outcomes` into built and failed targets.
    ///
    /// Arrival order is kept inside each partition; the partitioning itself
    /// does not depend on it.
    pub fn aggregate(
        build_id: BuildId,
        outcomes: impl IntoIterator<Item = TaskOutcome>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        let mut built_targets = Vec::new();
        let mut failed_targets = Vec::new();
        let mut cancelled = 0;

        for outcome in outcomes {
            if outcome.is_success() {
                built_targets.push(format!(
                    "{}: {}",
                    outcome.target.name,
                    outcome.output_path.display()
                ));
            } else {
                if outcome.is_cancelled() {
                    cancelled += 1;
                }
                failed_targets.push(format!(
                    "{}: {}",
                    outcome.target.name,
                    outcome.diagnostic.as_deref().unwrap_or_default()
                ));
            }
        }

        Self {
            build_id,
            success: failed_targets.is_empty(),
            built_targets,
            failed_targets,
            output_dir: output_dir.into(),
            cancelled,
            finished_at: Utc::now(),
        }
    }

    /// Number of targets covered by this summary.
    pub fn total(&self) -> usize {
        self.built_targets.len() + self.failed_targets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BuildTarget;

    fn linux() -> BuildTarget {
        BuildTarget::new("linux", "amd64", "Linux x64")
    }

    fn windows() -> BuildTarget {
        BuildTarget::new("windows", "amd64", "Windows x64")
    }

    fn synthetic(pattern: u32, count: u32) -> Vec<TaskOutcome> {
        (0..count)
            .map(|i| {
                let target = BuildTarget::new("linux", format!("arch{i}"), format!("T{i}"));
                let path = PathBuf::from(format!("bin/app_{i}"));
                if pattern & (1 << i) != 0 {
                    TaskOutcome::failed(target, path, "boom", 1)
                } else {
                    TaskOutcome::built(target, path, 1)
                }
            })
            .collect()
    }

    #[test]
    fn test_mixed_outcomes() {
        let outcomes = vec![
            TaskOutcome::built(linux(), PathBuf::from("bin/app_linux_amd64"), 10),
            TaskOutcome::failed(
                windows(),
                PathBuf::from("bin/app_windows_amd64.exe"),
                "exit status 1",
                12,
            ),
        ];
        let summary = BuildSummary::aggregate(BuildId::new("b"), outcomes, "bin");

        assert!(!summary.success);
        assert_eq!(summary.built_targets, vec!["Linux x64: bin/app_linux_amd64"]);
        assert_eq!(summary.failed_targets, vec!["Windows x64: exit status 1"]);
        assert_eq!(summary.output_dir, PathBuf::from("bin"));
        assert_eq!(summary.cancelled, 0);
    }

    #[test]
    fn test_success_iff_no_failures() {
        // Every success/failure combination of up to four outcomes.
        for count in 0..=4u32 {
            for pattern in 0..(1u32 << count) {
                let summary =
                    BuildSummary::aggregate(BuildId::generate(), synthetic(pattern, count), "bin");
                assert_eq!(summary.success, summary.failed_targets.is_empty());
                assert_eq!(summary.success, pattern == 0);
                assert_eq!(summary.total(), count as usize);
                assert_eq!(summary.failed_targets.len(), pattern.count_ones() as usize);
            }
        }
    }

    #[test]
    fn test_partition_independent_of_order() {
        let mut outcomes = synthetic(0b0101, 4);
        let forward = BuildSummary::aggregate(BuildId::new("f"), outcomes.clone(), "bin");
        outcomes.reverse();
        let backward = BuildSummary::aggregate(BuildId::new("r"), outcomes, "bin");

        let mut a = forward.built_targets.clone();
        let mut b = backward.built_targets.clone();
        a.sort();
        b.sort();
        assert_eq!(a, b);
        assert_eq!(forward.failed_targets.len(), backward.failed_targets.len());
    }

    #[test]
    fn test_cancelled_counts_as_failed() {
        let outcomes = vec![
            TaskOutcome::built(linux(), PathBuf::from("bin/app_linux_amd64"), 5),
            TaskOutcome::cancelled(
                windows(),
                PathBuf::from("bin/app_windows_amd64.exe"),
                "build cancelled",
                0,
            ),
        ];
        let summary = BuildSummary::aggregate(BuildId::generate(), outcomes, "bin");

        assert!(!summary.success);
        assert_eq!(summary.cancelled, 1);
        assert_eq!(summary.failed_targets, vec!["Windows x64: build cancelled"]);
    }

    #[test]
    fn test_empty_outcomes_is_success() {
        let summary = BuildSummary::aggregate(BuildId::generate(), Vec::new(), "bin");
        assert!(summary.success);
        assert_eq!(summary.total(), 0);
    }
}
