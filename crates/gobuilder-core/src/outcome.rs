//! Per-target task outcomes.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::BuildTarget;

/// How a single target's build ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeStatus {
    /// The toolchain exited successfully.
    Built,
    /// The toolchain failed, could not be started, or the task crashed.
    Failed,
    /// The build was cancelled before it could finish.
    Cancelled,
}

/// The result of building one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOutcome {
    /// Target this outcome belongs to.
    pub target: BuildTarget,

    /// Where the executable was (or would have been) written.
    ///
    /// For failed outcomes the file may be missing, partial or stale.
    pub output_path: PathBuf,

    pub status: OutcomeStatus,

    /// Raw toolchain output and error for failed or cancelled builds.
    pub diagnostic: Option<String>,

    /// Wall-clock time spent compiling, excluding the wait for a job slot.
    pub duration_ms: u64,
}

impl TaskOutcome {
    /// A successful build.
    pub fn built(target: BuildTarget, output_path: PathBuf, duration_ms: u64) -> Self {
        Self {
            target,
            output_path,
            status: OutcomeStatus::Built,
            diagnostic: None,
            duration_ms,
        }
    }

    /// A failed build carrying the toolchain diagnostic verbatim.
    pub fn failed(
        target: BuildTarget,
        output_path: PathBuf,
        diagnostic: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            target,
            output_path,
            status: OutcomeStatus::Failed,
            diagnostic: Some(diagnostic.into()),
            duration_ms,
        }
    }

    /// A build stopped by cancellation.
    pub fn cancelled(
        target: BuildTarget,
        output_path: PathBuf,
        diagnostic: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            target,
            output_path,
            status: OutcomeStatus::Cancelled,
            diagnostic: Some(diagnostic.into()),
            duration_ms,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Built
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == OutcomeStatus::Cancelled
    }
}
