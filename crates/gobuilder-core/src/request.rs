//! Build parameters, defaults and the resolved request.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{default_targets, BuildTarget};

/// Parallel jobs used by the quick-build preset.
pub const QUICK_BUILD_JOBS: i64 = 2;

/// Raw build parameters as supplied by a caller.
///
/// Empty strings, an empty target list and non-positive job counts all mean
/// "use the default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildParams {
    /// Go source file (or package path) to build.
    pub source_file: String,

    /// Base name of the produced executables.
    pub app_name: String,

    /// Directory the executables are written to.
    pub output_dir: String,

    /// Targets to compile for.
    pub targets: Vec<BuildTarget>,

    /// Number of parallel build jobs.
    pub jobs: i64,
}

impl BuildParams {
    /// The quick-build preset: Linux x64 and Windows x64 with two jobs.
    pub fn quick(
        source_file: impl Into<String>,
        app_name: impl Into<String>,
        output_dir: impl Into<String>,
    ) -> Self {
        Self {
            source_file: source_file.into(),
            app_name: app_name.into(),
            output_dir: output_dir.into(),
            targets: default_targets(),
            jobs: QUICK_BUILD_JOBS,
        }
    }
}

/// Values substituted for parameters the caller left empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildDefaults {
    pub source_file: String,
    pub app_name: String,
    pub output_dir: String,
    pub jobs: NonZeroUsize,
    pub targets: Vec<BuildTarget>,
}

impl Default for BuildDefaults {
    fn default() -> Self {
        Self {
            source_file: "./main.go".to_string(),
            app_name: "app".to_string(),
            output_dir: "bin".to_string(),
            jobs: NonZeroUsize::new(4).unwrap_or(NonZeroUsize::MIN),
            targets: default_targets(),
        }
    }
}

/// A fully resolved build request. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildRequest {
    pub source_file: PathBuf,
    pub app_name: String,
    pub output_dir: PathBuf,
    pub targets: Vec<BuildTarget>,
    pub jobs: NonZeroUsize,
}

impl BuildRequest {
    /// Apply `defaults` to every parameter the caller left empty.
    pub fn resolve(params: BuildParams, defaults: &BuildDefaults) -> Self {
        fn or_default(value: String, default: &str) -> String {
            if value.is_empty() {
                default.to_string()
            } else {
                value
            }
        }

        let targets = if params.targets.is_empty() {
            defaults.targets.clone()
        } else {
            params.targets
        };

        let jobs = usize::try_from(params.jobs)
            .ok()
            .and_then(NonZeroUsize::new)
            .unwrap_or(defaults.jobs);

        Self {
            source_file: PathBuf::from(or_default(params.source_file, &defaults.source_file)),
            app_name: or_default(params.app_name, &defaults.app_name),
            output_dir: PathBuf::from(or_default(params.output_dir, &defaults.output_dir)),
            targets,
            jobs,
        }
    }
}
