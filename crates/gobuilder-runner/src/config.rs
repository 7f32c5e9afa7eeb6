//! Runner configuration.

use gobuilder_core::BuildDefaults;

/// Runner configuration.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Path or name of the `go` executable.
    pub toolchain: String,

    /// Values substituted for empty build parameters.
    pub defaults: BuildDefaults,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            toolchain: "go".to_string(),
            defaults: BuildDefaults::default(),
        }
    }
}
