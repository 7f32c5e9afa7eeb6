//! Error types for the runner.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while compiling a single target.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The toolchain executable could not be started.
    #[error("failed to start toolchain '{toolchain}': {source}")]
    Spawn {
        toolchain: String,
        #[source]
        source: io::Error,
    },

    /// The toolchain ran and exited unsuccessfully.
    #[error("{}", render_failure(.status, .output))]
    Failed {
        /// Exit description, e.g. "exit status 2".
        status: String,
        /// Captured stdout followed by stderr, untruncated.
        output: String,
    },

    /// The build was cancelled while waiting or running.
    #[error("build cancelled")]
    Cancelled,

    /// The task compiling this target panicked.
    #[error("build task crashed: {0}")]
    Panicked(String),

    /// I/O error while waiting on the toolchain.
    #[error("toolchain I/O error: {0}")]
    Io(#[from] io::Error),
}

fn render_failure(status: &str, output: &str) -> String {
    if output.is_empty() {
        status.to_string()
    } else {
        format!("{}\nOutput: {}", status, output)
    }
}

/// Errors rejecting a dispatch before any task starts.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no targets to dispatch")]
    NoTargets,
}

/// Precondition failures that abort a whole build request.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The source file does not exist.
    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// The source file exists but could not be inspected.
    #[error("Cannot access source file {}: {source}", .path.display())]
    SourceInaccessible {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The Go toolchain is not installed or not on PATH.
    #[error("Go toolchain is not available: {0}")]
    ToolchainUnavailable(#[source] CompileError),

    /// The output directory could not be created.
    #[error("Failed to create output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_display_keeps_output_verbatim() {
        let output = "# command-line-arguments\n./main.go:3:2: undefined: foo\n".to_string();
        let err = CompileError::Failed {
            status: "exit status 1".to_string(),
            output: output.clone(),
        };
        assert_eq!(err.to_string(), format!("exit status 1\nOutput: {}", output));
    }

    #[test]
    fn test_failed_display_without_output() {
        let err = CompileError::Failed {
            status: "exit status 1".to_string(),
            output: String::new(),
        };
        assert_eq!(err.to_string(), "exit status 1");
    }

    #[test]
    fn test_source_not_found_display() {
        let err = BuildError::SourceNotFound(PathBuf::from("./main.go"));
        assert_eq!(err.to_string(), "Source file not found: ./main.go");
    }
}
