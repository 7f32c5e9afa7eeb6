//! Go toolchain invocation.
//!
//! [`Compiler`] is the seam between dispatch and the actual toolchain so the
//! dispatcher can be exercised without Go installed. [`GoToolchain`] is the
//! real implementation: one `go build` subprocess per target.

use std::io::{self, Read};
use std::path::Path;
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use gobuilder_core::BuildTarget;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::CompileError;

/// Something that can turn a source file into an executable for a target.
#[async_trait]
pub trait Compiler: Send + Sync {
    /// Check that the toolchain can be run at all.
    async fn probe(&self) -> Result<(), CompileError>;

    /// Build `source` for `target`, writing the executable to `output`.
    ///
    /// Must return [`CompileError::Cancelled`] promptly once `cancel` fires.
    async fn compile(
        &self,
        target: &BuildTarget,
        source: &Path,
        output: &Path,
        cancel: &CancellationToken,
    ) -> Result<(), CompileError>;
}

/// Compiles with the Go toolchain via `go build`.
#[derive(Debug, Clone)]
pub struct GoToolchain {
    /// Path to the go executable.
    go_path: String,

    /// Additional environment variables.
    env_vars: Vec<(String, String)>,
}

impl GoToolchain {
    /// Create a toolchain with the given `go` path.
    ///
    /// The path can be just "go" to use PATH lookup, or a full path.
    pub fn new(go_path: impl Into<String>) -> Self {
        Self {
            go_path: go_path.into(),
            env_vars: Vec::new(),
        }
    }

    /// Add an environment variable applied to every build.
    ///
    /// Target selectors (`GOOS`, `GOARCH`, `CGO_ENABLED`) are applied after
    /// these and always win.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    pub fn go_path(&self) -> &str {
        &self.go_path
    }

    /// Environment overrides selecting `target`, layered on the inherited
    /// process environment.
    fn target_env(target: &BuildTarget) -> [(&'static str, &str); 3] {
        [
            ("GOOS", target.goos.as_str()),
            ("GOARCH", target.goarch.as_str()),
            ("CGO_ENABLED", "0"),
        ]
    }

    fn build_command(&self, target: &BuildTarget, source: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.go_path);
        cmd.arg("build").arg("-o").arg(output).arg(source);

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }
        for (key, value) in Self::target_env(target) {
            cmd.env(key, value);
        }

        cmd.stdin(Stdio::null()).kill_on_drop(true);
        cmd
    }
}

impl Default for GoToolchain {
    fn default() -> Self {
        Self::new("go")
    }
}

#[async_trait]
impl Compiler for GoToolchain {
    async fn probe(&self) -> Result<(), CompileError> {
        let output = Command::new(&self.go_path)
            .arg("version")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| CompileError::Spawn {
                toolchain: self.go_path.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(CompileError::Failed {
                status: describe_status(output.status),
                output: captured_text(&output.stdout, &output.stderr),
            });
        }

        debug!(
            version = %String::from_utf8_lossy(&output.stdout).trim(),
            "Go toolchain available"
        );
        Ok(())
    }

    async fn compile(
        &self,
        target: &BuildTarget,
        source: &Path,
        output: &Path,
        cancel: &CancellationToken,
    ) -> Result<(), CompileError> {
        // stdout and stderr share one pipe so the captured text keeps the
        // toolchain's own interleaving.
        let (mut reader, writer) = io::pipe()?;
        let mut child = {
            let mut cmd = self.build_command(target, source, output);
            cmd.stdout(writer.try_clone()?).stderr(writer);
            debug!("Full command: {:?}", cmd);

            // `cmd` holds our copies of the write end; they close with it.
            cmd.spawn().map_err(|source| CompileError::Spawn {
                toolchain: self.go_path.clone(),
                source,
            })?
        };

        let collector = tokio::task::spawn_blocking(move || {
            let mut captured = Vec::new();
            reader.read_to_end(&mut captured).map(|_| captured)
        });

        // Dropping the child on cancellation kills it (kill_on_drop).
        let status = tokio::select! {
            status = child.wait() => status?,
            _ = cancel.cancelled() => {
                info!(goos = %target.goos, goarch = %target.goarch, "Killing cancelled go build");
                return Err(CompileError::Cancelled);
            }
        };
        let captured = collector.await.map_err(io::Error::other)??;

        if !status.success() {
            let status = describe_status(status);
            warn!(
                goos = %target.goos,
                goarch = %target.goarch,
                status = %status,
                "go build failed"
            );
            return Err(CompileError::Failed {
                status,
                output: String::from_utf8_lossy(&captured).into_owned(),
            });
        }

        Ok(())
    }
}

fn describe_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit status {}", code),
        None => status.to_string(),
    }
}

fn captured_text(stdout: &[u8], stderr: &[u8]) -> String {
    let mut text = String::from_utf8_lossy(stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(stderr));
    text
}
