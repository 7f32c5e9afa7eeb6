//! The `build_all` entry point: preconditions, dispatch, aggregation.

use std::io;
use std::path::Path;
use std::sync::Arc;

use gobuilder_core::{BuildDefaults, BuildId, BuildParams, BuildRequest, BuildSummary};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::RunnerConfig;
use crate::dispatcher::{DispatchPlan, Dispatcher};
use crate::error::BuildError;
use crate::invoker::{Compiler, GoToolchain};

/// Build `request.source_file` for every requested target.
///
/// Precondition failures (missing source, unreachable toolchain, output
/// directory that cannot be created) are returned before anything is
/// compiled. After that every target's result, failed or not, ends up in the
/// returned summary.
pub async fn build_all(
    compiler: Arc<dyn Compiler>,
    request: BuildRequest,
    cancel: CancellationToken,
) -> Result<BuildSummary, BuildError> {
    let build_id = BuildId::generate();

    check_source(&request.source_file).await?;

    compiler.probe().await.map_err(|e| {
        error!(build_id = %build_id, error = %e, "Toolchain unavailable");
        BuildError::ToolchainUnavailable(e)
    })?;

    tokio::fs::create_dir_all(&request.output_dir)
        .await
        .map_err(|source| BuildError::OutputDir {
            path: request.output_dir.clone(),
            source,
        })?;

    info!(
        build_id = %build_id,
        source = %request.source_file.display(),
        app = %request.app_name,
        output_dir = %request.output_dir.display(),
        jobs = request.jobs.get(),
        "Starting cross-platform build"
    );

    let dispatcher = Dispatcher::new(compiler, request.jobs);
    let plan = DispatchPlan {
        source: request.source_file,
        output_dir: request.output_dir.clone(),
        app_name: request.app_name,
        targets: request.targets,
    };
    let outcomes = dispatcher.dispatch(plan, cancel).await?;

    let summary = BuildSummary::aggregate(build_id, outcomes, request.output_dir);
    info!(
        build_id = %summary.build_id,
        success = summary.success,
        built = summary.built_targets.len(),
        failed = summary.failed_targets.len(),
        "Build finished"
    );
    Ok(summary)
}

/// Only a definite "not found" counts as missing; any other stat error is
/// reported as such instead of being taken for an existing file.
async fn check_source(path: &Path) -> Result<(), BuildError> {
    match tokio::fs::metadata(path).await {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(BuildError::SourceNotFound(path.to_path_buf()))
        }
        Err(source) => Err(BuildError::SourceInaccessible {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Applies defaults to raw parameters and runs [`build_all`].
#[derive(Clone)]
pub struct Builder {
    compiler: Arc<dyn Compiler>,
    defaults: BuildDefaults,
}

impl Builder {
    pub fn new(compiler: Arc<dyn Compiler>, defaults: BuildDefaults) -> Self {
        Self { compiler, defaults }
    }

    /// A builder driving the real Go toolchain.
    pub fn from_config(config: &RunnerConfig) -> Self {
        Self::new(
            Arc::new(GoToolchain::new(config.toolchain.clone())),
            config.defaults.clone(),
        )
    }

    pub fn defaults(&self) -> &BuildDefaults {
        &self.defaults
    }

    /// Resolve `params` against the defaults.
    pub fn resolve(&self, params: BuildParams) -> BuildRequest {
        BuildRequest::resolve(params, &self.defaults)
    }

    pub async fn build(
        &self,
        params: BuildParams,
        cancel: CancellationToken,
    ) -> Result<BuildSummary, BuildError> {
        build_all(self.compiler.clone(), self.resolve(params), cancel).await
    }

    /// Build Linux x64 and Windows x64 with two parallel jobs.
    pub async fn quick_build(
        &self,
        source_file: impl Into<String>,
        app_name: impl Into<String>,
        output_dir: impl Into<String>,
        cancel: CancellationToken,
    ) -> Result<BuildSummary, BuildError> {
        self.build(BuildParams::quick(source_file, app_name, output_dir), cancel)
            .await
    }
}
