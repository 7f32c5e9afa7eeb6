//! Bounded fan-out of one build task per target.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use gobuilder_core::{output_path, BuildTarget, TaskOutcome};
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info, warn};

use crate::error::{CompileError, DispatchError};
use crate::invoker::Compiler;

/// Everything the dispatcher needs to build a set of targets.
#[derive(Debug, Clone)]
pub struct DispatchPlan {
    pub source: PathBuf,
    pub output_dir: PathBuf,
    pub app_name: String,
    pub targets: Vec<BuildTarget>,
}

/// Runs one task per target with at most `concurrency` compiling at once.
#[derive(Clone)]
pub struct Dispatcher {
    compiler: Arc<dyn Compiler>,
    concurrency: NonZeroUsize,
}

impl Dispatcher {
    pub fn new(compiler: Arc<dyn Compiler>, concurrency: NonZeroUsize) -> Self {
        Self {
            compiler,
            concurrency,
        }
    }

    pub fn concurrency(&self) -> NonZeroUsize {
        self.concurrency
    }

    /// Spawn a task per target and return the stream of their outcomes.
    ///
    /// Outcomes arrive in completion order. The stream yields exactly one
    /// outcome per target and then `None` once every task has finished.
    /// Dropping the stream cancels every build that has not finished yet.
    /// Must be called from within a tokio runtime.
    pub fn start(
        &self,
        plan: DispatchPlan,
        cancel: CancellationToken,
    ) -> Result<OutcomeStream, DispatchError> {
        if plan.targets.is_empty() {
            return Err(DispatchError::NoTargets);
        }

        info!(
            targets = plan.targets.len(),
            concurrency = self.concurrency.get(),
            source = %plan.source.display(),
            "Dispatching builds"
        );

        let cancel = cancel.child_token();
        let slots = Arc::new(Semaphore::new(self.concurrency.get()));
        let source = Arc::new(plan.source);
        let (tx, rx) = mpsc::unbounded_channel();

        for target in plan.targets {
            let unit = BuildUnit {
                output_path: output_path(&plan.output_dir, &plan.app_name, &target),
                target,
                source: source.clone(),
                compiler: self.compiler.clone(),
            };
            let slots = slots.clone();
            let cancel = cancel.clone();
            let tx = tx.clone();

            tokio::spawn(async move {
                let outcome = unit.run(slots, cancel).await;
                if tx.send(outcome).is_err() {
                    debug!("Outcome stream dropped before build finished");
                }
            });
        }

        // The channel closes once the last unit drops its sender.
        Ok(OutcomeStream {
            rx,
            _cancel_on_drop: cancel.drop_guard(),
        })
    }

    /// Build every target and collect the outcomes in completion order.
    pub async fn dispatch(
        &self,
        plan: DispatchPlan,
        cancel: CancellationToken,
    ) -> Result<Vec<TaskOutcome>, DispatchError> {
        let expected = plan.targets.len();
        let mut stream = self.start(plan, cancel)?;

        let mut outcomes = Vec::with_capacity(expected);
        while let Some(outcome) = stream.recv().await {
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }
}

/// Outcomes of a running dispatch, in completion order.
pub struct OutcomeStream {
    rx: mpsc::UnboundedReceiver<TaskOutcome>,
    _cancel_on_drop: DropGuard,
}

impl OutcomeStream {
    /// Next finished target, or `None` once all of them have reported.
    pub async fn recv(&mut self) -> Option<TaskOutcome> {
        self.rx.recv().await
    }
}

/// One target's share of a dispatch.
struct BuildUnit {
    target: BuildTarget,
    output_path: PathBuf,
    source: Arc<PathBuf>,
    compiler: Arc<dyn Compiler>,
}

impl BuildUnit {
    async fn run(self, slots: Arc<Semaphore>, cancel: CancellationToken) -> TaskOutcome {
        // Held until the compile step below is over, whatever its result.
        let _permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(platform = %self.target.name, "Cancelled while waiting for a job slot");
                return TaskOutcome::cancelled(
                    self.target,
                    self.output_path,
                    CompileError::Cancelled.to_string(),
                    0,
                );
            }
            permit = slots.acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(e) => {
                    return TaskOutcome::failed(self.target, self.output_path, e.to_string(), 0);
                }
            },
        };

        let BuildUnit {
            target,
            output_path,
            source,
            compiler,
        } = self;

        info!(
            platform = %target.name,
            goos = %target.goos,
            goarch = %target.goarch,
            output = %output_path.display(),
            "Building target"
        );
        let started = Instant::now();

        // A panicking compiler must still produce an outcome for this target.
        let handle = {
            let target = target.clone();
            let output_path = output_path.clone();
            tokio::spawn(async move {
                compiler
                    .compile(&target, &source, &output_path, &cancel)
                    .await
            })
        };
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(CompileError::Panicked(e.to_string())),
        };

        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(()) => {
                info!(platform = %target.name, duration_ms, "Target built");
                TaskOutcome::built(target, output_path, duration_ms)
            }
            Err(CompileError::Cancelled) => {
                info!(platform = %target.name, "Target build cancelled");
                TaskOutcome::cancelled(
                    target,
                    output_path,
                    CompileError::Cancelled.to_string(),
                    duration_ms,
                )
            }
            Err(e) => {
                warn!(platform = %target.name, error = %e, "Target build failed");
                TaskOutcome::failed(target, output_path, e.to_string(), duration_ms)
            }
        }
    }
}
