//! Test doubles for the [`Compiler`] seam.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use gobuilder_core::BuildTarget;
use tokio_util::sync::CancellationToken;

use crate::error::CompileError;
use crate::invoker::Compiler;

/// What the stub does for a given GOOS.
#[derive(Debug, Clone)]
pub enum Behavior {
    Succeed,
    Fail(String),
    Panic,
    /// Block until cancelled.
    Hang,
}

/// Scriptable compiler that records how it was driven.
pub struct StubCompiler {
    behaviors: HashMap<String, Behavior>,
    delays: HashMap<String, Duration>,
    default_delay: Duration,
    available: bool,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    compiled: Mutex<Vec<BuildTarget>>,
}

impl StubCompiler {
    pub fn new() -> Self {
        Self {
            behaviors: HashMap::new(),
            delays: HashMap::new(),
            default_delay: Duration::ZERO,
            available: true,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            compiled: Mutex::new(Vec::new()),
        }
    }

    pub fn with_behavior(mut self, goos: &str, behavior: Behavior) -> Self {
        self.behaviors.insert(goos.to_string(), behavior);
        self
    }

    pub fn with_delay(mut self, goos: &str, delay: Duration) -> Self {
        self.delays.insert(goos.to_string(), delay);
        self
    }

    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn compiled(&self) -> Vec<BuildTarget> {
        self.compiled.lock().unwrap().clone()
    }
}

/// Decrements the in-flight counter even when the compile future is dropped
/// or panics.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Compiler for StubCompiler {
    async fn probe(&self) -> Result<(), CompileError> {
        if self.available {
            Ok(())
        } else {
            Err(CompileError::Spawn {
                toolchain: "go".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            })
        }
    }

    async fn compile(
        &self,
        target: &BuildTarget,
        _source: &Path,
        _output: &Path,
        cancel: &CancellationToken,
    ) -> Result<(), CompileError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        let delay = self
            .delays
            .get(&target.goos)
            .copied()
            .unwrap_or(self.default_delay);
        let behavior = self
            .behaviors
            .get(&target.goos)
            .cloned()
            .unwrap_or(Behavior::Succeed);

        if let Behavior::Hang = behavior {
            cancel.cancelled().await;
            return Err(CompileError::Cancelled);
        }

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = cancel.cancelled() => return Err(CompileError::Cancelled),
        }

        self.compiled.lock().unwrap().push(target.clone());

        match behavior {
            Behavior::Succeed | Behavior::Hang => Ok(()),
            Behavior::Fail(status) => Err(CompileError::Failed {
                status,
                output: String::new(),
            }),
            Behavior::Panic => panic!("stub compiler panic for {}", target.goos),
        }
    }
}
