//! gobuilder runner
//!
//! Compiles one Go program for many platform/architecture targets at once.
//! Each target is built by its own task; a semaphore bounds how many
//! toolchain processes run at the same time, and every target yields exactly
//! one [`TaskOutcome`](gobuilder_core::TaskOutcome) whatever happens to it.
//!
//! # Example
//!
//! ```rust,no_run
//! use gobuilder_core::BuildParams;
//! use gobuilder_runner::{Builder, RunnerConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! async fn run() -> Result<(), Box<dyn std::error::Error>> {
//!     let builder = Builder::from_config(&RunnerConfig::default());
//!     let summary = builder
//!         .build(BuildParams::default(), CancellationToken::new())
//!         .await?;
//!
//!     println!("success: {}", summary.success);
//!     Ok(())
//! }
//! ```

mod build;
mod config;
mod dispatcher;
mod error;
mod invoker;

#[cfg(test)]
mod testing;

pub use build::{build_all, Builder};
pub use config::RunnerConfig;
pub use dispatcher::{DispatchPlan, Dispatcher, OutcomeStream};
pub use error::{BuildError, CompileError, DispatchError};
pub use invoker::{Compiler, GoToolchain};
