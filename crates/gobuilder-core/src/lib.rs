//! gobuilder Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Subprocess execution
//! - Filesystem access
//! - Runtime specifics
//!
//! Everything here describes *what* a cross-platform build is: the targets,
//! the resolved request, per-target outcomes and the aggregated summary.

pub mod error;
pub mod ids;
pub mod naming;
pub mod outcome;
pub mod request;
pub mod summary;
pub mod target;

// Re-export commonly used types
pub use error::CoreError;
pub use ids::BuildId;
pub use naming::{output_file_name, output_path};
pub use outcome::{OutcomeStatus, TaskOutcome};
pub use request::{BuildDefaults, BuildParams, BuildRequest};
pub use summary::BuildSummary;
pub use target::{default_targets, supported_targets, BuildTarget};
