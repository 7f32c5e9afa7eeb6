//! Core domain errors.

use thiserror::Error;

/// Core domain errors for gobuilder.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A target specification could not be parsed.
    #[error("Invalid target '{0}': expected <goos>/<goarch>[=<label>]")]
    InvalidTarget(String),
}
