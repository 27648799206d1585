//! Error types for the processing monitor.

use crate::framework::{BuildError, DispatchError};
use thiserror::Error;

/// Errors that can occur while reading or resetting processing statistics.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProcessingError {
    /// A management request failed before or while reaching the monitor.
    #[error("Processing management error: {0}")]
    ManagementError(String),
}

impl From<DispatchError> for ProcessingError {
    fn from(e: DispatchError) -> Self {
        ProcessingError::ManagementError(e.to_string())
    }
}

impl From<BuildError> for ProcessingError {
    fn from(e: BuildError) -> Self {
        ProcessingError::ManagementError(e.to_string())
    }
}
