//! Error types for the managed counter.

use crate::framework::{BuildError, DispatchError};
use thiserror::Error;

/// Errors that can occur during counter operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CounterError {
    /// Adding `amount` to `value` would overflow.
    #[error("Counter overflow: {value} + {amount}")]
    Overflow { value: i64, amount: i64 },

    /// A management request failed before or while reaching the counter.
    #[error("Counter management error: {0}")]
    ManagementError(String),
}

impl From<DispatchError> for CounterError {
    fn from(e: DispatchError) -> Self {
        CounterError::ManagementError(e.to_string())
    }
}

impl From<BuildError> for CounterError {
    fn from(e: BuildError) -> Self {
        CounterError::ManagementError(e.to_string())
    }
}
