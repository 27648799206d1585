//! Error types for the managed service.

use crate::framework::{BuildError, DispatchError};
use crate::model::ServiceState;
use thiserror::Error;

/// Errors that can occur while driving a service through its lifecycle.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ServiceError {
    /// `action` is not allowed from `state`.
    #[error("Cannot {action} a service in state {state}")]
    IllegalTransition {
        action: &'static str,
        state: ServiceState,
    },

    /// A management request failed before or while reaching the service.
    #[error("Service management error: {0}")]
    ManagementError(String),
}

impl From<DispatchError> for ServiceError {
    fn from(e: DispatchError) -> Self {
        ServiceError::ManagementError(e.to_string())
    }
}

impl From<BuildError> for ServiceError {
    fn from(e: BuildError) -> Self {
        ServiceError::ManagementError(e.to_string())
    }
}
