//! Registration and naming of managed objects.
//!
//! - [`ObjectName`] / [`ObjectNameBuilder`] - `domain:key=value` names
//! - [`ManagementAgent`] - in-process registry that routes requests by name
//! - [`Registration`] - binds one object, its name and an agent
//! - [`tracing`] - subscriber setup for binaries

pub mod agent;
pub mod object_name;
pub mod tracing;

pub use agent::{AgentError, ManagementAgent, Registration};
pub use object_name::{ObjectName, ObjectNameBuilder, ObjectNameError};
pub use self::tracing::setup_tracing;
