//! # Managed Access
//!
//! The object-safe seam between a managed object and whoever drives it: the
//! [`ManagementAgent`](crate::lifecycle::ManagementAgent), the
//! [`ProxyAdapter`](crate::clients::ProxyAdapter), or a test.
//!
//! [`Dispatcher<T>`](super::Dispatcher) is the production implementation and
//! [`MockAccess`](super::mock::MockAccess) the scripted one. Callers only ever
//! hold an `Arc<dyn ManagedAccess>`, so they never learn the concrete type.

use super::directory::DirectoryInfo;
use super::error::DispatchError;
use super::value::Value;

/// Result of one entry of a bulk read or write.
#[derive(Debug)]
pub struct AttributeOutcome {
    pub name: String,
    /// The value read, or for a write the value that was written.
    pub result: Result<Value, DispatchError>,
}

impl AttributeOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Read, write and invoke by name against one managed object.
pub trait ManagedAccess: Send + Sync {
    /// The Directory listing of the object.
    fn info(&self) -> &DirectoryInfo;

    fn read_attribute(&self, name: &str) -> Result<Value, DispatchError>;

    fn write_attribute(&self, name: &str, value: Value) -> Result<(), DispatchError>;

    fn invoke_operation(&self, name: &str, args: Vec<Value>) -> Result<Value, DispatchError>;

    /// Reads every name in order. A failed entry does not stop the rest.
    fn read_attributes(&self, names: &[&str]) -> Vec<AttributeOutcome> {
        names
            .iter()
            .map(|name| AttributeOutcome {
                name: name.to_string(),
                result: self.read_attribute(name),
            })
            .collect()
    }

    /// Writes every entry in order. A failed entry does not stop the rest.
    fn write_attributes(&self, entries: Vec<(String, Value)>) -> Vec<AttributeOutcome> {
        entries
            .into_iter()
            .map(|(name, value)| {
                let result = self.write_attribute(&name, value.clone()).map(|()| value);
                AttributeOutcome { name, result }
            })
            .collect()
    }
}
