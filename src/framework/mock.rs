//! # Mock Access
//!
//! Utilities for testing typed clients and proxies without a real managed object.
//!
//! [`MockAccess`] implements [`ManagedAccess`] from a scripted queue of
//! expectations. Each request pops the next expectation; a request that does not
//! match it panics, and [`MockAccess::verify`] panics if expectations are left.

use super::access::ManagedAccess;
use super::directory::{Directory, DirectoryInfo};
use super::error::{BuildError, DispatchError};
use super::model::Managed;
use super::value::Value;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

enum Expectation {
    Read {
        name: String,
        response: Result<Value, DispatchError>,
    },
    Write {
        name: String,
        value: Option<Value>,
        response: Result<(), DispatchError>,
    },
    Invoke {
        name: String,
        response: Result<Value, DispatchError>,
    },
}

/// A request received by a [`MockAccess`], in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Read(String),
    Write(String, Value),
    Invoke(String, Vec<Value>),
}

/// A scripted [`ManagedAccess`] implementation.
///
/// # Example
/// ```ignore
/// let mock = MockAccess::new(info);
/// mock.expect_read("value").return_ok(Value::Int(10));
/// mock.expect_invoke("increment").return_ok(Value::Int(15));
///
/// let access = mock.access();
/// // Drive a client through `access`...
/// mock.verify(); // Ensures all expectations were met
/// ```
#[derive(Clone)]
pub struct MockAccess {
    info: Arc<DirectoryInfo>,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl MockAccess {
    /// Creates a mock with no expectations, listing `info`.
    pub fn new(info: DirectoryInfo) -> Self {
        Self {
            info: Arc::new(info),
            expectations: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Creates a mock listing the real Directory of `T`.
    pub fn for_managed<T: Managed>() -> Result<Self, BuildError> {
        Ok(Self::new(Directory::<T>::of()?.info().clone()))
    }

    /// The mock as a shareable trait object.
    pub fn access(&self) -> Arc<dyn ManagedAccess> {
        Arc::new(self.clone())
    }

    /// Expects a read of `name`.
    pub fn expect_read(&self, name: &str) -> ReadExpectationBuilder {
        ReadExpectationBuilder {
            name: name.to_string(),
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a write of `name`, with any value.
    pub fn expect_write(&self, name: &str) -> WriteExpectationBuilder {
        WriteExpectationBuilder {
            name: name.to_string(),
            value: None,
            expectations: self.expectations.clone(),
        }
    }

    /// Expects an invocation of `name`.
    pub fn expect_invoke(&self, name: &str) -> InvokeExpectationBuilder {
        InvokeExpectationBuilder {
            name: name.to_string(),
            expectations: self.expectations.clone(),
        }
    }

    /// Requests received so far.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }

    fn next(&self, call: Call) -> Expectation {
        self.calls.lock().push(call.clone());
        match self.expectations.lock().pop_front() {
            Some(expectation) => expectation,
            None => panic!("Unexpected request: {call:?}"),
        }
    }
}

impl ManagedAccess for MockAccess {
    fn info(&self) -> &DirectoryInfo {
        &self.info
    }

    fn read_attribute(&self, name: &str) -> Result<Value, DispatchError> {
        match self.next(Call::Read(name.to_string())) {
            Expectation::Read { name: expected, response } if expected == name => response,
            _ => panic!("Unexpected read of {name} or expectation mismatch"),
        }
    }

    fn write_attribute(&self, name: &str, value: Value) -> Result<(), DispatchError> {
        match self.next(Call::Write(name.to_string(), value.clone())) {
            Expectation::Write {
                name: expected,
                value: wanted,
                response,
            } if expected == name => {
                if let Some(wanted) = wanted {
                    assert_eq!(wanted, value, "Unexpected value written to {name}");
                }
                response
            }
            _ => panic!("Unexpected write of {name} or expectation mismatch"),
        }
    }

    fn invoke_operation(&self, name: &str, args: Vec<Value>) -> Result<Value, DispatchError> {
        match self.next(Call::Invoke(name.to_string(), args)) {
            Expectation::Invoke { name: expected, response } if expected == name => response,
            _ => panic!("Unexpected invocation of {name} or expectation mismatch"),
        }
    }
}

/// Builder for read expectations.
pub struct ReadExpectationBuilder {
    name: String,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl ReadExpectationBuilder {
    /// Sets the expectation to return a value.
    pub fn return_ok(self, value: Value) {
        self.expectations.lock().push_back(Expectation::Read {
            name: self.name,
            response: Ok(value),
        });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: DispatchError) {
        self.expectations.lock().push_back(Expectation::Read {
            name: self.name,
            response: Err(error),
        });
    }
}

/// Builder for write expectations.
pub struct WriteExpectationBuilder {
    name: String,
    value: Option<Value>,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl WriteExpectationBuilder {
    /// Requires the written value to equal `value`.
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    /// Sets the expectation to succeed.
    pub fn return_ok(self) {
        self.expectations.lock().push_back(Expectation::Write {
            name: self.name,
            value: self.value,
            response: Ok(()),
        });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: DispatchError) {
        self.expectations.lock().push_back(Expectation::Write {
            name: self.name,
            value: self.value,
            response: Err(error),
        });
    }
}

/// Builder for invoke expectations.
pub struct InvokeExpectationBuilder {
    name: String,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl InvokeExpectationBuilder {
    /// Sets the expectation to return a value.
    pub fn return_ok(self, value: Value) {
        self.expectations.lock().push_back(Expectation::Invoke {
            name: self.name,
            response: Ok(value),
        });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: DispatchError) {
        self.expectations.lock().push_back(Expectation::Invoke {
            name: self.name,
            response: Err(error),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::error::MemberKind;

    fn empty_info() -> DirectoryInfo {
        DirectoryInfo {
            type_name: "Scripted".into(),
            description: "scripted".into(),
            object_name: None,
            attributes: vec![],
            operations: vec![],
        }
    }

    #[test]
    fn test_mock_with_expectations() {
        let mock = MockAccess::new(empty_info());
        mock.expect_write("value").with_value(Value::Int(10)).return_ok();
        mock.expect_read("value").return_ok(Value::Int(10));
        mock.expect_invoke("reset").return_err(DispatchError::NotFound {
            kind: MemberKind::Operation,
            name: "reset".into(),
        });

        let access = mock.access();
        access.write_attribute("value", Value::Int(10)).unwrap();
        assert_eq!(access.read_attribute("value").unwrap(), Value::Int(10));
        assert!(access.invoke_operation("reset", vec![]).unwrap_err().is_not_found());

        mock.verify();
        assert_eq!(
            mock.calls(),
            vec![
                Call::Write("value".into(), Value::Int(10)),
                Call::Read("value".into()),
                Call::Invoke("reset".into(), vec![]),
            ]
        );
    }

    #[test]
    #[should_panic(expected = "Not all expectations were met")]
    fn test_verify_reports_leftovers() {
        let mock = MockAccess::new(empty_info());
        mock.expect_read("value").return_ok(Value::Int(1));
        mock.verify();
    }

    #[test]
    #[should_panic(expected = "Unexpected read")]
    fn test_mismatched_request_panics() {
        let mock = MockAccess::new(empty_info());
        mock.expect_invoke("reset").return_ok(Value::Unit);
        let _ = mock.read_attribute("value");
    }
}
