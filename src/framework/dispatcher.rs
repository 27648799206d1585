//! # Dynamic Dispatcher
//!
//! A [`Dispatcher`] pairs one live instance with the Directory of its type and
//! serves reads, writes and invocations by name.
//!
//! ## Failure Categories
//!
//! | Situation | Error |
//! |-----------|-------|
//! | name absent, or present without the needed handle | [`DispatchError::NotFound`] |
//! | argument count or argument type does not fit | [`DispatchError::TypeMismatch`] |
//! | the wrapped method returned an error or panicked | [`DispatchError::InvocationFailure`] |
//!
//! A type mismatch is detected while converting arguments, before the wrapped
//! method runs, so "your input shape was wrong" and "the object rejected a
//! well-shaped input" never look alike.
//!
//! ## Concurrency
//!
//! The Dispatcher holds nothing mutable. Calls from many threads run directly
//! against the wrapped instance; its own interior mutability decides what
//! concurrent writes mean.

use super::access::ManagedAccess;
use super::directory::{Directory, DirectoryInfo};
use super::error::{BuildError, DispatchError, MemberKind, Panicked};
use super::model::{CallError, Invoker, Managed};
use super::value::Value;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct Dispatcher<T> {
    directory: Arc<Directory<T>>,
    target: Arc<T>,
}

impl<T> Clone for Dispatcher<T> {
    fn clone(&self) -> Self {
        Self {
            directory: Arc::clone(&self.directory),
            target: Arc::clone(&self.target),
        }
    }
}

impl<T> std::fmt::Debug for Dispatcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("type_name", &self.directory.info().type_name)
            .finish_non_exhaustive()
    }
}

impl<T: Managed> Dispatcher<T> {
    /// Wraps `target` with the shared Directory of its type.
    pub fn for_instance(target: Arc<T>) -> Result<Self, BuildError> {
        Ok(Self::new(Directory::of()?, target))
    }
}

impl<T: Send + Sync + 'static> Dispatcher<T> {
    pub fn new(directory: Arc<Directory<T>>, target: Arc<T>) -> Self {
        Self { directory, target }
    }

    pub fn target(&self) -> &Arc<T> {
        &self.target
    }

    pub fn directory(&self) -> &Arc<Directory<T>> {
        &self.directory
    }

    fn type_name(&self) -> &str {
        &self.directory.info().type_name
    }

    fn call(&self, member: &str, invoker: &Invoker<T>, args: Vec<Value>) -> Result<Value, DispatchError> {
        let outcome = catch_unwind(AssertUnwindSafe(|| invoker(self.target.as_ref(), args)));
        let result = match outcome {
            Ok(result) => result.map_err(|e| call_error(member, e)),
            Err(payload) => Err(DispatchError::InvocationFailure {
                member: member.to_string(),
                source: Box::new(Panicked::from_payload(payload.as_ref())),
            }),
        };
        if let Err(e) = &result {
            warn!(type_name = self.type_name(), member, error = %e, "Dispatch failed");
        }
        result
    }
}

fn call_error(member: &str, error: CallError) -> DispatchError {
    match error {
        CallError::Arity { expected, supplied } => DispatchError::TypeMismatch {
            member: member.to_string(),
            expected: format!("{expected} argument(s)"),
            found: format!("{supplied} argument(s)"),
        },
        CallError::Mismatch {
            index,
            expected,
            found,
        } => DispatchError::TypeMismatch {
            member: format!("{member} argument {}", index + 1),
            expected: expected.to_string(),
            found: found.to_string(),
        },
        CallError::Fault(source) => DispatchError::InvocationFailure {
            member: member.to_string(),
            source,
        },
    }
}

impl<T: Send + Sync + 'static> ManagedAccess for Dispatcher<T> {
    fn info(&self) -> &DirectoryInfo {
        self.directory.info()
    }

    fn read_attribute(&self, name: &str) -> Result<Value, DispatchError> {
        debug!(type_name = self.type_name(), attribute = name, "Read");
        let accessor = self
            .directory
            .attribute(name)
            .and_then(|(_, handles)| handles.accessor.as_ref())
            .ok_or_else(|| DispatchError::not_found(MemberKind::Readable, name))?;
        self.call(name, accessor, Vec::new())
    }

    fn write_attribute(&self, name: &str, value: Value) -> Result<(), DispatchError> {
        debug!(type_name = self.type_name(), attribute = name, %value, "Write");
        let mutator = self
            .directory
            .attribute(name)
            .and_then(|(_, handles)| handles.mutator.as_ref())
            .ok_or_else(|| DispatchError::not_found(MemberKind::Writable, name))?;
        self.call(name, mutator, vec![value]).map(|_| ())
    }

    fn invoke_operation(&self, name: &str, args: Vec<Value>) -> Result<Value, DispatchError> {
        debug!(type_name = self.type_name(), operation = name, args = args.len(), "Invoke");
        let (_, invoker) = self
            .directory
            .operation(name)
            .ok_or_else(|| DispatchError::not_found(MemberKind::Operation, name))?;
        self.call(name, invoker, args)
    }
}
