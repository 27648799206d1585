//! Metadata-driven management framework.
//!
//! This module provides the building blocks for exposing live objects to a
//! management agent by name: declare what is exposed, build a Directory once per
//! type, then dispatch reads, writes and invocations against any instance.
//!
//! # Main Components
//!
//! - [`metadata`] - Markers: attribute, operation, parameter and container
//! - [`TypeModel`] / [`Managed`] - Declarative type tables that replace member enumeration
//! - [`resolver`] - Member Resolver: accessor/mutator pairing, ancestor fields, marker lookup
//! - [`Directory`] - Registry Builder output: validated, name-sorted and cached per type
//! - [`Dispatcher`] - Dynamic Dispatcher for one live instance
//! - [`ManagedAccess`] - Object-safe seam used by proxies and the agent
//!
//! # Testing
//!
//! See [`mock`] module for a scripted [`ManagedAccess`] used to test clients.

pub mod access;
pub mod directory;
pub mod dispatcher;
pub mod error;
pub mod metadata;
pub mod mock;
pub mod model;
pub mod resolver;
pub mod value;

pub use access::{AttributeOutcome, ManagedAccess};
pub use directory::{AttributeInfo, Directory, DirectoryInfo, OperationInfo, ParameterInfo};
pub use dispatcher::Dispatcher;
pub use error::{BuildError, DispatchError, Fault, MemberKind, Panicked};
pub use metadata::{
    Access, AttributeMarker, ContainerMarker, Descriptor, Impact, MetricType, OperationMarker,
    ParameterMarker,
};
pub use model::{Field, Managed, Method, Param, TypeModel};
pub use value::{FromValue, IntoValue, Typed, Value, ValueType};
