//! # Metadata Markers
//!
//! The declarable facts that can be attached to a member of a managed type.
//! A marker never changes runtime behavior by itself; it only tells the
//! [`resolver`](super::resolver) and the [`directory`](super::directory) builder
//! what is exposed, how, and with what description.
//!
//! | Marker | Applies to | Carries |
//! |--------|------------|---------|
//! | [`AttributeMarker`] | field, accessor or mutator | description, [`Access`], descriptor fields |
//! | [`OperationMarker`] | method | description, [`Impact`], descriptor fields |
//! | [`ParameterMarker`] | one operation parameter | name, description |
//! | [`ContainerMarker`] | the exposed type | description, object name, automatic discovery |
//!
//! At most one [`AttributeMarker`] may apply to the field/accessor/mutator set that
//! forms one logical attribute. Breaking that rule is a build-time error.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Access level of a logical attribute.
///
/// Defaults to [`Access::Read`] regardless of whether a mutator exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Access {
    #[default]
    Read,
    Write,
    ReadWrite,
}

impl Access {
    pub fn can_read(self) -> bool {
        matches!(self, Access::Read | Access::ReadWrite)
    }

    pub fn can_write(self) -> bool {
        matches!(self, Access::Write | Access::ReadWrite)
    }

    /// Access level implied by the handles that are actually present.
    pub(crate) fn from_handles(readable: bool, writable: bool) -> Option<Self> {
        match (readable, writable) {
            (true, true) => Some(Access::ReadWrite),
            (true, false) => Some(Access::Read),
            (false, true) => Some(Access::Write),
            (false, false) => None,
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Read => write!(f, "READ"),
            Access::Write => write!(f, "WRITE"),
            Access::ReadWrite => write!(f, "READ_WRITE"),
        }
    }
}

/// Impact classification of an operation, as presented to the management agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Impact {
    /// Read-like, does not change state.
    Info,
    /// Changes state, returns nothing useful.
    Action,
    /// Changes state and returns information.
    ActionInfo,
    #[default]
    Unknown,
}

/// Kind of metric an attribute or operation represents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricType {
    #[default]
    Unknown,
    Counter,
    Gauge,
}

/// Optional descriptor fields shared by attribute and operation markers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    pub units: Option<String>,
    pub metric: MetricType,
}

/// Marks a field, accessor or mutator as part of an exposed attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMarker {
    pub description: String,
    pub access: Access,
    pub descriptor: Descriptor,
}

impl AttributeMarker {
    /// A read-only attribute marker.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn read_write(description: impl Into<String>) -> Self {
        Self::new(description).access(Access::ReadWrite)
    }

    pub fn write_only(description: impl Into<String>) -> Self {
        Self::new(description).access(Access::Write)
    }

    pub fn access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    pub fn units(mut self, units: impl Into<String>) -> Self {
        self.descriptor.units = Some(units.into());
        self
    }

    pub fn metric(mut self, metric: MetricType) -> Self {
        self.descriptor.metric = metric;
        self
    }
}

/// Marks a method as an exposed operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationMarker {
    pub description: String,
    pub impact: Impact,
    pub descriptor: Descriptor,
}

impl OperationMarker {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn impact(mut self, impact: Impact) -> Self {
        self.impact = impact;
        self
    }

    pub fn units(mut self, units: impl Into<String>) -> Self {
        self.descriptor.units = Some(units.into());
        self
    }

    pub fn metric(mut self, metric: MetricType) -> Self {
        self.descriptor.metric = metric;
        self
    }
}

/// Names and describes one positional parameter of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterMarker {
    pub name: String,
    pub description: String,
}

impl ParameterMarker {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Which members are exposed without an explicit marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Automatic {
    pub attributes: bool,
    pub operations: bool,
}

/// Declares that a type is eligible to have a Directory built for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerMarker {
    pub description: String,
    /// Default name used when the object is registered with an agent.
    pub object_name: Option<String>,
    pub automatic: Automatic,
}

impl ContainerMarker {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn object_name(mut self, object_name: impl Into<String>) -> Self {
        self.object_name = Some(object_name.into());
        self
    }

    pub fn automatic_attributes(mut self) -> Self {
        self.automatic.attributes = true;
        self
    }

    pub fn automatic_operations(mut self) -> Self {
        self.automatic.operations = true;
        self
    }
}
