//! # Framework Errors
//!
//! Two families of errors, matching the two phases of the system:
//!
//! - [`BuildError`] is raised while a Directory is built. It is always fatal to
//!   that build; there is no partial Directory.
//! - [`DispatchError`] is raised while serving a read, write or invoke request.
//!   It is always returned to the caller with the original cause attached.

use super::metadata::Access;
use super::resolver::Site;
use std::fmt;

/// A failure raised by the wrapped object itself.
pub type Fault = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A panic raised inside a wrapped accessor, mutator or operation, caught at
/// the dispatch boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("panicked: {0}")]
pub struct Panicked(pub String);

impl Panicked {
    pub(crate) fn from_payload(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        Panicked(message)
    }
}

/// Errors raised while building a Directory.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("Ambiguous attribute marker on {type_name}.{property}: found on {}", join_sites(.sites))]
    AmbiguousMarker {
        type_name: String,
        property: String,
        sites: Vec<Site>,
    },
    #[error("Attribute {type_name}.{property} is declared {access} but has no accessor")]
    MissingAccessor {
        type_name: String,
        property: String,
        access: Access,
    },
    #[error("Attribute {type_name}.{property} is declared {access} but has no mutator")]
    MissingMutator {
        type_name: String,
        property: String,
        access: Access,
    },
    #[error("Duplicate operation {type_name}.{operation}: overloaded operations are not supported")]
    DuplicateOperation {
        type_name: String,
        operation: String,
    },
    /// An attribute marker on a method that is not the accessor or mutator of any property.
    #[error("Attribute marker on {type_name}.{method} does not mark an accessor or mutator")]
    StrayAttributeMarker { type_name: String, method: String },
    #[error("Type {type_name} is not exposed: no container marker")]
    NotExposedType { type_name: String },
}

fn join_sites(sites: &[Site]) -> String {
    sites
        .iter()
        .map(Site::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// The kind of Directory entry a request addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Readable,
    Writable,
    Operation,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberKind::Readable => write!(f, "Readable attribute"),
            MemberKind::Writable => write!(f, "Writable attribute"),
            MemberKind::Operation => write!(f, "Operation"),
        }
    }
}

/// Errors returned by dispatch requests.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The entry does not exist, or is not accessible at the requested access level.
    #[error("{kind} not found: {name}")]
    NotFound { kind: MemberKind, name: String },

    /// The supplied value does not fit the declared type. Nothing was invoked.
    #[error("Type mismatch for {member}: expected {expected}, found {found}")]
    TypeMismatch {
        member: String,
        expected: String,
        found: String,
    },

    /// The wrapped accessor, mutator or operation failed.
    #[error("Invocation of {member} failed: {source}")]
    InvocationFailure {
        member: String,
        #[source]
        source: Fault,
    },

    /// A proxied interface method could not be routed to the Directory.
    #[error("Unsupported member: {0}")]
    UnsupportedMember(String),
}

impl DispatchError {
    pub(crate) fn not_found(kind: MemberKind, name: &str) -> Self {
        DispatchError::NotFound {
            kind,
            name: name.to_string(),
        }
    }

    /// The original failure raised by the wrapped object, if any.
    pub fn fault(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            DispatchError::InvocationFailure { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DispatchError::NotFound { .. })
    }

    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, DispatchError::TypeMismatch { .. })
    }

    pub fn is_invocation_failure(&self) -> bool {
        matches!(self, DispatchError::InvocationFailure { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_invocation_failure_keeps_cause() {
        let err = DispatchError::InvocationFailure {
            member: "explode".into(),
            source: "boom".into(),
        };
        assert_eq!(err.source().map(|e| e.to_string()), Some("boom".into()));
        assert_eq!(err.fault().map(|e| e.to_string()), Some("boom".into()));
        assert_eq!(err.to_string(), "Invocation of explode failed: boom");
    }

    #[test]
    fn test_ambiguous_marker_lists_sites() {
        let err = BuildError::AmbiguousMarker {
            type_name: "Counter".into(),
            property: "value".into(),
            sites: vec![Site::Field, Site::Accessor],
        };
        assert_eq!(
            err.to_string(),
            "Ambiguous attribute marker on Counter.value: found on field, accessor"
        );
    }
}
