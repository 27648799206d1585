//! # Registry Builder & Directory
//!
//! [`Directory::build`] consumes the [`resolver`](super::resolver) output, validates
//! it and produces an immutable Directory:
//!
//! - the type must carry (or inherit) a [`ContainerMarker`];
//! - each exposed attribute has exactly one marker, and its access level is
//!   backed by the handles it needs;
//! - operation names are unique (no overloads);
//! - attributes and operations are sorted by name, so every listing is stable
//!   across restarts whatever the declaration order.
//!
//! The descriptive half of a Directory is a plain, serializable [`DirectoryInfo`].
//! The other half holds the accessor/mutator/operation handles used by the
//! [`Dispatcher`](super::Dispatcher).
//!
//! [`Directory::of`] builds once per managed type and shares the result between
//! all instances of that type.

use super::error::BuildError;
use super::metadata::{
    Access, AttributeMarker, ContainerMarker, Descriptor, Impact, OperationMarker,
};
use super::model::{Invoker, Managed, Method, TypeModel};
use super::resolver::{resolve, PropertyCandidate};
use super::value::ValueType;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

/// Description of one exposed attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeInfo {
    pub name: String,
    pub description: String,
    pub value_type: ValueType,
    pub access: Access,
    pub descriptor: Descriptor,
}

impl AttributeInfo {
    pub fn is_readable(&self) -> bool {
        self.access.can_read()
    }

    pub fn is_writable(&self) -> bool {
        self.access.can_write()
    }
}

/// Description of one operation parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterInfo {
    pub name: String,
    pub description: String,
    pub value_type: ValueType,
}

/// Description of one exposed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationInfo {
    pub name: String,
    pub description: String,
    pub impact: Impact,
    pub parameters: Vec<ParameterInfo>,
    pub returns: ValueType,
    pub descriptor: Descriptor,
}

impl OperationInfo {
    /// Positional parameter types.
    pub fn signature(&self) -> Vec<ValueType> {
        self.parameters.iter().map(|p| p.value_type).collect()
    }
}

/// The descriptive, transport-neutral half of a Directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryInfo {
    pub type_name: String,
    pub description: String,
    /// Default registration name declared on the container marker.
    pub object_name: Option<String>,
    pub attributes: Vec<AttributeInfo>,
    pub operations: Vec<OperationInfo>,
}

impl DirectoryInfo {
    pub fn attribute(&self, name: &str) -> Option<&AttributeInfo> {
        self.attributes
            .binary_search_by(|a| a.name.as_str().cmp(name))
            .ok()
            .map(|i| &self.attributes[i])
    }

    pub fn operation(&self, name: &str) -> Option<&OperationInfo> {
        self.operations
            .binary_search_by(|o| o.name.as_str().cmp(name))
            .ok()
            .map(|i| &self.operations[i])
    }

    pub fn attribute_names(&self) -> Vec<&str> {
        self.attributes.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn operation_names(&self) -> Vec<&str> {
        self.operations.iter().map(|o| o.name.as_str()).collect()
    }
}

/// Handles behind one attribute. A handle is present only when the declared
/// access level allows it.
pub(crate) struct AttributeHandles<T> {
    pub(crate) accessor: Option<Invoker<T>>,
    pub(crate) mutator: Option<Invoker<T>>,
}

/// The immutable, built artifact for one managed type.
pub struct Directory<T> {
    info: DirectoryInfo,
    /// Parallel to `info.attributes`.
    attributes: Vec<AttributeHandles<T>>,
    /// Parallel to `info.operations`.
    operations: Vec<Invoker<T>>,
}

impl<T> std::fmt::Debug for Directory<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Directory").field("info", &self.info).finish()
    }
}

impl<T> PartialEq for Directory<T> {
    fn eq(&self, other: &Self) -> bool {
        self.info == other.info
    }
}

impl<T> Directory<T> {
    pub fn info(&self) -> &DirectoryInfo {
        &self.info
    }

    pub(crate) fn attribute(&self, name: &str) -> Option<(&AttributeInfo, &AttributeHandles<T>)> {
        let i = self
            .info
            .attributes
            .binary_search_by(|a| a.name.as_str().cmp(name))
            .ok()?;
        Some((&self.info.attributes[i], &self.attributes[i]))
    }

    pub(crate) fn operation(&self, name: &str) -> Option<(&OperationInfo, &Invoker<T>)> {
        let i = self
            .info
            .operations
            .binary_search_by(|o| o.name.as_str().cmp(name))
            .ok()?;
        Some((&self.info.operations[i], &self.operations[i]))
    }
}

struct BuiltAttribute<T> {
    info: AttributeInfo,
    handles: AttributeHandles<T>,
}

fn build_attribute<T>(
    type_name: &str,
    container: &ContainerMarker,
    property: &PropertyCandidate<'_, T>,
) -> Result<Option<BuiltAttribute<T>>, BuildError> {
    let synthesized;
    let marker = match property.marker(type_name)? {
        Some(marker) => marker,
        None if container.automatic.attributes => {
            let Some(access) =
                Access::from_handles(property.accessor.is_some(), property.mutator.is_some())
            else {
                return Ok(None);
            };
            synthesized = AttributeMarker::new("").access(access);
            &synthesized
        }
        None => return Ok(None),
    };

    let access = marker.access;
    if access.can_read() && property.accessor.is_none() {
        return Err(BuildError::MissingAccessor {
            type_name: type_name.to_string(),
            property: property.name.clone(),
            access,
        });
    }
    if access.can_write() && property.mutator.is_none() {
        return Err(BuildError::MissingMutator {
            type_name: type_name.to_string(),
            property: property.name.clone(),
            access,
        });
    }

    let handles = AttributeHandles {
        accessor: property
            .accessor
            .filter(|_| access.can_read())
            .map(Method::invoker),
        mutator: property
            .mutator
            .filter(|_| access.can_write())
            .map(Method::invoker),
    };
    let info = AttributeInfo {
        name: property.name.clone(),
        description: marker.description.clone(),
        // Handles exist for the declared access, so the type is always known here.
        value_type: property.value_type().unwrap_or(ValueType::Unit),
        access,
        descriptor: marker.descriptor.clone(),
    };
    debug!(type_name, attribute = %info.name, %access, "Attribute resolved");
    Ok(Some(BuiltAttribute { info, handles }))
}

/// Parameter descriptors, defaulting to `p1..pn` with empty descriptions.
pub fn parameter_infos<T>(method: &Method<T>) -> Vec<ParameterInfo> {
    method
        .params()
        .iter()
        .enumerate()
        .map(|(i, param)| match &param.marker {
            Some(marker) => ParameterInfo {
                name: marker.name.clone(),
                description: marker.description.clone(),
                value_type: param.value_type,
            },
            None => ParameterInfo {
                name: format!("p{}", i + 1),
                description: String::new(),
                value_type: param.value_type,
            },
        })
        .collect()
}

fn operation_info<T>(method: &Method<T>, marker: &OperationMarker) -> OperationInfo {
    OperationInfo {
        name: method.name().to_string(),
        description: marker.description.clone(),
        impact: marker.impact,
        parameters: parameter_infos(method),
        returns: method.returns(),
        descriptor: marker.descriptor.clone(),
    }
}

impl<T: Send + Sync + 'static> Directory<T> {
    /// Builds a Directory from a declarative type table.
    pub fn build(model: &TypeModel<T>) -> Result<Self, BuildError> {
        let result = Self::build_inner(model);
        if let Err(e) = &result {
            warn!(type_name = model.type_name(), error = %e, "Directory build rejected");
        }
        result
    }

    fn build_inner(model: &TypeModel<T>) -> Result<Self, BuildError> {
        let resolved = resolve(model);
        let type_name = resolved.type_name;
        let container = resolved.container.ok_or_else(|| BuildError::NotExposedType {
            type_name: type_name.to_string(),
        })?;
        if let Some(method) = resolved.stray.first() {
            return Err(BuildError::StrayAttributeMarker {
                type_name: type_name.to_string(),
                method: method.name().to_string(),
            });
        }

        let mut attributes = Vec::new();
        for property in &resolved.properties {
            if let Some(built) = build_attribute(type_name, container, property)? {
                attributes.push(built);
            }
        }
        attributes.sort_by(|a, b| a.info.name.cmp(&b.info.name));

        let automatic = OperationMarker::default();
        let mut candidates: Vec<(&Method<T>, &OperationMarker)> = resolved
            .operations
            .iter()
            .filter_map(|m| m.operation_marker().map(|marker| (*m, marker)))
            .collect();
        if container.automatic.operations {
            candidates.extend(resolved.unclaimed.iter().map(|m| (*m, &automatic)));
        }

        let mut operations: BTreeMap<String, (OperationInfo, Invoker<T>)> = BTreeMap::new();
        for (method, marker) in candidates {
            if operations.contains_key(method.name()) {
                return Err(BuildError::DuplicateOperation {
                    type_name: type_name.to_string(),
                    operation: method.name().to_string(),
                });
            }
            debug!(type_name, operation = method.name(), "Operation resolved");
            operations.insert(
                method.name().to_string(),
                (operation_info(method, marker), method.invoker()),
            );
        }

        let (attribute_infos, attribute_handles): (Vec<_>, Vec<_>) =
            attributes.into_iter().map(|a| (a.info, a.handles)).unzip();
        let (operation_infos, operation_handles): (Vec<_>, Vec<_>) =
            operations.into_values().unzip();

        let info = DirectoryInfo {
            type_name: type_name.to_string(),
            description: container.description.clone(),
            object_name: container.object_name.clone(),
            attributes: attribute_infos,
            operations: operation_infos,
        };
        info!(
            type_name,
            attributes = info.attributes.len(),
            operations = info.operations.len(),
            "Directory built"
        );
        Ok(Self {
            info,
            attributes: attribute_handles,
            operations: operation_handles,
        })
    }
}

type CacheMap = HashMap<TypeId, Arc<dyn Any + Send + Sync>>;

fn cache() -> &'static RwLock<CacheMap> {
    static CACHE: OnceLock<RwLock<CacheMap>> = OnceLock::new();
    CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

impl<T: Managed> Directory<T> {
    /// The shared Directory for `T`, built on first use.
    ///
    /// A failed build is not cached; the next call tries again.
    pub fn of() -> Result<Arc<Self>, BuildError> {
        let key = TypeId::of::<T>();
        if let Some(found) = cache().read().get(&key).cloned() {
            if let Ok(directory) = found.downcast::<Self>() {
                return Ok(directory);
            }
        }

        let built: Arc<Self> = Arc::new(Self::build(&T::model())?);
        let mut guard = cache().write();
        let entry = guard
            .entry(key)
            .or_insert_with(|| built.clone() as Arc<dyn Any + Send + Sync>)
            .clone();
        Ok(entry.downcast::<Self>().unwrap_or(built))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::metadata::ParameterMarker;
    use crate::framework::model::Field;
    use crate::framework::resolver::Site;
    use std::sync::atomic::{AtomicI64, Ordering};

    #[derive(Default)]
    struct Counter {
        value: AtomicI64,
    }

    fn counter_model() -> TypeModel<Counter> {
        TypeModel::new("Counter")
            .container(ContainerMarker::new("A counter"))
            .field(Field::new("value").attribute(AttributeMarker::read_write("Current value")))
            .method(Method::getter("get_value", |c: &Counter| c.value.load(Ordering::SeqCst)))
            .method(Method::setter("set_value", |c: &Counter, v: i64| {
                c.value.store(v, Ordering::SeqCst)
            }))
            .method(
                Method::call1("increment", |c: &Counter, amount: i64| {
                    Ok::<_, String>(c.value.fetch_add(amount, Ordering::SeqCst) + amount)
                })
                .operation(OperationMarker::new("Add to the counter").impact(Impact::ActionInfo))
                .parameter(0, ParameterMarker::new("amount", "Amount to add")),
            )
    }

    impl Managed for Counter {
        fn model() -> TypeModel<Self> {
            counter_model()
        }
    }

    #[test]
    fn test_build_counter_directory() {
        let directory = Directory::build(&counter_model()).unwrap();
        let info = directory.info();

        assert_eq!(info.description, "A counter");
        assert_eq!(info.attribute_names(), vec!["value"]);
        assert_eq!(info.operation_names(), vec!["increment"]);

        let value = info.attribute("value").unwrap();
        assert_eq!(value.access, Access::ReadWrite);
        assert_eq!(value.value_type, ValueType::Int);

        let increment = info.operation("increment").unwrap();
        assert_eq!(increment.impact, Impact::ActionInfo);
        assert_eq!(increment.parameters[0].name, "amount");
        assert_eq!(increment.returns, ValueType::Int);
    }

    #[test]
    fn test_sorted_regardless_of_declaration_order() {
        let noop = |_: &Counter| Ok::<_, String>(());
        let model = TypeModel::<Counter>::new("Sorted")
            .container(ContainerMarker::new("sorted"))
            .method(Method::getter("get_zeta", |_: &Counter| 1i64).attribute(AttributeMarker::new("z")))
            .method(Method::getter("get_alpha", |_: &Counter| 1i64).attribute(AttributeMarker::new("a")))
            .method(Method::getter("get_mid", |_: &Counter| 1i64).attribute(AttributeMarker::new("m")))
            .method(Method::call0("stop", noop).operation(OperationMarker::new("stop")))
            .method(Method::call0("abort", noop).operation(OperationMarker::new("abort")))
            .method(Method::call0("start", noop).operation(OperationMarker::new("start")));
        let directory = Directory::build(&model).unwrap();

        assert_eq!(directory.info().attribute_names(), vec!["alpha", "mid", "zeta"]);
        assert_eq!(directory.info().operation_names(), vec!["abort", "start", "stop"]);
    }

    #[test]
    fn test_build_is_idempotent() {
        let first = Directory::build(&counter_model()).unwrap();
        let second = Directory::build(&counter_model()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_default_parameter_names() {
        let model = TypeModel::<Counter>::new("Params")
            .container(ContainerMarker::new("params"))
            .method(
                Method::call2("combine", |_: &Counter, a: i64, b: String| Ok::<_, String>(format!("{a}{b}")))
                    .operation(OperationMarker::new("combine"))
                    .parameter(1, ParameterMarker::new("suffix", "Appended text")),
            );
        let directory = Directory::build(&model).unwrap();
        let params = &directory.info().operation("combine").unwrap().parameters;

        assert_eq!(params[0].name, "p1");
        assert_eq!(params[0].description, "");
        assert_eq!(params[1].name, "suffix");
        assert_eq!(params[1].value_type, ValueType::Text);
    }

    #[test]
    fn test_missing_container_marker() {
        let model = TypeModel::<Counter>::new("Plain");
        assert_eq!(
            Directory::build(&model).unwrap_err(),
            BuildError::NotExposedType { type_name: "Plain".into() }
        );
    }

    #[test]
    fn test_field_and_accessor_markers_are_ambiguous() {
        let model = TypeModel::<Counter>::new("Twice")
            .container(ContainerMarker::new("twice"))
            .field(Field::new("value").attribute(AttributeMarker::new("field")))
            .method(Method::getter("get_value", |_: &Counter| 1i64).attribute(AttributeMarker::new("getter")));
        let err = Directory::build(&model).unwrap_err();
        assert!(matches!(
            err,
            BuildError::AmbiguousMarker { ref sites, .. } if sites == &[Site::Field, Site::Accessor]
        ));
    }

    #[test]
    fn test_access_requires_handles() {
        let read_only_setter = TypeModel::<Counter>::new("NoGetter")
            .container(ContainerMarker::new("no getter"))
            .method(Method::setter("set_value", |_: &Counter, _: i64| {}).attribute(AttributeMarker::new("value")));
        assert!(matches!(
            Directory::build(&read_only_setter),
            Err(BuildError::MissingAccessor { ref property, .. }) if property == "value"
        ));

        let writable_getter = TypeModel::<Counter>::new("NoSetter")
            .container(ContainerMarker::new("no setter"))
            .method(Method::getter("get_value", |_: &Counter| 1i64).attribute(AttributeMarker::read_write("value")));
        assert!(matches!(
            Directory::build(&writable_getter),
            Err(BuildError::MissingMutator { ref property, .. }) if property == "value"
        ));

        let marked_field_only = TypeModel::<Counter>::new("FieldOnly")
            .container(ContainerMarker::new("field only"))
            .field(Field::new("hidden").attribute(AttributeMarker::new("hidden")));
        assert!(matches!(
            Directory::build(&marked_field_only),
            Err(BuildError::MissingAccessor { .. })
        ));
    }

    #[test]
    fn test_duplicate_operation_names() {
        let model = TypeModel::<Counter>::new("Overloaded")
            .container(ContainerMarker::new("overloaded"))
            .method(Method::call1("process", |_: &Counter, _: i64| Ok::<_, String>(())).operation(OperationMarker::new("int")))
            .method(Method::call1("process", |_: &Counter, _: String| Ok::<_, String>(())).operation(OperationMarker::new("text")));
        assert_eq!(
            Directory::build(&model).unwrap_err(),
            BuildError::DuplicateOperation {
                type_name: "Overloaded".into(),
                operation: "process".into(),
            }
        );
    }

    #[test]
    fn test_marker_on_plain_method_is_rejected() {
        let model = TypeModel::<Counter>::new("Stray")
            .container(ContainerMarker::new("stray"))
            .method(Method::getter("level", |_: &Counter| 1i64).attribute(AttributeMarker::new("level")));
        assert_eq!(
            Directory::build(&model).unwrap_err(),
            BuildError::StrayAttributeMarker {
                type_name: "Stray".into(),
                method: "level".into(),
            }
        );
    }

    #[test]
    fn test_marker_on_shadowed_accessor_is_rejected() {
        let model = TypeModel::<Counter>::new("Ready")
            .container(ContainerMarker::new("ready"))
            .method(Method::getter("get_ready", |_: &Counter| true))
            .method(Method::getter("is_ready", |_: &Counter| true).attribute(AttributeMarker::new("ready")));
        assert!(matches!(
            Directory::build(&model),
            Err(BuildError::StrayAttributeMarker { ref method, .. }) if method == "is_ready"
        ));
    }

    #[test]
    fn test_claimed_mutator_is_not_also_an_operation() {
        let model = TypeModel::<Counter>::new("Level")
            .container(ContainerMarker::new("level"))
            .field(Field::new("level").attribute(AttributeMarker::read_write("level")))
            .method(Method::getter("get_level", |_: &Counter| 1i64))
            .method(Method::setter("set_level", |_: &Counter, _: i64| {}).operation(OperationMarker::new("set")))
            .method(
                Method::call2("set_range", |_: &Counter, _: i64, _: i64| Ok::<_, String>(()))
                    .operation(OperationMarker::new("Set both bounds")),
            );
        let directory = Directory::build(&model).unwrap();
        assert_eq!(directory.info().attribute_names(), vec!["level"]);
        assert_eq!(directory.info().operation_names(), vec!["set_range"]);
    }

    #[test]
    fn test_write_only_attribute() {
        let model = TypeModel::<Counter>::new("WriteOnly")
            .container(ContainerMarker::new("write only"))
            .method(Method::setter("set_level", |_: &Counter, _: i64| {}).attribute(AttributeMarker::write_only("level")));
        let directory = Directory::build(&model).unwrap();
        let (info, handles) = directory.attribute("level").unwrap();
        assert!(!info.is_readable() && info.is_writable());
        assert!(handles.accessor.is_none() && handles.mutator.is_some());
    }

    #[test]
    fn test_read_access_drops_existing_mutator() {
        let model = TypeModel::<Counter>::new("ReadOnly")
            .container(ContainerMarker::new("read only"))
            .method(Method::getter("get_value", |_: &Counter| 1i64).attribute(AttributeMarker::new("value")))
            .method(Method::setter("set_value", |_: &Counter, _: i64| {}));
        let directory = Directory::build(&model).unwrap();
        let (_, handles) = directory.attribute("value").unwrap();
        assert!(handles.mutator.is_none());
    }

    #[test]
    fn test_automatic_discovery() {
        let noop = |_: &Counter| Ok::<_, String>(());
        let model = TypeModel::<Counter>::new("Automatic")
            .container(ContainerMarker::new("automatic").automatic_attributes().automatic_operations())
            .method(Method::getter("get_one", |_: &Counter| "one".to_string()))
            .method(Method::setter("set_one", |_: &Counter, _: String| {}))
            .method(Method::getter("get_two", |_: &Counter| "two".to_string()))
            .method(Method::call0("start", noop))
            .method(Method::call0("stop", noop));
        let directory = Directory::build(&model).unwrap();
        let info = directory.info();

        assert_eq!(info.attribute_names(), vec!["one", "two"]);
        assert_eq!(info.attribute("one").unwrap().access, Access::ReadWrite);
        assert_eq!(info.attribute("two").unwrap().access, Access::Read);
        assert_eq!(info.operation_names(), vec!["start", "stop"]);
        assert_eq!(info.operation("start").unwrap().impact, Impact::Unknown);
    }

    #[test]
    fn test_unmarked_members_are_not_exposed() {
        let model = TypeModel::<Counter>::new("Quiet")
            .container(ContainerMarker::new("quiet"))
            .method(Method::getter("get_hidden", |_: &Counter| 1i64))
            .method(Method::call0("not_operation", |_: &Counter| Ok::<_, String>(())));
        let directory = Directory::build(&model).unwrap();
        assert!(directory.info().attributes.is_empty());
        assert!(directory.info().operations.is_empty());
    }

    #[test]
    fn test_cached_directory_is_shared() {
        let first = Directory::<Counter>::of().unwrap();
        let second = Directory::<Counter>::of().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_info_serializes() {
        let directory = Directory::build(&counter_model()).unwrap();
        let json = serde_json::to_value(directory.info()).unwrap();
        assert_eq!(json["attributes"][0]["access"], "READ_WRITE");
        assert_eq!(json["operations"][0]["impact"], "ACTION_INFO");
        assert_eq!(json["operations"][0]["parameters"][0]["value_type"], "int");
    }
}
