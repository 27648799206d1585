//! # Member Resolver
//!
//! Turns a [`TypeModel`] into candidate members without validating them yet:
//!
//! 1. **Visible methods**: the type's own methods followed by its ancestors',
//!    where an ancestor method is hidden if a nearer type declares one with the
//!    same name and parameter types.
//! 2. **Properties**: accessor-shaped methods (`get_x`/`getX`, or `is_x`/`isX`
//!    returning bool, no parameters, non-unit return) and mutator-shaped methods
//!    (`set_x`/`setX`, one parameter, unit return) are paired by logical name.
//!    A field of the same name anywhere on the ancestry is attached too.
//! 3. **Operations**: methods carrying an operation marker, unless they carry an
//!    attribute marker or belong to a marked property.
//!
//! Marker lookup for one property checks field, accessor, then mutator, and
//! rejects more than one marker with [`BuildError::AmbiguousMarker`].
//! Attribute-marked methods that no property ends up holding are reported as
//! `stray` so the builder can reject them.

use super::error::BuildError;
use super::metadata::{AttributeMarker, ContainerMarker};
use super::model::{Field, Method, TypeModel};
use super::value::ValueType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A place where an attribute marker can be declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Site {
    Field,
    Accessor,
    Mutator,
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Site::Field => write!(f, "field"),
            Site::Accessor => write!(f, "accessor"),
            Site::Mutator => write!(f, "mutator"),
        }
    }
}

/// The field/accessor/mutator triple behind one logical attribute name.
#[derive(Debug)]
pub struct PropertyCandidate<'m, T> {
    pub name: String,
    pub field: Option<&'m Field>,
    pub accessor: Option<&'m Method<T>>,
    pub mutator: Option<&'m Method<T>>,
}

impl<'m, T> PropertyCandidate<'m, T> {
    fn named(name: String) -> Self {
        Self {
            name,
            field: None,
            accessor: None,
            mutator: None,
        }
    }

    /// Every declared marker for this property, in lookup order.
    pub fn marker_sites(&self) -> Vec<(Site, &'m AttributeMarker)> {
        let field = self
            .field
            .and_then(|f| f.marker.as_ref())
            .map(|m| (Site::Field, m));
        let accessor = self
            .accessor
            .and_then(Method::attribute_marker)
            .map(|m| (Site::Accessor, m));
        let mutator = self
            .mutator
            .and_then(Method::attribute_marker)
            .map(|m| (Site::Mutator, m));
        [field, accessor, mutator].into_iter().flatten().collect()
    }

    /// The single marker governing this property, if any.
    pub fn marker(&self, type_name: &str) -> Result<Option<&'m AttributeMarker>, BuildError> {
        let sites = self.marker_sites();
        match sites.as_slice() {
            [] => Ok(None),
            [(_, marker)] => Ok(Some(*marker)),
            _ => Err(BuildError::AmbiguousMarker {
                type_name: type_name.to_string(),
                property: self.name.clone(),
                sites: sites.iter().map(|(site, _)| *site).collect(),
            }),
        }
    }

    /// Declared type: the accessor's return type, else the mutator's parameter type.
    pub fn value_type(&self) -> Option<ValueType> {
        self.accessor.map(Method::returns).or_else(|| {
            self.mutator
                .and_then(|m| m.params().first())
                .map(|p| p.value_type)
        })
    }

    fn claims(&self, method: &Method<T>) -> bool {
        let same = |m: Option<&Method<T>>| m.is_some_and(|m| std::ptr::eq(m, method));
        same(self.accessor) || same(self.mutator)
    }

    fn is_marked(&self) -> bool {
        !self.marker_sites().is_empty()
    }
}

/// Everything the resolver found on one type.
#[derive(Debug)]
pub struct ResolvedType<'m, T> {
    pub type_name: &'m str,
    pub container: Option<&'m ContainerMarker>,
    /// Properties in discovery order.
    pub properties: Vec<PropertyCandidate<'m, T>>,
    /// Operation candidates in discovery order.
    pub operations: Vec<&'m Method<T>>,
    /// Visible methods that belong to no property and carry no marker.
    pub unclaimed: Vec<&'m Method<T>>,
    /// Attribute-marked methods that belong to no property.
    pub stray: Vec<&'m Method<T>>,
}

/// Logical name of an accessor-shaped method.
pub fn accessor_name<T>(method: &Method<T>) -> Option<String> {
    accessor_shape(method.name(), method.params().len(), method.returns())
}

/// Logical name of a mutator-shaped method.
pub fn mutator_name<T>(method: &Method<T>) -> Option<String> {
    if method.params().len() != 1 {
        return None;
    }
    mutator_shape(method.name(), method.returns())
}

/// `get_x`/`getX` with no parameters and a value, or `is_x`/`isX` returning bool.
pub(crate) fn accessor_shape(name: &str, arity: usize, returns: ValueType) -> Option<String> {
    if arity != 0 || returns == ValueType::Unit {
        return None;
    }
    property_name(name, "get")
        .or_else(|| property_name(name, "is").filter(|_| returns == ValueType::Bool))
}

/// `set_x`/`setX` returning nothing. Arity is checked by the caller.
pub(crate) fn mutator_shape(name: &str, returns: ValueType) -> Option<String> {
    if returns != ValueType::Unit {
        return None;
    }
    property_name(name, "set")
}

/// `get_value` and `getValue` both become `value`.
fn property_name(name: &str, prefix: &str) -> Option<String> {
    let rest = name.strip_prefix(prefix)?;
    let rest = match rest.strip_prefix('_') {
        Some(snake) => snake,
        None if rest.starts_with(|c: char| c.is_ascii_uppercase()) => rest,
        None => return None,
    };
    let mut chars = rest.chars();
    let first = chars.next()?;
    Some(first.to_lowercase().chain(chars).collect())
}

fn visible_methods<T>(model: &TypeModel<T>) -> Vec<&Method<T>> {
    let mut visible: Vec<&Method<T>> = Vec::new();
    for ancestor in model.ancestry() {
        for method in ancestor.methods() {
            if !visible.iter().any(|seen| seen.overrides(method)) {
                visible.push(method);
            }
        }
    }
    visible
}

fn find_field<'m, T>(model: &'m TypeModel<T>, name: &str) -> Option<&'m Field> {
    model
        .ancestry()
        .flat_map(|ancestor| ancestor.fields())
        .find(|field| field.name == name)
}

fn slot<'m, T>(
    properties: &mut Vec<PropertyCandidate<'m, T>>,
    index: &mut HashMap<String, usize>,
    name: String,
) -> usize {
    if let Some(&i) = index.get(&name) {
        return i;
    }
    index.insert(name.clone(), properties.len());
    properties.push(PropertyCandidate::named(name));
    properties.len() - 1
}

/// Enumerates the candidate members of `model`.
pub fn resolve<T>(model: &TypeModel<T>) -> ResolvedType<'_, T> {
    let methods = visible_methods(model);

    let mut properties: Vec<PropertyCandidate<'_, T>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for &method in &methods {
        if let Some(name) = accessor_name(method) {
            let i = slot(&mut properties, &mut index, name);
            properties[i].accessor.get_or_insert(method);
        } else if let Some(name) = mutator_name(method) {
            let i = slot(&mut properties, &mut index, name);
            properties[i].mutator.get_or_insert(method);
        }
    }

    // Marked fields with no methods still form a candidate; the builder rejects them.
    for ancestor in model.ancestry() {
        for field in ancestor.fields().iter().filter(|f| f.marker.is_some()) {
            slot(&mut properties, &mut index, field.name.clone());
        }
    }

    for property in &mut properties {
        property.field = find_field(model, &property.name);
    }

    let mut operations = Vec::new();
    let mut unclaimed = Vec::new();
    let mut stray = Vec::new();
    for &method in &methods {
        let owner = properties.iter().find(|p| p.claims(method));
        if method.attribute_marker().is_some() {
            // Not accessor- or mutator-shaped, or a second accessor for a taken slot.
            if owner.is_none() {
                stray.push(method);
            }
            continue;
        }
        if method.operation_marker().is_some() {
            if !owner.is_some_and(PropertyCandidate::is_marked) {
                operations.push(method);
            }
        } else if owner.is_none() {
            unclaimed.push(method);
        }
    }

    ResolvedType {
        type_name: model.type_name(),
        container: model.ancestry().find_map(TypeModel::container_marker),
        properties,
        operations,
        unclaimed,
        stray,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::metadata::OperationMarker;

    struct Bean;

    fn names<T>(resolved: &ResolvedType<'_, T>) -> Vec<String> {
        resolved.properties.iter().map(|p| p.name.clone()).collect()
    }

    #[test]
    fn test_prefix_conventions() {
        assert_eq!(property_name("get_value", "get"), Some("value".into()));
        assert_eq!(property_name("getInputCount", "get"), Some("inputCount".into()));
        assert_eq!(property_name("getaway", "get"), None);
        assert_eq!(property_name("get_", "get"), None);
    }

    #[test]
    fn test_pairs_accessor_and_mutator() {
        let model = TypeModel::<Bean>::new("Bean")
            .method(Method::getter("get_value", |_: &Bean| 1i64))
            .method(Method::setter("set_value", |_: &Bean, _: i64| {}))
            .method(Method::getter("is_enabled", |_: &Bean| true))
            .method(Method::getter("is_count", |_: &Bean| 1i64));
        let resolved = resolve(&model);

        assert_eq!(names(&resolved), vec!["value", "enabled"]);
        let value = &resolved.properties[0];
        assert!(value.accessor.is_some() && value.mutator.is_some());
        assert_eq!(value.value_type(), Some(ValueType::Int));
        // `is_count` returns an int, so it is a plain method.
        assert_eq!(resolved.unclaimed.len(), 1);
    }

    #[test]
    fn test_field_found_on_ancestor() {
        let parent = TypeModel::<Bean>::new("Base")
            .field(Field::new("value").attribute(AttributeMarker::new("inherited")));
        let model = TypeModel::<Bean>::new("Bean")
            .method(Method::getter("get_value", |_: &Bean| 1i64))
            .extends(parent);
        let resolved = resolve(&model);

        let value = &resolved.properties[0];
        assert!(value.field.is_some());
        let marker = value.marker("Bean").unwrap();
        assert_eq!(marker.map(|m| m.description.as_str()), Some("inherited"));
    }

    #[test]
    fn test_two_marker_sites_are_ambiguous() {
        let model = TypeModel::<Bean>::new("Bean")
            .method(Method::getter("get_value", |_: &Bean| 1i64).attribute(AttributeMarker::new("a")))
            .method(Method::setter("set_value", |_: &Bean, _: i64| {}).attribute(AttributeMarker::new("b")));
        let resolved = resolve(&model);

        let err = resolved.properties[0].marker("Bean").unwrap_err();
        assert_eq!(
            err,
            BuildError::AmbiguousMarker {
                type_name: "Bean".into(),
                property: "value".into(),
                sites: vec![Site::Accessor, Site::Mutator],
            }
        );
    }

    #[test]
    fn test_nearest_override_hides_ancestor_method() {
        let parent = TypeModel::<Bean>::new("Base")
            .method(Method::call0("reset", |_: &Bean| Ok::<_, String>(())).operation(OperationMarker::new("base")));
        let model = TypeModel::<Bean>::new("Bean")
            .method(Method::call0("reset", |_: &Bean| Ok::<_, String>(())).operation(OperationMarker::new("child")))
            .extends(parent);
        let resolved = resolve(&model);

        assert_eq!(resolved.operations.len(), 1);
        let marker = resolved.operations[0].operation_marker().unwrap();
        assert_eq!(marker.description, "child");
    }

    #[test]
    fn test_attribute_marked_method_is_not_an_operation() {
        let model = TypeModel::<Bean>::new("Bean").method(
            Method::getter("get_value", |_: &Bean| 1i64)
                .attribute(AttributeMarker::new("value"))
                .operation(OperationMarker::new("also an op")),
        );
        let resolved = resolve(&model);
        assert!(resolved.operations.is_empty());
    }

    #[test]
    fn test_marked_method_without_property_shape_is_stray() {
        let model = TypeModel::<Bean>::new("Bean")
            .method(Method::getter("level", |_: &Bean| 1i64).attribute(AttributeMarker::new("level")));
        let resolved = resolve(&model);

        assert!(resolved.properties.is_empty());
        assert!(resolved.operations.is_empty());
        assert_eq!(resolved.stray.len(), 1);
        assert_eq!(resolved.stray[0].name(), "level");
    }

    #[test]
    fn test_marked_second_accessor_is_stray() {
        let model = TypeModel::<Bean>::new("Bean")
            .method(Method::getter("get_ready", |_: &Bean| true))
            .method(Method::getter("is_ready", |_: &Bean| true).attribute(AttributeMarker::new("ready")));
        let resolved = resolve(&model);

        assert_eq!(names(&resolved), vec!["ready"]);
        assert_eq!(resolved.properties[0].accessor.map(Method::name), Some("get_ready"));
        assert_eq!(resolved.stray.len(), 1);
        assert_eq!(resolved.stray[0].name(), "is_ready");
    }

    #[test]
    fn test_mutator_of_marked_property_is_not_an_operation() {
        let model = TypeModel::<Bean>::new("Bean")
            .field(Field::new("level").attribute(AttributeMarker::read_write("level")))
            .method(Method::getter("get_level", |_: &Bean| 1i64))
            .method(Method::setter("set_level", |_: &Bean, _: i64| {}).operation(OperationMarker::new("also an op")));
        let resolved = resolve(&model);

        assert!(resolved.operations.is_empty());
        assert!(resolved.properties[0].mutator.is_some());
    }

    #[test]
    fn test_two_argument_setter_stays_an_operation() {
        let model = TypeModel::<Bean>::new("Bean").method(
            Method::call2("set_range", |_: &Bean, _: i64, _: i64| Ok::<_, String>(()))
                .operation(OperationMarker::new("Set both bounds")),
        );
        let resolved = resolve(&model);

        assert!(resolved.properties.is_empty());
        assert_eq!(resolved.operations.len(), 1);
    }

    #[test]
    fn test_container_marker_is_inherited() {
        let parent = TypeModel::<Bean>::new("Base").container(ContainerMarker::new("base bean"));
        let model = TypeModel::<Bean>::new("Bean").extends(parent);
        let resolved = resolve(&model);
        assert_eq!(resolved.container.map(|c| c.description.as_str()), Some("base bean"));
    }
}
