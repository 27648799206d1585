//! # Object Names
//!
//! Registered objects are addressed by an [`ObjectName`] of the form
//! `domain:key1=value1,key2=value2`. Keys keep their insertion order for display;
//! two names with the same domain and the same key/value set are equal whatever
//! the order, and [`ObjectName::canonical`] gives the order-independent form.

use crate::framework::Managed;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const KEY_NAME: &str = "name";
const KEY_TYPE: &str = "type";
const KEY_APPLICATION: &str = "application";
const RESERVED: [char; 3] = [':', ',', '='];

/// Errors raised while parsing or building an [`ObjectName`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ObjectNameError {
    #[error("Object name has no domain")]
    EmptyDomain,

    #[error("Object name {0} has no key properties")]
    NoProperties(String),

    #[error("Object name has a property with an empty key")]
    EmptyKey,

    #[error("Duplicate key in object name: {0}")]
    DuplicateKey(String),

    #[error("Illegal character {ch:?} in {part:?}")]
    IllegalCharacter { part: String, ch: char },

    #[error("Malformed object name: {0}")]
    Malformed(String),
}

/// A validated `domain:key=value,...` name.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectName {
    domain: String,
    properties: Vec<(String, String)>,
}

impl ObjectName {
    /// Validates `domain` and `properties` and keeps them in the given order.
    pub fn new(domain: impl Into<String>, properties: Vec<(String, String)>) -> Result<Self, ObjectNameError> {
        let domain = domain.into();
        if domain.is_empty() {
            return Err(ObjectNameError::EmptyDomain);
        }
        check_part(&domain, &[':'])?;
        if properties.is_empty() {
            return Err(ObjectNameError::NoProperties(domain));
        }
        for (i, (key, value)) in properties.iter().enumerate() {
            if key.is_empty() {
                return Err(ObjectNameError::EmptyKey);
            }
            check_part(key, &RESERVED)?;
            check_part(value, &RESERVED)?;
            if properties[..i].iter().any(|(k, _)| k == key) {
                return Err(ObjectNameError::DuplicateKey(key.clone()));
            }
        }
        Ok(Self { domain, properties })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Key properties in insertion order.
    pub fn properties(&self) -> &[(String, String)] {
        &self.properties
    }

    /// `domain:` followed by the properties sorted by key.
    pub fn canonical(&self) -> String {
        let mut sorted: Vec<_> = self.properties.iter().collect();
        sorted.sort();
        let properties: Vec<String> = sorted.iter().map(|(k, v)| format!("{k}={v}")).collect();
        format!("{}:{}", self.domain, properties.join(","))
    }
}

fn check_part(part: &str, reserved: &[char]) -> Result<(), ObjectNameError> {
    match part.chars().find(|c| reserved.contains(c)) {
        Some(ch) => Err(ObjectNameError::IllegalCharacter {
            part: part.to_string(),
            ch,
        }),
        None => Ok(()),
    }
}

impl PartialEq for ObjectName {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl std::hash::Hash for ObjectName {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.domain)?;
        for (i, (key, value)) in self.properties.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

impl FromStr for ObjectName {
    type Err = ObjectNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (domain, rest) = s
            .split_once(':')
            .ok_or_else(|| ObjectNameError::Malformed(s.to_string()))?;
        if rest.is_empty() {
            return Self::new(domain, Vec::new());
        }
        let properties = rest
            .split(',')
            .map(|pair| {
                pair.split_once('=')
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .ok_or_else(|| ObjectNameError::Malformed(s.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(domain, properties)
    }
}

impl TryFrom<String> for ObjectName {
    type Error = ObjectNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ObjectName> for String {
    fn from(name: ObjectName) -> Self {
        name.to_string()
    }
}

/// Fluent construction of an [`ObjectName`].
///
/// # Example
/// ```rust
/// use managed_recipe::lifecycle::ObjectNameBuilder;
///
/// let name = ObjectNameBuilder::new()
///     .with_domain("shop")
///     .with_type("Counter")
///     .with_name("orders")
///     .build()
///     .unwrap();
/// assert_eq!(name.to_string(), "shop:type=Counter,name=orders");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ObjectNameBuilder {
    domain: Option<String>,
    properties: Vec<(String, String)>,
}

impl ObjectNameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the domain and every property with those of `name`.
    pub fn with_object_name(mut self, name: &ObjectName) -> Self {
        self.domain = Some(name.domain.clone());
        self.properties = name.properties.clone();
        self
    }

    /// Starts from the object name declared on `T`'s container marker.
    pub fn with_declared_name<T: Managed>(self) -> Result<Self, ObjectNameError> {
        let model = T::model();
        let declared = model
            .ancestry()
            .find_map(|m| m.container_marker())
            .and_then(|c| c.object_name.as_deref())
            .ok_or_else(|| ObjectNameError::Malformed(model.type_name().to_string()))?;
        Ok(self.with_object_name(&declared.parse()?))
    }

    /// Domain from `T`'s module path, `type` from its short name.
    pub fn with_domain_and_type<T>(self) -> Self {
        let full = std::any::type_name::<T>();
        let (module, short) = full.rsplit_once("::").unwrap_or(("default", full));
        self.with_domain(module.replace("::", ".")).with_type(short)
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        self.with_property(KEY_NAME, name)
    }

    pub fn with_type(self, kind: impl Into<String>) -> Self {
        self.with_property(KEY_TYPE, kind)
    }

    pub fn with_application(self, application: impl Into<String>) -> Self {
        self.with_property(KEY_APPLICATION, application)
    }

    /// Adds a property, or replaces the value of an existing key in place.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.properties.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.properties.push((key, value)),
        }
        self
    }

    pub fn build(self) -> Result<ObjectName, ObjectNameError> {
        ObjectName::new(self.domain.unwrap_or_default(), self.properties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display_keep_order() {
        let name: ObjectName = "shop:type=Counter,name=orders".parse().unwrap();
        assert_eq!(name.domain(), "shop");
        assert_eq!(name.property("name"), Some("orders"));
        assert_eq!(name.to_string(), "shop:type=Counter,name=orders");
        assert_eq!(name.canonical(), "shop:name=orders,type=Counter");
    }

    #[test]
    fn test_equality_ignores_property_order() {
        let a: ObjectName = "shop:type=Counter,name=orders".parse().unwrap();
        let b: ObjectName = "shop:name=orders,type=Counter".parse().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_malformed_names() {
        assert_eq!("no-colon".parse::<ObjectName>(), Err(ObjectNameError::Malformed("no-colon".into())));
        assert_eq!(":name=x".parse::<ObjectName>(), Err(ObjectNameError::EmptyDomain));
        assert_eq!("shop:".parse::<ObjectName>(), Err(ObjectNameError::NoProperties("shop".into())));
        assert_eq!("shop:=x".parse::<ObjectName>(), Err(ObjectNameError::EmptyKey));
        assert_eq!(
            "shop:name=a,name=b".parse::<ObjectName>(),
            Err(ObjectNameError::DuplicateKey("name".into()))
        );
        assert_eq!(
            "shop:type=a,,name=b".parse::<ObjectName>(),
            Err(ObjectNameError::Malformed("shop:type=a,,name=b".into()))
        );
        assert_eq!(
            "shop:type=a,".parse::<ObjectName>(),
            Err(ObjectNameError::Malformed("shop:type=a,".into()))
        );
        assert!(matches!(
            "shop:name=a=b".parse::<ObjectName>(),
            Err(ObjectNameError::IllegalCharacter { ch: '=', .. })
        ));
    }

    #[test]
    fn test_builder_replaces_existing_key_in_place() {
        let name = ObjectNameBuilder::new()
            .with_domain("shop")
            .with_name("first")
            .with_application("billing")
            .with_name("second")
            .build()
            .unwrap();
        assert_eq!(name.to_string(), "shop:name=second,application=billing");
    }

    #[test]
    fn test_builder_extends_existing_name() {
        let base: ObjectName = "shop:type=Counter".parse().unwrap();
        let name = ObjectNameBuilder::new()
            .with_object_name(&base)
            .with_name("orders")
            .build()
            .unwrap();
        assert_eq!(name.to_string(), "shop:type=Counter,name=orders");
    }

    #[test]
    fn test_builder_requires_domain() {
        let err = ObjectNameBuilder::new().with_name("orphan").build().unwrap_err();
        assert_eq!(err, ObjectNameError::EmptyDomain);
    }

    #[test]
    fn test_domain_and_type_from_rust_path() {
        struct Probe;
        let name = ObjectNameBuilder::new()
            .with_domain_and_type::<Probe>()
            .build()
            .unwrap();
        assert_eq!(name.property("type"), Some("Probe"));
        assert!(name.domain().starts_with("managed_recipe.lifecycle.object_name"));
    }

    #[test]
    fn test_serde_uses_display_form() {
        let name: ObjectName = "shop:type=Counter".parse().unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"shop:type=Counter\"");
        let back: ObjectName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, name);
    }
}
