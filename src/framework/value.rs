//! # Dynamic Values
//!
//! Attribute values, operation arguments and return values cross the dispatch
//! boundary as [`Value`]s. Declared types are described by [`ValueType`].
//!
//! The [`Typed`], [`IntoValue`] and [`FromValue`] traits connect Rust types to the
//! dynamic representation. A failed [`FromValue::from_value`] is what the
//! dispatcher reports as a type mismatch.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A dynamically typed value exchanged with the management agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// Returned by operations and mutators that produce nothing.
    Unit,
    /// An absent value of a nullable attribute.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    TextList(Vec<String>),
}

impl Value {
    /// Short name of the runtime type, used in mismatch reports.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Unit => "unit",
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::TextList(_) => "text list",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "()"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => write!(f, "{s:?}"),
            Value::TextList(items) => write!(f, "{items:?}"),
        }
    }
}

/// Declared type of an attribute, parameter or return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Unit,
    Bool,
    Int,
    Float,
    Text,
    TextList,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Unit => "unit",
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Text => "text",
            ValueType::TextList => "text list",
        };
        f.write_str(name)
    }
}

/// A Rust type with a declared [`ValueType`].
pub trait Typed {
    fn value_type() -> ValueType;
}

/// Conversion of a Rust value into a [`Value`].
pub trait IntoValue: Typed {
    fn into_value(self) -> Value;
}

/// Conversion of a [`Value`] into a Rust value.
///
/// On failure the rejected value is handed back so the caller can report it.
pub trait FromValue: Typed + Sized {
    fn from_value(value: Value) -> Result<Self, Value>;
}

macro_rules! typed {
    ($($ty:ty => $vt:ident),* $(,)?) => {
        $(
            impl Typed for $ty {
                fn value_type() -> ValueType {
                    ValueType::$vt
                }
            }
        )*
    };
}

typed! {
    () => Unit,
    bool => Bool,
    i64 => Int,
    i32 => Int,
    u32 => Int,
    u64 => Int,
    usize => Int,
    f64 => Float,
    String => Text,
    &'static str => Text,
    Vec<String> => TextList,
}

impl<T: Typed> Typed for Option<T> {
    fn value_type() -> ValueType {
        T::value_type()
    }
}

impl IntoValue for () {
    fn into_value(self) -> Value {
        Value::Unit
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl IntoValue for i64 {
    fn into_value(self) -> Value {
        Value::Int(self)
    }
}

impl IntoValue for i32 {
    fn into_value(self) -> Value {
        Value::Int(i64::from(self))
    }
}

impl IntoValue for u32 {
    fn into_value(self) -> Value {
        Value::Int(i64::from(self))
    }
}

impl IntoValue for u64 {
    fn into_value(self) -> Value {
        Value::Int(i64::try_from(self).unwrap_or(i64::MAX))
    }
}

impl IntoValue for usize {
    fn into_value(self) -> Value {
        Value::Int(i64::try_from(self).unwrap_or(i64::MAX))
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

impl IntoValue for &'static str {
    fn into_value(self) -> Value {
        Value::Text(self.to_string())
    }
}

impl IntoValue for Vec<String> {
    fn into_value(self) -> Value {
        Value::TextList(self)
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        self.map_or(Value::Null, IntoValue::into_value)
    }
}

impl FromValue for () {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Unit => Ok(()),
            other => Err(other),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(other),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Int(n) => Ok(n),
            other => Err(other),
        }
    }
}

macro_rules! narrow_int {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, Value> {
                    match value {
                        Value::Int(n) => <$ty>::try_from(n).map_err(|_| Value::Int(n)),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

narrow_int!(i32, u32, u64, usize);

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Float(x) => Ok(x),
            Value::Int(n) => Ok(n as f64),
            other => Err(other),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(other),
        }
    }
}

impl FromValue for Vec<String> {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::TextList(items) => Ok(items),
            other => Err(other),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}
