//! # Declarative Type Tables
//!
//! A [`TypeModel`] is the explicit, statically declared description of a managed
//! type: its fields, its methods, the markers on each, and its ancestors. It takes
//! the place of runtime member enumeration. A type provides its table once through
//! the [`Managed`] trait and the [`Directory`](super::Directory) is built from it.
//!
//! ```rust
//! use managed_recipe::framework::{AttributeMarker, ContainerMarker, Method, TypeModel};
//! use std::sync::atomic::{AtomicI64, Ordering};
//!
//! struct Gauge { level: AtomicI64 }
//!
//! let model = TypeModel::<Gauge>::new("Gauge")
//!     .container(ContainerMarker::new("A fill level"))
//!     .method(
//!         Method::getter("get_level", |g: &Gauge| g.level.load(Ordering::Relaxed))
//!             .attribute(AttributeMarker::new("Current level")),
//!     );
//! assert_eq!(model.type_name(), "Gauge");
//! ```
//!
//! Methods take `&T`. Managed objects are shared between the application and any
//! number of dispatch callers, so their state uses interior mutability (atomics,
//! locks) chosen by the implementer.

use super::error::Fault;
use super::metadata::{AttributeMarker, ContainerMarker, OperationMarker, ParameterMarker};
use super::value::{FromValue, IntoValue, Value, ValueType};
use std::convert::Infallible;
use std::sync::Arc;
use tracing::warn;

/// A type that can describe its own management surface.
pub trait Managed: Send + Sync + Sized + 'static {
    fn model() -> TypeModel<Self>;
}

/// Failure produced by an invoker before or while calling the user closure.
#[derive(Debug)]
pub(crate) enum CallError {
    /// Wrong number of arguments.
    Arity { expected: usize, supplied: usize },
    /// Argument at `index` could not be converted. The user closure was not called.
    Mismatch {
        index: usize,
        expected: ValueType,
        found: &'static str,
    },
    /// The user closure returned an error.
    Fault(Fault),
}

pub(crate) type Invoker<T> = Arc<dyn Fn(&T, Vec<Value>) -> Result<Value, CallError> + Send + Sync>;

/// A field of the managed type. Fields only carry markers; reads and writes
/// always go through accessor and mutator methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub marker: Option<AttributeMarker>,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            marker: None,
        }
    }

    pub fn attribute(mut self, marker: AttributeMarker) -> Self {
        self.marker = Some(marker);
        self
    }
}

/// One formal parameter of a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub value_type: ValueType,
    pub marker: Option<ParameterMarker>,
}

/// A callable member of the managed type.
pub struct Method<T> {
    name: String,
    params: Vec<Param>,
    returns: ValueType,
    attribute: Option<AttributeMarker>,
    operation: Option<OperationMarker>,
    invoker: Invoker<T>,
}

impl<T> Clone for Method<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            params: self.params.clone(),
            returns: self.returns,
            attribute: self.attribute.clone(),
            operation: self.operation.clone(),
            invoker: Arc::clone(&self.invoker),
        }
    }
}

impl<T> std::fmt::Debug for Method<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("returns", &self.returns)
            .field("attribute", &self.attribute)
            .field("operation", &self.operation)
            .finish_non_exhaustive()
    }
}

fn expect_arity(args: &[Value], expected: usize) -> Result<(), CallError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(CallError::Arity {
            expected,
            supplied: args.len(),
        })
    }
}

fn convert<A: FromValue>(index: usize, value: Value) -> Result<A, CallError> {
    A::from_value(value).map_err(|rejected| CallError::Mismatch {
        index,
        expected: A::value_type(),
        found: rejected.type_name(),
    })
}

fn reply<R: IntoValue, E: Into<Fault>>(result: Result<R, E>) -> Result<Value, CallError> {
    result
        .map(IntoValue::into_value)
        .map_err(|e| CallError::Fault(e.into()))
}

impl<T: Send + Sync + 'static> Method<T> {
    fn from_parts(name: impl Into<String>, params: Vec<ValueType>, returns: ValueType, invoker: Invoker<T>) -> Self {
        Self {
            name: name.into(),
            params: params
                .into_iter()
                .map(|value_type| Param {
                    value_type,
                    marker: None,
                })
                .collect(),
            returns,
            attribute: None,
            operation: None,
            invoker,
        }
    }

    /// A method with no parameters.
    pub fn call0<R, E, F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&T) -> Result<R, E> + Send + Sync + 'static,
        R: IntoValue,
        E: Into<Fault>,
    {
        let invoker: Invoker<T> = Arc::new(move |target: &T, args: Vec<Value>| {
            expect_arity(&args, 0)?;
            reply(f(target))
        });
        Self::from_parts(name, vec![], R::value_type(), invoker)
    }

    /// A method with one parameter.
    pub fn call1<A, R, E, F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&T, A) -> Result<R, E> + Send + Sync + 'static,
        A: FromValue,
        R: IntoValue,
        E: Into<Fault>,
    {
        let invoker: Invoker<T> = Arc::new(move |target: &T, args: Vec<Value>| {
            expect_arity(&args, 1)?;
            let mut args = args.into_iter();
            let a = convert::<A>(0, args.next().unwrap_or(Value::Unit))?;
            reply(f(target, a))
        });
        Self::from_parts(name, vec![A::value_type()], R::value_type(), invoker)
    }

    /// A method with two parameters.
    pub fn call2<A, B, R, E, F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&T, A, B) -> Result<R, E> + Send + Sync + 'static,
        A: FromValue,
        B: FromValue,
        R: IntoValue,
        E: Into<Fault>,
    {
        let invoker: Invoker<T> = Arc::new(move |target: &T, args: Vec<Value>| {
            expect_arity(&args, 2)?;
            let mut args = args.into_iter();
            let a = convert::<A>(0, args.next().unwrap_or(Value::Unit))?;
            let b = convert::<B>(1, args.next().unwrap_or(Value::Unit))?;
            reply(f(target, a, b))
        });
        Self::from_parts(
            name,
            vec![A::value_type(), B::value_type()],
            R::value_type(),
            invoker,
        )
    }

    /// An infallible accessor-shaped method.
    pub fn getter<R, F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&T) -> R + Send + Sync + 'static,
        R: IntoValue,
    {
        Self::call0(name, move |target: &T| Ok::<R, Infallible>(f(target)))
    }

    /// An infallible mutator-shaped method.
    pub fn setter<A, F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&T, A) + Send + Sync + 'static,
        A: FromValue,
    {
        Self::call1(name, move |target: &T, value: A| {
            f(target, value);
            Ok::<(), Infallible>(())
        })
    }

    /// An infallible method with no parameters and no result.
    pub fn action<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        Self::call0(name, move |target: &T| {
            f(target);
            Ok::<(), Infallible>(())
        })
    }

    pub fn attribute(mut self, marker: AttributeMarker) -> Self {
        self.attribute = Some(marker);
        self
    }

    pub fn operation(mut self, marker: OperationMarker) -> Self {
        self.operation = Some(marker);
        self
    }

    /// Attaches a parameter marker to the parameter at `index` (0-based).
    pub fn parameter(mut self, index: usize, marker: ParameterMarker) -> Self {
        match self.params.get_mut(index) {
            Some(param) => param.marker = Some(marker),
            None => warn!(
                method = %self.name,
                index,
                arity = self.params.len(),
                "Parameter marker ignored: no such parameter"
            ),
        }
        self
    }
}

impl<T> Method<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn returns(&self) -> ValueType {
        self.returns
    }

    pub fn attribute_marker(&self) -> Option<&AttributeMarker> {
        self.attribute.as_ref()
    }

    pub fn operation_marker(&self) -> Option<&OperationMarker> {
        self.operation.as_ref()
    }

    /// Same name and same parameter types.
    pub(crate) fn overrides(&self, other: &Method<T>) -> bool {
        self.name == other.name
            && self.params.len() == other.params.len()
            && self
                .params
                .iter()
                .zip(&other.params)
                .all(|(a, b)| a.value_type == b.value_type)
    }

    pub(crate) fn invoker(&self) -> Invoker<T> {
        Arc::clone(&self.invoker)
    }
}

/// The declared members of one managed type, plus its ancestors.
pub struct TypeModel<T> {
    type_name: String,
    container: Option<ContainerMarker>,
    fields: Vec<Field>,
    methods: Vec<Method<T>>,
    parent: Option<Box<TypeModel<T>>>,
}

impl<T> std::fmt::Debug for TypeModel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeModel")
            .field("type_name", &self.type_name)
            .field("container", &self.container)
            .field("fields", &self.fields)
            .field("methods", &self.methods)
            .field("parent", &self.parent)
            .finish()
    }
}

impl<T: Send + Sync + 'static> TypeModel<T> {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            container: None,
            fields: Vec::new(),
            methods: Vec::new(),
            parent: None,
        }
    }

    /// A model named after the Rust type (e.g. "Counter" instead of
    /// "managed_recipe::model::counter::Counter").
    pub fn for_type() -> Self {
        let type_name = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        Self::new(type_name)
    }

    pub fn container(mut self, marker: ContainerMarker) -> Self {
        self.container = Some(marker);
        self
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn method(mut self, method: Method<T>) -> Self {
        self.methods.push(method);
        self
    }

    /// Declares `parent` as the direct ancestor of this type.
    pub fn extends(mut self, parent: TypeModel<T>) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }
}

impl<T> TypeModel<T> {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn container_marker(&self) -> Option<&ContainerMarker> {
        self.container.as_ref()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn methods(&self) -> &[Method<T>] {
        &self.methods
    }

    /// This model followed by its ancestors, nearest first.
    pub fn ancestry(&self) -> impl Iterator<Item = &TypeModel<T>> {
        std::iter::successors(Some(self), |model| model.parent.as_deref())
    }
}
