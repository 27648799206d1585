//! # Proxy Adapter
//!
//! Routes the methods of a declared interface shape onto a [`ManagedAccess`].
//!
//! Every interface method is classified once, when the adapter is built:
//!
//! - `get_x` / `is_x` with no parameters and a value: read of attribute `x`
//! - `set_x` returning nothing: write of attribute `x` (exactly one argument at call time)
//! - a name and parameter-type signature that match a Directory operation: invoke
//! - anything else: [`DispatchError::UnsupportedMember`], raised on first call
//!
//! Construction never fails. Unresolvable methods only fail when used.

use crate::framework::resolver::{accessor_shape, mutator_shape};
use crate::framework::{DirectoryInfo, DispatchError, FromValue, ManagedAccess, Value, ValueType};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// One method of an interface shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceMethod {
    pub name: String,
    pub params: Vec<ValueType>,
    pub returns: ValueType,
}

/// A named list of methods a typed facade wants to call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceShape {
    name: String,
    methods: Vec<InterfaceMethod>,
}

impl InterfaceShape {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    pub fn method(mut self, name: impl Into<String>, params: &[ValueType], returns: ValueType) -> Self {
        self.methods.push(InterfaceMethod {
            name: name.into(),
            params: params.to_vec(),
            returns,
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn methods(&self) -> &[InterfaceMethod] {
        &self.methods
    }
}

/// Where one interface method is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Read(String),
    Write(String),
    Invoke(String),
    Unsupported,
}

fn classify(method: &InterfaceMethod, info: &DirectoryInfo) -> Route {
    if let Some(attribute) = accessor_shape(&method.name, method.params.len(), method.returns) {
        return Route::Read(attribute);
    }
    if let Some(attribute) = mutator_shape(&method.name, method.returns)
        .filter(|_| method.params.len() == 1)
    {
        return Route::Write(attribute);
    }
    match info.operation(&method.name) {
        Some(operation) if operation.signature() == method.params => {
            Route::Invoke(operation.name.clone())
        }
        _ => Route::Unsupported,
    }
}

/// A typed interface implemented on top of a [`ManagedAccess`].
#[derive(Clone)]
pub struct ProxyAdapter {
    shape: String,
    access: Arc<dyn ManagedAccess>,
    routes: HashMap<String, Route>,
}

impl std::fmt::Debug for ProxyAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyAdapter")
            .field("shape", &self.shape)
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}

impl ProxyAdapter {
    pub fn new(access: Arc<dyn ManagedAccess>, shape: &InterfaceShape) -> Self {
        let routes = shape
            .methods()
            .iter()
            .map(|method| (method.name.clone(), classify(method, access.info())))
            .collect::<HashMap<_, _>>();
        debug!(shape = shape.name(), routes = routes.len(), "Proxy built");
        Self {
            shape: shape.name().to_string(),
            access,
            routes,
        }
    }

    pub fn access(&self) -> &Arc<dyn ManagedAccess> {
        &self.access
    }

    /// The route chosen for `method`, if the shape declares it.
    pub fn route(&self, method: &str) -> Option<&Route> {
        self.routes.get(method)
    }

    /// Calls `method` with dynamically typed arguments.
    #[instrument(skip(self, args), fields(shape = %self.shape))]
    pub fn call(&self, method: &str, args: Vec<Value>) -> Result<Value, DispatchError> {
        match self.routes.get(method) {
            Some(Route::Read(attribute)) => self.access.read_attribute(attribute),
            Some(Route::Write(attribute)) => {
                let supplied = args.len();
                let mut args = args.into_iter();
                match (args.next(), args.next()) {
                    (Some(value), None) => self.access.write_attribute(attribute, value).map(|()| Value::Unit),
                    _ => Err(DispatchError::TypeMismatch {
                        member: method.to_string(),
                        expected: "1 argument(s)".to_string(),
                        found: format!("{supplied} argument(s)"),
                    }),
                }
            }
            Some(Route::Invoke(operation)) => self.access.invoke_operation(operation, args),
            Some(Route::Unsupported) | None => Err(DispatchError::UnsupportedMember(format!(
                "{}.{method}",
                self.shape
            ))),
        }
    }

    /// Calls `method` and converts the result to `R`.
    pub fn call_as<R: FromValue>(&self, method: &str, args: Vec<Value>) -> Result<R, DispatchError> {
        let value = self.call(method, args)?;
        R::from_value(value).map_err(|rejected| DispatchError::TypeMismatch {
            member: method.to_string(),
            expected: R::value_type().to_string(),
            found: rejected.type_name().to_string(),
        })
    }
}
