use crate::clients::managed_client::ManagedClient;
use crate::clients::proxy::{InterfaceShape, ProxyAdapter};
use crate::counter_bean::CounterError;
use crate::framework::{DispatchError, ManagedAccess, ValueType};
use std::sync::Arc;

/// Client for a managed counter.
#[derive(Clone, Debug)]
pub struct CounterClient {
    proxy: ProxyAdapter,
}

impl CounterClient {
    pub fn shape() -> InterfaceShape {
        InterfaceShape::new("CounterApi")
            .method("get_value", &[], ValueType::Int)
            .method("set_value", &[ValueType::Int], ValueType::Unit)
            .method("increment", &[ValueType::Int], ValueType::Int)
            .method("reset", &[], ValueType::Unit)
    }

    pub fn new(access: Arc<dyn ManagedAccess>) -> Self {
        Self {
            proxy: ProxyAdapter::new(access, &Self::shape()),
        }
    }
}

impl ManagedClient for CounterClient {
    type Error = CounterError;

    fn proxy(&self) -> &ProxyAdapter {
        &self.proxy
    }

    fn map_error(e: DispatchError) -> Self::Error {
        CounterError::from(e)
    }
}

impl CounterClient {
    pub fn get_value(&self) -> Result<i64, CounterError> {
        self.read("get_value")
    }

    pub fn set_value(&self, value: i64) -> Result<(), CounterError> {
        self.write("set_value", value)
    }

    /// Returns the new value.
    pub fn increment(&self, amount: i64) -> Result<i64, CounterError> {
        self.call("increment", vec![amount.into()])
    }

    pub fn reset(&self) -> Result<(), CounterError> {
        self.call("reset", Vec::new())
    }
}
