use crate::clients::proxy::ProxyAdapter;
use crate::framework::{DirectoryInfo, DispatchError, FromValue, IntoValue, Value};
use std::fmt::Debug;

/// Trait for typed clients to inherit the standard read/write/call plumbing.
///
/// A client only provides its [`ProxyAdapter`] and how dispatch errors map onto
/// its own error type. Interface method names are the ones declared in the
/// client's `InterfaceShape` (e.g. `get_value`, `set_value`, `increment`).
pub trait ManagedClient: Send + Sync {
    /// The client-specific error type.
    type Error: Send + Sync;

    /// Access the inner proxy.
    fn proxy(&self) -> &ProxyAdapter;

    /// Map dispatch errors to the client-specific error type.
    fn map_error(e: DispatchError) -> Self::Error;

    /// The Directory listing behind this client.
    fn info(&self) -> &DirectoryInfo {
        self.proxy().access().info()
    }

    /// Call an accessor-shaped interface method.
    #[tracing::instrument(skip(self))]
    fn read<R: FromValue>(&self, method: &str) -> Result<R, Self::Error> {
        tracing::debug!("Sending request");
        self.proxy()
            .call_as(method, Vec::new())
            .map_err(Self::map_error)
    }

    /// Call a mutator-shaped interface method.
    #[tracing::instrument(skip(self))]
    fn write<A: IntoValue + Debug>(&self, method: &str, value: A) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.proxy()
            .call(method, vec![value.into_value()])
            .map(|_| ())
            .map_err(Self::map_error)
    }

    /// Call an operation-shaped interface method.
    #[tracing::instrument(skip(self, args))]
    fn call<R: FromValue>(&self, method: &str, args: Vec<Value>) -> Result<R, Self::Error> {
        tracing::debug!(args = args.len(), "Sending request");
        self.proxy().call_as(method, args).map_err(Self::map_error)
    }
}
