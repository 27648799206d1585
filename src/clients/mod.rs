//! Typed facades over [`ManagedAccess`](crate::framework::ManagedAccess).
//!
//! [`ProxyAdapter`] does the routing, [`ManagedClient`] supplies the shared
//! read/write/call plumbing, and [`managed_client!`](crate::managed_client)
//! generates the boilerplate for simple clients.

pub mod counter_client;
pub mod macros;
pub mod managed_client;
pub mod processing_client;
pub mod proxy;
pub mod service_client;

pub use counter_client::*;
pub use managed_client::*;
pub use processing_client::*;
pub use proxy::*;
pub use service_client::*;
