//! Service lifecycle management surface and client wiring.

pub mod error;
pub mod managed;

pub use error::*;

use crate::clients::ServiceClient;
use crate::framework::Dispatcher;
use crate::model::Service;
use std::sync::Arc;

/// Creates a service in state NEW and a client dispatching to it.
pub fn new(name: impl Into<String>) -> Result<(Arc<Service>, ServiceClient), ServiceError> {
    let service = Arc::new(Service::new(name));
    let dispatcher = Dispatcher::for_instance(Arc::clone(&service))?;
    let client = ServiceClient::new(Arc::new(dispatcher));

    Ok((service, client))
}
