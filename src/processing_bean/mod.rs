//! Processing monitor management surface and client wiring.

pub mod error;
pub mod managed;

pub use error::*;
pub use managed::monitor_model;

use crate::clients::ProcessingClient;
use crate::framework::Dispatcher;
use crate::model::ProcessingMonitor;
use std::sync::Arc;

/// Creates a started processing monitor and a client dispatching to it.
pub fn new(name: impl Into<String>) -> Result<(Arc<ProcessingMonitor>, ProcessingClient), ProcessingError> {
    let monitor = Arc::new(ProcessingMonitor::new(name));
    monitor.start();
    let dispatcher = Dispatcher::for_instance(Arc::clone(&monitor))?;
    let client = ProcessingClient::new(Arc::new(dispatcher));

    Ok((monitor, client))
}
