//! Counter-specific management surface and client wiring.

pub mod error;
pub mod managed;

pub use error::*;
pub use managed::OBJECT_NAME;

use crate::clients::CounterClient;
use crate::framework::Dispatcher;
use crate::model::Counter;
use std::sync::Arc;

/// Creates a counter starting at `initial` and a client dispatching to it.
pub fn new(initial: i64) -> Result<(Arc<Counter>, CounterClient), CounterError> {
    let counter = Arc::new(Counter::new(initial));
    let dispatcher = Dispatcher::for_instance(Arc::clone(&counter))?;
    let client = CounterClient::new(Arc::new(dispatcher));

    Ok((counter, client))
}
