//! # Managed Recipe Demo
//!
//! Registers a counter, a service and a processing monitor with the platform
//! agent, runs a simulated message-processing loop on Tokio tasks, and reads the
//! results back through the agent and through the typed clients.
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

use managed_recipe::clients::ManagedClient;
use managed_recipe::framework::Value;
use managed_recipe::lifecycle::{setup_tracing, ManagementAgent, ObjectName, ObjectNameBuilder, Registration};
use managed_recipe::{counter_bean, processing_bean, service_bean};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn, Instrument};

/// Messages processed by the simulated workers.
const MESSAGES: usize = 20;
/// Every n-th message fails.
const FAIL_EVERY: usize = 7;
/// Simulated processing time per message.
const TICK: Duration = Duration::from_millis(5);

#[derive(Debug, Error)]
#[error("message {0} rejected")]
struct Rejected(usize);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup tracing once for the entire application
    setup_tracing();

    info!("Starting management demo");
    let agent = ManagementAgent::platform();

    // Counter: registered under the name declared on its container marker
    let (counter, counter_client) = counter_bean::new(0)?;
    let counter_name: ObjectName = counter_bean::OBJECT_NAME.parse()?;
    agent.register(counter_name.clone(), Arc::clone(counter_client.proxy().access()))?;

    // Service: named by the application
    let (service, service_client) = service_bean::new("ingest")?;
    let service_name = ObjectNameBuilder::new()
        .with_domain("demo")
        .with_type("Service")
        .with_name(service.name())
        .build()?;
    let service_registration = Registration::new(Arc::clone(&service), service_name, agent)?;
    service_registration.register()?;

    // Processing monitor
    let (monitor, processing_client) = processing_bean::new("ingest")?;
    let processing_name = ObjectNameBuilder::new()
        .with_domain("demo")
        .with_type("Processing")
        .with_name(monitor.name())
        .build()?;
    agent.register_managed(processing_name.clone(), Arc::clone(&monitor))?;

    info!(registered = agent.len(), "Objects registered");

    service_client.start()?;

    let span = tracing::info_span!("processing");
    async {
        let mut workers = Vec::with_capacity(MESSAGES);
        for message in 1..=MESSAGES {
            let monitor = Arc::clone(&monitor);
            let counter = Arc::clone(&counter);
            workers.push(tokio::spawn(async move {
                monitor.notify_input();
                tokio::time::sleep(TICK).await;
                if message % FAIL_EVERY == 0 {
                    monitor.notify_failed(Some(&Rejected(message)));
                } else {
                    monitor.notify_output();
                    if let Err(e) = counter.increment(1) {
                        warn!(error = %e, "Counter not incremented");
                    }
                }
            }));
        }
        for worker in workers {
            if let Err(e) = worker.await {
                warn!(error = %e, "Worker did not finish");
            }
        }
    }
    .instrument(span)
    .await;

    // Generic access through the agent
    for attribute in ["input_count", "output_count", "failed_count", "duration_average_millis"] {
        let value = agent.read_attribute(&processing_name, attribute)?;
        info!(object_name = %processing_name, attribute, %value, "Attribute read");
    }
    let total = agent.invoke_operation(&counter_name, "increment", vec![Value::Int(100)])?;
    info!(object_name = %counter_name, %total, "Counter incremented through the agent");

    // Typed access through the clients
    info!(
        value = counter_client.get_value()?,
        "Counter read through its client"
    );
    info!(
        started = ?processing_client.get_started()?,
        reason = ?processing_client.get_failed_latest_reason()?,
        "Monitor read through its client"
    );

    service_client.stop()?;
    service_client.terminate()?;
    info!(state = %service_client.get_state()?, "Service finished");

    // Unregister everything
    service_registration.unregister()?;
    agent.unregister(&processing_name)?;
    agent.unregister(&counter_name)?;

    info!(registered = agent.len(), "Application completed successfully");
    Ok(())
}
