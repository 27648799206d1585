//! [`Managed`] implementations for the monitor base model and
//! [`ProcessingMonitor`].
//!
//! [`monitor_model`] is the ancestor shared by every [`Monitored`] type. It
//! contributes the `started` attribute and a `reset` operation that leaves the
//! start time alone; descendants override `reset` to clear their own state.

use crate::framework::{
    AttributeMarker, ContainerMarker, Impact, Managed, Method, MetricType, OperationMarker, TypeModel,
};
use crate::model::{Monitored, ProcessingMonitor};

/// The ancestor model of every monitor.
pub fn monitor_model<T: Monitored>() -> TypeModel<T> {
    TypeModel::new("MonitorBase")
        .method(
            Method::getter("get_started", |m: &T| m.monitor().started())
                .attribute(AttributeMarker::new("The time when the monitor was started")),
        )
        .method(
            // Nothing to reset; the start time survives.
            Method::action("reset", |_: &T| {})
                .operation(OperationMarker::new("Resets the monitor").impact(Impact::Action)),
        )
}

fn count(description: &str) -> AttributeMarker {
    AttributeMarker::new(description).metric(MetricType::Counter)
}

fn gauge(description: &str, units: &str) -> AttributeMarker {
    AttributeMarker::new(description)
        .units(units)
        .metric(MetricType::Gauge)
}

impl Managed for ProcessingMonitor {
    fn model() -> TypeModel<Self> {
        TypeModel::for_type()
            .container(ContainerMarker::new("Message processing statistics"))
            .extends(monitor_model())
            .method(
                Method::getter("get_input_count", ProcessingMonitor::input_count)
                    .attribute(count("Number of messages received")),
            )
            .method(
                Method::getter("get_input_latest", ProcessingMonitor::input_latest)
                    .attribute(AttributeMarker::new("Time of the latest message received")),
            )
            .method(
                Method::getter("get_input_latest_age_seconds", ProcessingMonitor::input_age)
                    .attribute(gauge("Time since the latest message received", "seconds")),
            )
            .method(
                Method::getter("get_output_count", ProcessingMonitor::output_count)
                    .attribute(count("Number of messages processed")),
            )
            .method(
                Method::getter("get_output_latest", ProcessingMonitor::output_latest)
                    .attribute(AttributeMarker::new("Time of the latest message processed")),
            )
            .method(
                Method::getter("get_output_latest_age_seconds", ProcessingMonitor::output_age)
                    .attribute(gauge("Time since the latest message processed", "seconds")),
            )
            .method(
                Method::getter("get_duration_latest_millis", ProcessingMonitor::duration_last)
                    .attribute(gauge("Processing time of the latest message", "milliseconds")),
            )
            .method(
                Method::getter("get_duration_min_millis", ProcessingMonitor::duration_min)
                    .attribute(gauge("Shortest processing time", "milliseconds")),
            )
            .method(
                Method::getter("get_duration_max_millis", ProcessingMonitor::duration_max)
                    .attribute(gauge("Longest processing time", "milliseconds")),
            )
            .method(
                Method::getter("get_duration_total_millis", ProcessingMonitor::duration_total)
                    .attribute(count("Total processing time").units("milliseconds")),
            )
            .method(
                Method::getter("get_duration_average_millis", ProcessingMonitor::duration_average)
                    .attribute(gauge("Average processing time", "milliseconds")),
            )
            .method(
                Method::getter("get_failed_count", ProcessingMonitor::failed_count)
                    .attribute(count("Number of messages that failed")),
            )
            .method(
                Method::getter("get_failed_latest", ProcessingMonitor::failed_latest)
                    .attribute(AttributeMarker::new("Time of the latest failure")),
            )
            .method(
                Method::getter("get_failed_latest_age_seconds", ProcessingMonitor::failed_age)
                    .attribute(gauge("Time since the latest failure", "seconds")),
            )
            .method(
                Method::getter("get_failed_latest_reason", ProcessingMonitor::failed_reason)
                    .attribute(AttributeMarker::new("Reason of the latest failure")),
            )
            .method(
                Method::getter("get_failed_latest_causes", ProcessingMonitor::failed_chain)
                    .attribute(AttributeMarker::new("Error chain of the latest failure, outermost first")),
            )
            .method(
                Method::action("reset", ProcessingMonitor::reset)
                    .operation(OperationMarker::new("Clears the statistics").impact(Impact::Action)),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::{Directory, ValueType};

    #[test]
    fn test_inherits_started_and_overrides_reset() {
        let directory = Directory::<ProcessingMonitor>::of().unwrap();
        let info = directory.info();

        assert_eq!(info.type_name, "ProcessingMonitor");
        assert_eq!(info.operation_names(), vec!["reset"]);
        assert_eq!(info.operation("reset").unwrap().description, "Clears the statistics");

        let started = info.attribute("started").unwrap();
        assert_eq!(started.value_type, ValueType::Text);
        assert!(!started.is_writable());

        let causes = info.attribute("failed_latest_causes").unwrap();
        assert_eq!(causes.value_type, ValueType::TextList);
        assert_eq!(info.attributes.len(), 17);
    }
}
