//! [`Managed`] implementation for [`Counter`].
//!
//! The attribute marker sits on the `value` field, so `get_value` and
//! `set_value` are plain methods that the resolver pairs with it.

use crate::framework::{
    AttributeMarker, ContainerMarker, Field, Impact, Managed, Method, MetricType, OperationMarker,
    ParameterMarker, TypeModel,
};
use crate::model::Counter;

/// Default object name of a counter registered without an explicit one.
pub const OBJECT_NAME: &str = "demo:type=Counter,name=counter";

impl Managed for Counter {
    fn model() -> TypeModel<Self> {
        TypeModel::for_type()
            .container(ContainerMarker::new("A shared counter").object_name(OBJECT_NAME))
            .field(
                Field::new("value")
                    .attribute(AttributeMarker::read_write("The current value").metric(MetricType::Counter)),
            )
            .method(Method::getter("get_value", Counter::value))
            .method(Method::setter("set_value", Counter::set_value))
            .method(
                Method::call1("increment", Counter::increment)
                    .operation(
                        OperationMarker::new("Adds to the value and returns the result")
                            .impact(Impact::ActionInfo),
                    )
                    .parameter(0, ParameterMarker::new("amount", "The amount to add")),
            )
            .method(
                Method::action("reset", Counter::reset)
                    .operation(OperationMarker::new("Sets the value to zero").impact(Impact::Action)),
            )
    }
}
