use crate::framework::{AttributeMarker, ContainerMarker, Managed, Method, TypeModel};
use crate::model::Service;

/// The lifecycle methods carry no markers; the container exposes them as
/// operations automatically. `fail` is application-only and is not declared.
impl Managed for Service {
    fn model() -> TypeModel<Self> {
        TypeModel::for_type()
            .container(ContainerMarker::new("A service with a managed lifecycle").automatic_operations())
            .method(
                Method::getter("get_state", |s: &Service| s.state().to_string())
                    .attribute(AttributeMarker::new("The lifecycle state")),
            )
            .method(
                Method::getter("get_name", |s: &Service| s.name().to_string())
                    .attribute(AttributeMarker::new("The service name")),
            )
            .method(Method::call0("start", Service::start))
            .method(Method::call0("pause", Service::pause))
            .method(Method::call0("resume", Service::resume))
            .method(Method::call0("stop", Service::stop))
            .method(Method::call0("terminate", Service::terminate))
    }
}
