use crate::managed_client;
use crate::service_bean::ServiceError;

managed_client! {
    /// Client for a managed service.
    ///
    /// Lifecycle operations return `()`; an illegal transition comes back as
    /// [`ServiceError::ManagementError`] carrying the service's own message.
    pub struct ServiceClient for "ServiceApi" {
        error: ServiceError;
        read state: String;
        read name: String;
        invoke start() -> ();
        invoke pause() -> ();
        invoke resume() -> ();
        invoke stop() -> ();
        invoke terminate() -> ();
    }
}
