use managed_recipe::clients::{CounterClient, ProcessingClient, Route, ServiceClient};
use managed_recipe::counter_bean::CounterError;
use managed_recipe::framework::mock::{Call, MockAccess};
use managed_recipe::framework::{
    ContainerMarker, DispatchError, Dispatcher, ManagedAccess, Managed, MemberKind, Method,
    OperationMarker, TypeModel, Value,
};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use managed_recipe::model::{Counter, ProcessingMonitor, Service};
use managed_recipe::processing_bean::ProcessingError;
use managed_recipe::service_bean::ServiceError;

/// Typed counter client against a scripted access.
/// Checks that each interface method reaches the right member with the right arguments.
#[test]
fn test_counter_client_with_mock() {
    let mock = MockAccess::for_managed::<Counter>().expect("Counter directory");

    mock.expect_write("value").with_value(Value::Int(10)).return_ok();
    mock.expect_read("value").return_ok(Value::Int(10));
    mock.expect_invoke("increment").return_ok(Value::Int(15));
    mock.expect_invoke("reset").return_ok(Value::Unit);

    let client = CounterClient::new(mock.access());
    client.set_value(10).unwrap();
    assert_eq!(client.get_value().unwrap(), 10);
    assert_eq!(client.increment(5).unwrap(), 15);
    client.reset().unwrap();

    assert_eq!(
        mock.calls(),
        vec![
            Call::Write("value".into(), Value::Int(10)),
            Call::Read("value".into()),
            Call::Invoke("increment".into(), vec![Value::Int(5)]),
            Call::Invoke("reset".into(), vec![]),
        ]
    );
    mock.verify();
}

#[test]
fn test_counter_client_maps_errors() {
    let mock = MockAccess::for_managed::<Counter>().unwrap();
    mock.expect_invoke("increment").return_err(DispatchError::InvocationFailure {
        member: "increment".into(),
        source: Box::new(CounterError::Overflow { value: i64::MAX, amount: 1 }),
    });
    mock.expect_read("value").return_ok(Value::from("not a number"));

    let client = CounterClient::new(mock.access());
    assert_eq!(
        client.increment(1).unwrap_err(),
        CounterError::ManagementError(
            "Invocation of increment failed: Counter overflow: 9223372036854775807 + 1".into()
        )
    );
    assert!(matches!(client.get_value(), Err(CounterError::ManagementError(msg)) if msg.contains("Type mismatch")));
    mock.verify();
}

#[test]
fn test_counter_routes() {
    let mock = MockAccess::for_managed::<Counter>().unwrap();
    let client = CounterClient::new(mock.access());

    use managed_recipe::clients::ManagedClient;
    let proxy = client.proxy();
    assert_eq!(proxy.route("get_value"), Some(&Route::Read("value".into())));
    assert_eq!(proxy.route("set_value"), Some(&Route::Write("value".into())));
    assert_eq!(proxy.route("increment"), Some(&Route::Invoke("increment".into())));
    assert_eq!(proxy.route("reset"), Some(&Route::Invoke("reset".into())));
    assert!(mock.calls().is_empty());
}

#[test]
fn test_service_client_with_mock() {
    let mock = MockAccess::for_managed::<Service>().unwrap();
    mock.expect_invoke("start").return_ok(Value::Unit);
    mock.expect_read("state").return_ok(Value::from("RUNNING"));
    mock.expect_invoke("stop").return_err(DispatchError::NotFound {
        kind: MemberKind::Operation,
        name: "stop".into(),
    });

    let client = ServiceClient::new(mock.access());
    client.start().unwrap();
    assert_eq!(client.get_state().unwrap(), "RUNNING");
    assert_eq!(
        client.stop().unwrap_err(),
        ServiceError::ManagementError("Operation not found: stop".into())
    );
    mock.verify();
}

#[test]
fn test_processing_client_with_mock() {
    let mock = MockAccess::for_managed::<ProcessingMonitor>().unwrap();
    mock.expect_read("input_count").return_ok(Value::Int(3));
    mock.expect_read("duration_average_millis").return_ok(Value::Null);
    mock.expect_read("failed_latest_causes")
        .return_ok(Value::TextList(vec!["outer".into(), "inner".into()]));
    mock.expect_invoke("reset").return_ok(Value::Unit);

    let client = ProcessingClient::new(mock.access());
    assert_eq!(client.get_input_count().unwrap(), 3);
    assert_eq!(client.get_duration_average_millis().unwrap(), None);
    assert_eq!(
        client.get_failed_latest_causes().unwrap(),
        Some(vec!["outer".to_string(), "inner".to_string()])
    );
    client.reset().unwrap();
    mock.verify();
}

/// A client declaring members the Directory lacks is built anyway and fails on use.
#[test]
fn test_unsupported_members_fail_on_call() {
    use managed_recipe::managed_client;

    managed_client! {
        struct StrayClient for "StrayApi" {
            error: ProcessingError;
            read value: i64;
            write input_count: i64;
            invoke flush(force: bool) -> ();
        }
    }

    let mock = MockAccess::for_managed::<ProcessingMonitor>().unwrap();
    let client = StrayClient::new(mock.access());

    // No operation `flush(bool)` exists, so nothing reaches the access.
    assert_eq!(
        client.flush(true).unwrap_err(),
        ProcessingError::ManagementError("Unsupported member: StrayApi.flush".into())
    );
    assert!(mock.calls().is_empty());

    // Accessors and mutators are routed by shape; the Directory has the last word.
    mock.expect_read("value").return_err(DispatchError::NotFound {
        kind: MemberKind::Readable,
        name: "value".into(),
    });
    mock.expect_write("input_count").return_err(DispatchError::NotFound {
        kind: MemberKind::Writable,
        name: "input_count".into(),
    });
    assert_eq!(
        client.get_value().unwrap_err(),
        ProcessingError::ManagementError("Readable attribute not found: value".into())
    );
    assert_eq!(
        client.set_input_count(1).unwrap_err(),
        ProcessingError::ManagementError("Writable attribute not found: input_count".into())
    );
    assert_eq!(mock.calls().len(), 2);
    mock.verify();
}

#[derive(Default)]
struct Window {
    low: AtomicI64,
    high: AtomicI64,
}

impl Managed for Window {
    fn model() -> TypeModel<Self> {
        TypeModel::for_type()
            .container(ContainerMarker::new("A value window"))
            .method(
                Method::call2("set_range", |w: &Window, low: i64, high: i64| {
                    w.low.store(low, Ordering::SeqCst);
                    w.high.store(high, Ordering::SeqCst);
                    Ok::<_, ProcessingError>(())
                })
                .operation(OperationMarker::new("Sets both bounds")),
            )
    }
}

/// A `set_*` method taking two arguments is an operation, not a write.
#[test]
fn test_two_argument_setter_is_invoked() {
    use managed_recipe::clients::ManagedClient;
    use managed_recipe::managed_client;

    managed_client! {
        struct WindowClient for "WindowApi" {
            error: ProcessingError;
            invoke set_range(low: i64, high: i64) -> ();
        }
    }

    let window = Arc::new(Window::default());
    let access: Arc<dyn ManagedAccess> =
        Arc::new(Dispatcher::for_instance(Arc::clone(&window)).unwrap());
    let client = WindowClient::new(access);

    assert_eq!(
        client.proxy().route("set_range"),
        Some(&Route::Invoke("set_range".into()))
    );
    client.set_range(3, 9).unwrap();
    assert_eq!(window.low.load(Ordering::SeqCst), 3);
    assert_eq!(window.high.load(Ordering::SeqCst), 9);
}
