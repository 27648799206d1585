use crate::managed_client;
use crate::processing_bean::ProcessingError;

managed_client! {
    /// Client for a processing monitor.
    pub struct ProcessingClient for "ProcessingApi" {
        error: ProcessingError;
        read started: Option<String>;
        read input_count: i64;
        read output_count: i64;
        read failed_count: i64;
        read output_latest: Option<String>;
        read duration_latest_millis: Option<i64>;
        read duration_average_millis: Option<i64>;
        read duration_total_millis: i64;
        read failed_latest_reason: Option<String>;
        read failed_latest_causes: Option<Vec<String>>;
        invoke reset() -> ();
    }
}
