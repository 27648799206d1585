use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::RwLock;

/// State shared by every monitor: its name and when it was started.
#[derive(Debug)]
pub struct MonitorBase {
    name: String,
    started: RwLock<Option<DateTime<Utc>>>,
}

impl MonitorBase {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            started: RwLock::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Marks the monitor as started now.
    pub fn start(&self) {
        *self.started.write() = Some(Utc::now());
    }

    /// RFC 3339 start time, if started.
    pub fn started(&self) -> Option<String> {
        self.started.read().map(timestamp)
    }
}

/// Implemented by every type whose model extends the monitor base model.
pub trait Monitored: Send + Sync + 'static {
    fn monitor(&self) -> &MonitorBase;
}

pub(crate) fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Whole seconds elapsed since `at`.
pub(crate) fn age_seconds(at: DateTime<Utc>) -> i64 {
    (Utc::now() - at).num_seconds()
}
