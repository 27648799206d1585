//! Message-processing statistics for a component that receives input, produces
//! output and sometimes fails.
//!
//! The application calls the `notify_*` methods; management callers read the
//! derived figures. All counters live behind one lock so that a reader never
//! sees an output counted without its duration.
use super::monitor::{age_seconds, timestamp, MonitorBase, Monitored};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::error::Error;

#[derive(Debug, Default, Clone)]
struct Stats {
    input_count: i64,
    output_count: i64,
    failed_count: i64,
    input_latest: Option<DateTime<Utc>>,
    output_latest: Option<DateTime<Utc>>,
    failed_latest: Option<DateTime<Utc>>,
    duration_last: Option<i64>,
    duration_min: Option<i64>,
    duration_max: Option<i64>,
    duration_total: i64,
    failed_reason: Option<String>,
    failed_chain: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ProcessingMonitor {
    base: MonitorBase,
    stats: Mutex<Stats>,
}

impl Monitored for ProcessingMonitor {
    fn monitor(&self) -> &MonitorBase {
        &self.base
    }
}

impl ProcessingMonitor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: MonitorBase::new(name),
            stats: Mutex::new(Stats::default()),
        }
    }

    pub fn name(&self) -> &str {
        self.base.name()
    }

    pub fn start(&self) {
        self.base.start();
    }

    /// Records that a message was received.
    pub fn notify_input(&self) {
        let mut stats = self.stats.lock();
        stats.input_count += 1;
        stats.input_latest = Some(Utc::now());
    }

    /// Records that a message was produced. The duration is measured from the
    /// latest input, or zero when no input was seen.
    pub fn notify_output(&self) {
        let now = Utc::now();
        let mut stats = self.stats.lock();
        let duration = stats
            .input_latest
            .map(|input| (now - input).num_milliseconds())
            .unwrap_or(0);
        Self::record_output(&mut stats, now, duration);
    }

    /// Records that a message was produced after `duration_ms` of processing.
    pub fn notify_output_duration(&self, duration_ms: i64) {
        let mut stats = self.stats.lock();
        Self::record_output(&mut stats, Utc::now(), duration_ms);
    }

    fn record_output(stats: &mut Stats, at: DateTime<Utc>, duration_ms: i64) {
        let duration = duration_ms.max(0);
        stats.output_count += 1;
        stats.output_latest = Some(at);
        stats.duration_last = Some(duration);
        stats.duration_min = Some(stats.duration_min.map_or(duration, |min| min.min(duration)));
        stats.duration_max = Some(stats.duration_max.map_or(duration, |max| max.max(duration)));
        stats.duration_total = stats.duration_total.saturating_add(duration);
    }

    /// Records a failed message. The error and its `source()` chain become
    /// the latest failure reason.
    pub fn notify_failed(&self, cause: Option<&(dyn Error + 'static)>) {
        let mut stats = self.stats.lock();
        stats.failed_count += 1;
        stats.failed_latest = Some(Utc::now());
        stats.failed_reason = cause.map(|e| e.to_string());
        stats.failed_chain = cause.map(|e| {
            std::iter::successors(Some(e), |&e| e.source())
                .map(|e| e.to_string())
                .collect()
        });
    }

    /// Clears the statistics. The start time is kept.
    pub fn reset(&self) {
        *self.stats.lock() = Stats::default();
    }

    pub fn input_count(&self) -> i64 {
        self.stats.lock().input_count
    }

    pub fn output_count(&self) -> i64 {
        self.stats.lock().output_count
    }

    pub fn failed_count(&self) -> i64 {
        self.stats.lock().failed_count
    }

    pub fn input_latest(&self) -> Option<String> {
        self.stats.lock().input_latest.map(timestamp)
    }

    pub fn output_latest(&self) -> Option<String> {
        self.stats.lock().output_latest.map(timestamp)
    }

    pub fn failed_latest(&self) -> Option<String> {
        self.stats.lock().failed_latest.map(timestamp)
    }

    pub fn input_age(&self) -> Option<i64> {
        self.stats.lock().input_latest.map(age_seconds)
    }

    pub fn output_age(&self) -> Option<i64> {
        self.stats.lock().output_latest.map(age_seconds)
    }

    pub fn failed_age(&self) -> Option<i64> {
        self.stats.lock().failed_latest.map(age_seconds)
    }

    pub fn duration_last(&self) -> Option<i64> {
        self.stats.lock().duration_last
    }

    pub fn duration_min(&self) -> Option<i64> {
        self.stats.lock().duration_min
    }

    pub fn duration_max(&self) -> Option<i64> {
        self.stats.lock().duration_max
    }

    pub fn duration_total(&self) -> i64 {
        self.stats.lock().duration_total
    }

    /// Mean output duration; `None` until the first output.
    pub fn duration_average(&self) -> Option<i64> {
        let stats = self.stats.lock();
        (stats.output_count > 0).then(|| stats.duration_total / stats.output_count)
    }

    pub fn failed_reason(&self) -> Option<String> {
        self.stats.lock().failed_reason.clone()
    }

    pub fn failed_chain(&self) -> Option<Vec<String>> {
        self.stats.lock().failed_chain.clone()
    }
}
