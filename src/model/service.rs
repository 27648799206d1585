//! A service with a managed lifecycle.
//!
//! # State Machine
//!
//! ```text
//! NEW ──start──▶ STARTED ──▶ RUNNING ──pause──▶ PAUSED
//!                               ▲  ◀──resume──    │
//!   STOPPED ◀──────stop─────────┴─────────────────┘
//!   STOPPED ──start──▶ STARTED
//!   any but TERMINATED ──terminate──▶ TERMINATED
//!   any but TERMINATED ──fail──▶ FAILED
//! ```
//!
//! Every transition is a compare-and-set on one atomic, so management callers
//! and the application can drive the same service concurrently.
use crate::service_bean::ServiceError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum ServiceState {
    New = 0,
    Started = 1,
    Running = 2,
    Paused = 3,
    Stopped = 4,
    Failed = 5,
    Terminated = 6,
}

impl ServiceState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => ServiceState::New,
            1 => ServiceState::Started,
            2 => ServiceState::Running,
            3 => ServiceState::Paused,
            4 => ServiceState::Stopped,
            5 => ServiceState::Failed,
            _ => ServiceState::Terminated,
        }
    }
}

impl Display for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ServiceState::New => "NEW",
            ServiceState::Started => "STARTED",
            ServiceState::Running => "RUNNING",
            ServiceState::Paused => "PAUSED",
            ServiceState::Stopped => "STOPPED",
            ServiceState::Failed => "FAILED",
            ServiceState::Terminated => "TERMINATED",
        };
        f.write_str(name)
    }
}

const NOT_TERMINATED: [ServiceState; 6] = [
    ServiceState::New,
    ServiceState::Started,
    ServiceState::Running,
    ServiceState::Paused,
    ServiceState::Stopped,
    ServiceState::Failed,
];

#[derive(Debug)]
pub struct Service {
    name: String,
    state: AtomicU8,
}

impl Service {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: AtomicU8::new(ServiceState::New as u8),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> ServiceState {
        ServiceState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn transition(
        &self,
        action: &'static str,
        from: &[ServiceState],
        to: ServiceState,
    ) -> Result<(), ServiceError> {
        let mut current = self.state.load(Ordering::Acquire);
        loop {
            let state = ServiceState::from_u8(current);
            if !from.contains(&state) {
                return Err(ServiceError::IllegalTransition { action, state });
            }
            match self
                .state
                .compare_exchange(current, to as u8, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return Ok(()),
                Err(actual) => current = actual,
            }
        }
    }

    /// NEW or STOPPED to RUNNING, passing through STARTED.
    pub fn start(&self) -> Result<(), ServiceError> {
        self.transition("start", &[ServiceState::New, ServiceState::Stopped], ServiceState::Started)?;
        self.transition("start", &[ServiceState::Started], ServiceState::Running)
    }

    pub fn pause(&self) -> Result<(), ServiceError> {
        self.transition("pause", &[ServiceState::Running], ServiceState::Paused)
    }

    pub fn resume(&self) -> Result<(), ServiceError> {
        self.transition("resume", &[ServiceState::Paused], ServiceState::Running)
    }

    pub fn stop(&self) -> Result<(), ServiceError> {
        self.transition("stop", &[ServiceState::Running, ServiceState::Paused], ServiceState::Stopped)
    }

    pub fn terminate(&self) -> Result<(), ServiceError> {
        self.transition("terminate", &NOT_TERMINATED, ServiceState::Terminated)
    }

    /// Application-side failure report. Not exposed to management callers.
    pub fn fail(&self) -> Result<(), ServiceError> {
        self.transition("fail", &NOT_TERMINATED, ServiceState::Failed)
    }
}
