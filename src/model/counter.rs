//! A shared counter, safe to update from the application and from management
//! callers at the same time.
//!
//! # Management
//! This struct implements the [`Managed`](crate::framework::Managed) trait,
//! exposing `value` as a read/write attribute and `increment`/`reset` as
//! operations. See [`counter_bean`](crate::counter_bean).
use crate::counter_bean::CounterError;
use std::sync::atomic::{AtomicI64, Ordering};

#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicI64,
}

impl Counter {
    pub fn new(initial: i64) -> Self {
        Self {
            value: AtomicI64::new(initial),
        }
    }

    pub fn value(&self) -> i64 {
        self.value.load(Ordering::SeqCst)
    }

    pub fn set_value(&self, value: i64) {
        self.value.store(value, Ordering::SeqCst);
    }

    /// Adds `amount` and returns the new value. Fails instead of wrapping.
    pub fn increment(&self, amount: i64) -> Result<i64, CounterError> {
        let mut current = self.value.load(Ordering::SeqCst);
        loop {
            let next = current
                .checked_add(amount)
                .ok_or(CounterError::Overflow { value: current, amount })?;
            match self
                .value
                .compare_exchange(current, next, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return Ok(next),
                Err(actual) => current = actual,
            }
        }
    }

    pub fn reset(&self) {
        self.value.store(0, Ordering::SeqCst);
    }
}
