//! Single-flight guard for submission and cancellation.
//!
//! The desk serializes transaction-producing operations: while one
//! submission or cancellation is outstanding, a second attempt fails
//! fast with `AlreadyInFlight` instead of racing it on-chain. The
//! permit releases on drop, so every exit path (success, error, panic
//! unwind) frees the slot.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::error::DeskError;

/// A one-slot permit gate shared by the orchestrators.
#[derive(Debug, Default)]
pub struct SingleFlight {
    busy: AtomicBool,
}

impl SingleFlight {
    pub const fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
        }
    }

    /// Acquires the slot, or fails with `AlreadyInFlight`.
    pub fn acquire(&self) -> Result<FlightPermit<'_>, DeskError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Acquire)
            .is_ok()
        {
            Ok(FlightPermit { flag: &self.busy })
        } else {
            Err(DeskError::AlreadyInFlight)
        }
    }

    /// Whether an operation currently holds the slot.
    pub fn in_flight(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// RAII permit; dropping it frees the slot.
#[derive(Debug)]
pub struct FlightPermit<'a> {
    flag: &'a AtomicBool,
}

impl Drop for FlightPermit<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
