//! Tick synchronization gate
//!
//! A single-producer/single-consumer handoff which lets the periodic sample
//! producer notify the control loop that a fresh sample is ready. The sample
//! itself is carried through the gate by value, so producer and consumer
//! never alias the same data.
//!
//! The gate has capacity for exactly one pending sample. At matched producer
//! and consumer rates at most one sample is ever outstanding; a full slot on
//! `signal` therefore indicates the consumer has fallen behind, and is
//! counted as an overrun rather than silently absorbed.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{
    sync_channel, Receiver, RecvTimeoutError, SyncSender, TrySendError,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Producer half of the gate. Held by the sampler thread.
pub struct TickSender<T> {
    sender: SyncSender<T>,
    overruns: Arc<AtomicU64>,
}

/// Consumer half of the gate. Held by the control loop.
pub struct TickReceiver<T> {
    receiver: Receiver<T>,
    overruns: Arc<AtomicU64>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while waiting on the gate.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("The producer side of the gate has disconnected")]
    Disconnected,

    #[error("No sample arrived within the watchdog window of {0:?}")]
    Timeout(Duration),
}

/// Outcome of a `signal` call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SignalResult {
    /// The sample was accepted and is pending for the consumer.
    Accepted,

    /// The previous sample was still pending, the new one was dropped.
    Overrun,

    /// The consumer side of the gate is gone.
    Disconnected,
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Create a new gate, returning the producer and consumer halves.
pub fn tick_gate<T>() -> (TickSender<T>, TickReceiver<T>) {
    let (sender, receiver) = sync_channel(1);
    let overruns = Arc::new(AtomicU64::new(0));

    (
        TickSender {
            sender,
            overruns: overruns.clone(),
        },
        TickReceiver { receiver, overruns },
    )
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<T> TickSender<T> {
    /// Signal the consumer that a new sample is ready, handing it over.
    ///
    /// Never blocks, making it safe to call from the time-critical producer
    /// context. If the previous sample has not yet been consumed the new one
    /// is dropped and the overrun counter incremented.
    pub fn signal(&self, sample: T) -> SignalResult {
        match self.sender.try_send(sample) {
            Ok(_) => SignalResult::Accepted,
            Err(TrySendError::Full(_)) => {
                self.overruns.fetch_add(1, Ordering::Relaxed);
                SignalResult::Overrun
            }
            // Consumer gone, nothing left to do with the sample
            Err(TrySendError::Disconnected(_)) => SignalResult::Disconnected,
        }
    }
}

impl<T> TickReceiver<T> {
    /// Block until the next sample arrives.
    pub fn wait(&self) -> Result<T, GateError> {
        self.receiver.recv().map_err(|_| GateError::Disconnected)
    }

    /// Block until the next sample arrives, or until the watchdog window
    /// expires.
    pub fn wait_timeout(&self, window: Duration) -> Result<T, GateError> {
        self.receiver.recv_timeout(window).map_err(|e| match e {
            RecvTimeoutError::Timeout => GateError::Timeout(window),
            RecvTimeoutError::Disconnected => GateError::Disconnected,
        })
    }

    /// Total number of samples dropped because the consumer had not yet
    /// drained the previous one.
    pub fn overruns(&self) -> u64 {
        self.overruns.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
