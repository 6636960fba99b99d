//! Processor lifecycle.
//!
//! Every processor moves between three states. A batch (an upload, or an
//! archive export for videos) may only start from `Idle` or `Error`; it
//! leaves the processor `BatchInFlight` until it settles.

use crate::error::{MediaError, Result};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProcessorState {
    #[default]
    Idle,
    BatchInFlight,
    /// The last batch failed; the message is the error it failed with.
    Error(String),
}

impl ProcessorState {
    pub fn is_busy(&self) -> bool {
        matches!(self, ProcessorState::BatchInFlight)
    }

    /// Transition on batch start.
    pub fn begin_batch(&mut self) -> Result<()> {
        if self.is_busy() {
            return Err(MediaError::BatchInFlight);
        }
        *self = ProcessorState::BatchInFlight;
        Ok(())
    }

    /// Transition on batch settle.
    pub fn settle<T>(&mut self, outcome: &Result<T>) {
        *self = match outcome {
            Ok(_) => ProcessorState::Idle,
            Err(e) => ProcessorState::Error(e.to_string()),
        };
    }

    /// Return to `Idle` regardless of outcome.
    pub fn finish(&mut self) {
        *self = ProcessorState::Idle;
    }

    /// Leave an error state; a batch in flight is left alone.
    pub fn clear_error(&mut self) {
        if let ProcessorState::Error(_) = self {
            *self = ProcessorState::Idle;
        }
    }
}

impl fmt::Display for ProcessorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessorState::Idle => write!(f, "idle"),
            ProcessorState::BatchInFlight => write!(f, "batch in flight"),
            ProcessorState::Error(msg) => write!(f, "error: {}", msg),
        }
    }
}

/// Busy flag a processor shares with observers on other threads, such as a
/// progress indicator. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct BusyIndicator(Arc<AtomicBool>);

impl BusyIndicator {
    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn set(&self, busy: bool) {
        self.0.store(busy, Ordering::Release);
    }
}

/// A processor's state plus the indicator mirroring it.
#[derive(Debug, Default)]
pub struct Lifecycle {
    state: ProcessorState,
    indicator: BusyIndicator,
}

impl Lifecycle {
    pub fn state(&self) -> &ProcessorState {
        &self.state
    }

    pub fn indicator(&self) -> BusyIndicator {
        self.indicator.clone()
    }

    /// Starts a batch and returns the state it started from.
    pub fn begin_batch(&mut self) -> Result<ProcessorState> {
        let previous = self.state.clone();
        self.state.begin_batch()?;
        self.sync();
        Ok(previous)
    }

    pub fn settle<T>(&mut self, outcome: &Result<T>) {
        self.state.settle(outcome);
        self.sync();
    }

    pub fn finish(&mut self) {
        self.state.finish();
        self.sync();
    }

    /// Puts back a state returned by [`Lifecycle::begin_batch`].
    pub fn restore(&mut self, previous: ProcessorState) {
        self.state = previous;
        self.sync();
    }

    pub fn clear_error(&mut self) {
        self.state.clear_error();
        self.sync();
    }

    fn sync(&self) {
        self.indicator.set(self.state.is_busy());
    }
}
