//! Operator trait and base types.

use super::Record;
use crate::{Error, Result};

/// The state of an operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OperatorState {
    /// Not opened yet, or closed.
    #[default]
    Closed,
    /// Ready to produce records.
    Open,
}

impl OperatorState {
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Pull-based execution operator.
///
/// # Lifecycle
///
/// 1. `open()` prepares cursors and opens children. Idempotent.
/// 2. `next()` yields records; `Ok(None)` marks end-of-stream and keeps
///    being returned until `reset()` or `close()` + `open()`.
/// 3. `reset()` re-opens the operator and its children for a new outer input,
///    whether they were exhausted or closed.
/// 4. `close()` releases cursor state and closes children.
///
/// Calling `next()` on a closed operator is protocol misuse and fails with
/// [`Error::ExecutionError`].
///
/// `Send` so a tree can move between threads; operators are never shared.
pub trait Operator: Send {
    fn open(&mut self) -> Result<()>;

    fn next(&mut self) -> Result<Option<Record>>;

    fn close(&mut self) -> Result<()>;

    fn reset(&mut self) -> Result<()>;

    fn state(&self) -> OperatorState;

    /// Monotonic work counter. Survives `reset` and `close`.
    fn vertices_processed(&self) -> u64;

    fn name(&self) -> &'static str;
}

/// A boxed operator for dynamic dispatch.
pub type BoxedOperator = Box<dyn Operator>;

/// State shared by every operator.
#[derive(Debug)]
pub struct OperatorBase {
    name: &'static str,
    state: OperatorState,
    exhausted: bool,
    vertices_processed: u64,
}

impl OperatorBase {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self { name, state: OperatorState::Closed, exhausted: false, vertices_processed: 0 }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn state(&self) -> OperatorState {
        self.state
    }

    pub fn set_open(&mut self) {
        tracing::trace!(operator = self.name, "open");
        self.state = OperatorState::Open;
        self.exhausted = false;
    }

    pub fn set_closed(&mut self) {
        tracing::trace!(operator = self.name, processed = self.vertices_processed, "close");
        self.state = OperatorState::Closed;
        self.exhausted = false;
    }

    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn set_exhausted(&mut self) {
        self.exhausted = true;
    }

    /// Re-opens for a restart and clears end-of-stream; the counter is kept.
    pub fn reset(&mut self) {
        tracing::trace!(operator = self.name, "reset");
        self.state = OperatorState::Open;
        self.exhausted = false;
    }

    pub fn add_vertices_processed(&mut self, n: u64) {
        self.vertices_processed += n;
    }

    #[must_use]
    pub const fn vertices_processed(&self) -> u64 {
        self.vertices_processed
    }

    /// Guard at the top of `next()`.
    ///
    /// `Ok(false)` means the stream already ended and `Ok(None)` must be returned.
    pub fn begin_next(&self) -> Result<bool> {
        if !self.state.is_open() {
            return Err(Error::ExecutionError(format!("{}: next() called while closed", self.name)));
        }
        Ok(!self.exhausted)
    }

    /// Mark end-of-stream and return it.
    pub fn finish(&mut self) -> Result<Option<Record>> {
        self.exhausted = true;
        Ok(None)
    }
}
