//! Limit operator for range selection.

use crate::execution::operator::{BoxedOperator, Operator, OperatorBase, OperatorState};
use crate::execution::Record;
use crate::Result;

/// Limit operator.
///
/// Skips the first `offset` records and returns at most `limit` records.
pub struct LimitOp {
    base: OperatorBase,
    limit: Option<usize>,
    offset: usize,
    input: BoxedOperator,
    skipped: usize,
    returned: usize,
}

impl LimitOp {
    #[must_use]
    pub fn new(limit: Option<usize>, offset: Option<usize>, input: BoxedOperator) -> Self {
        Self {
            base: OperatorBase::new("Limit"),
            limit,
            offset: offset.unwrap_or(0),
            input,
            skipped: 0,
            returned: 0,
        }
    }

    #[must_use]
    pub fn limit(limit: usize, input: BoxedOperator) -> Self {
        Self::new(Some(limit), None, input)
    }

    /// Records `low..high`, zero-based.
    #[must_use]
    pub fn range(low: usize, high: usize, input: BoxedOperator) -> Self {
        Self::new(Some(high.saturating_sub(low)), Some(low), input)
    }
}

impl Operator for LimitOp {
    fn open(&mut self) -> Result<()> {
        if self.base.state().is_open() {
            return Ok(());
        }
        self.input.open()?;
        self.skipped = 0;
        self.returned = 0;
        self.base.set_open();
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Record>> {
        if !self.base.begin_next()? {
            return Ok(None);
        }
        if self.limit.is_some_and(|limit| self.returned >= limit) {
            return self.base.finish();
        }

        while let Some(record) = self.input.next()? {
            self.base.add_vertices_processed(1);
            if self.skipped < self.offset {
                self.skipped += 1;
                continue;
            }
            self.returned += 1;
            return Ok(Some(record));
        }
        self.base.finish()
    }

    fn close(&mut self) -> Result<()> {
        self.input.close()?;
        self.base.set_closed();
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.input.reset()?;
        self.skipped = 0;
        self.returned = 0;
        self.base.reset();
        Ok(())
    }

    fn state(&self) -> OperatorState {
        self.base.state()
    }

    fn vertices_processed(&self) -> u64 {
        self.base.vertices_processed()
    }

    fn name(&self) -> &'static str {
        self.base.name()
    }
}
