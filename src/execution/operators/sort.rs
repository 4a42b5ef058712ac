//! Order operator.

use std::collections::VecDeque;

use crate::execution::operator::{BoxedOperator, Operator, OperatorBase, OperatorState};
use crate::execution::Record;
use crate::Result;

use super::field;

/// Blocking sort on one column via [`Value::compare`](crate::Value::compare).
///
/// The sort is stable: ties keep their input order.
pub struct OrderOp {
    base: OperatorBase,
    input: BoxedOperator,
    column: usize,
    descending: bool,
    sorted: Option<VecDeque<Record>>,
}

impl OrderOp {
    #[must_use]
    pub fn new(input: BoxedOperator, column: usize) -> Self {
        Self { base: OperatorBase::new("Order"), input, column, descending: false, sorted: None }
    }

    #[must_use]
    pub fn descending(mut self) -> Self {
        self.descending = true;
        self
    }

    fn materialize(&mut self) -> Result<VecDeque<Record>> {
        let mut records = Vec::new();
        while let Some(record) = self.input.next()? {
            field(&record, self.column, self.base.name())?;
            records.push(record);
        }
        self.base.add_vertices_processed(records.len() as u64);

        let (column, descending) = (self.column, self.descending);
        records.sort_by(|a, b| {
            let ordering = match (a.get(column), b.get(column)) {
                (Some(x), Some(y)) => x.compare(y),
                _ => std::cmp::Ordering::Equal,
            };
            if descending { ordering.reverse() } else { ordering }
        });
        Ok(records.into())
    }
}

impl Operator for OrderOp {
    fn open(&mut self) -> Result<()> {
        if self.base.state().is_open() {
            return Ok(());
        }
        self.input.open()?;
        self.sorted = None;
        self.base.set_open();
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Record>> {
        if !self.base.begin_next()? {
            return Ok(None);
        }
        if self.sorted.is_none() {
            self.sorted = Some(self.materialize()?);
        }
        match self.sorted.as_mut().and_then(VecDeque::pop_front) {
            Some(record) => Ok(Some(record)),
            None => self.base.finish(),
        }
    }

    fn close(&mut self) -> Result<()> {
        self.input.close()?;
        self.sorted = None;
        self.base.set_closed();
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.input.reset()?;
        self.sorted = None;
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
