//! Dedup operator.

use hashbrown::HashSet;

use crate::execution::operator::{BoxedOperator, Operator, OperatorBase, OperatorState};
use crate::execution::Record;
use crate::model::Value;
use crate::Result;

use super::field;

/// Drops records whose key was already seen.
///
/// The key is one column, or the whole record when no column is given.
/// Keys compare structurally, so two vertices with the same id collapse.
/// `reset()` forgets what was seen.
pub struct DedupOp {
    base: OperatorBase,
    input: BoxedOperator,
    column: Option<usize>,
    seen: HashSet<Value>,
}

impl DedupOp {
    #[must_use]
    pub fn new(input: BoxedOperator) -> Self {
        Self { base: OperatorBase::new("Dedup"), input, column: None, seen: HashSet::new() }
    }

    #[must_use]
    pub fn on_column(input: BoxedOperator, column: usize) -> Self {
        Self { column: Some(column), ..Self::new(input) }
    }

    fn key(&self, record: &Record) -> Result<Value> {
        match self.column {
            Some(column) => Ok(field(record, column, self.base.name())?.clone()),
            None => Ok(Value::Collection(record.iter().cloned().collect())),
        }
    }
}

impl Operator for DedupOp {
    fn open(&mut self) -> Result<()> {
        if self.base.state().is_open() {
            return Ok(());
        }
        self.input.open()?;
        self.seen.clear();
        self.base.set_open();
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Record>> {
        if !self.base.begin_next()? {
            return Ok(None);
        }
        while let Some(record) = self.input.next()? {
            self.base.add_vertices_processed(1);
            let key = self.key(&record)?;
            if self.seen.insert(key) {
                return Ok(Some(record));
            }
        }
        self.base.finish()
    }

    fn close(&mut self) -> Result<()> {
        self.input.close()?;
        self.seen.clear();
        self.base.set_closed();
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.input.reset()?;
        self.seen.clear();
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
