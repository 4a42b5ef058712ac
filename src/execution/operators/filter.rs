//! Filter operator for predicate evaluation.

use std::cmp::Ordering;

use crate::execution::operator::{BoxedOperator, Operator, OperatorBase, OperatorState};
use crate::execution::Record;
use crate::model::Value;
use crate::Result;

/// Where a predicate reads a value from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// A whole record field.
    Column(usize),
    /// A named property of the value in a field (vertex, edge, mapping, composite).
    Property { column: usize, name: String },
    Constant(Value),
}

impl Operand {
    pub fn column(index: usize) -> Self {
        Operand::Column(index)
    }

    pub fn property(column: usize, name: impl Into<String>) -> Self {
        Operand::Property { column, name: name.into() }
    }

    pub fn constant(value: impl Into<Value>) -> Self {
        Operand::Constant(value.into())
    }

    /// `None` when the field or property does not exist.
    pub fn resolve(&self, record: &Record) -> Option<Value> {
        match self {
            Operand::Column(i) => record.get(*i).cloned(),
            Operand::Property { column, name } => record.get(*column)?.lookup(name),
            Operand::Constant(v) => Some(v.clone()),
        }
    }
}

/// Boolean condition over one record.
///
/// Comparisons use [`Value::compare`]; a side that does not resolve makes
/// the comparison false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Eq(Operand, Operand),
    Neq(Operand, Operand),
    Lt(Operand, Operand),
    Lte(Operand, Operand),
    Gt(Operand, Operand),
    Gte(Operand, Operand),
    Exists(Operand),
    NotExists(Operand),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn evaluate(&self, record: &Record) -> bool {
        let cmp = |a: &Operand, b: &Operand, accept: fn(Ordering) -> bool| {
            match (a.resolve(record), b.resolve(record)) {
                (Some(x), Some(y)) => accept(x.compare(&y)),
                _ => false,
            }
        };
        match self {
            Predicate::Eq(a, b) => cmp(a, b, Ordering::is_eq),
            Predicate::Neq(a, b) => cmp(a, b, Ordering::is_ne),
            Predicate::Lt(a, b) => cmp(a, b, Ordering::is_lt),
            Predicate::Lte(a, b) => cmp(a, b, Ordering::is_le),
            Predicate::Gt(a, b) => cmp(a, b, Ordering::is_gt),
            Predicate::Gte(a, b) => cmp(a, b, Ordering::is_ge),
            Predicate::Exists(a) => a.resolve(record).is_some(),
            Predicate::NotExists(a) => a.resolve(record).is_none(),
            Predicate::And(ps) => ps.iter().all(|p| p.evaluate(record)),
            Predicate::Or(ps) => ps.iter().any(|p| p.evaluate(record)),
            Predicate::Not(p) => !p.evaluate(record),
        }
    }
}

/// Filter operator.
///
/// Passes through only the records the predicate accepts.
pub struct FilterOp {
    base: OperatorBase,
    predicate: Predicate,
    input: BoxedOperator,
}

impl FilterOp {
    #[must_use]
    pub fn new(predicate: Predicate, input: BoxedOperator) -> Self {
        Self { base: OperatorBase::new("Filter"), predicate, input }
    }

    #[must_use]
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }
}

impl Operator for FilterOp {
    fn open(&mut self) -> Result<()> {
        if self.base.state().is_open() {
            return Ok(());
        }
        self.input.open()?;
        self.base.set_open();
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Record>> {
        if !self.base.begin_next()? {
            return Ok(None);
        }
        while let Some(record) = self.input.next()? {
            self.base.add_vertices_processed(1);
            if self.predicate.evaluate(&record) {
                return Ok(Some(record));
            }
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
