//! Projection operators: property values, composites, column selection.

use crate::execution::operator::{BoxedOperator, Operator, OperatorBase, OperatorState};
use crate::execution::Record;
use crate::model::{Composite, Mapping, Value};
use crate::Result;

use super::field;

// ============================================================================
// ValuesOp
// ============================================================================

/// Appends one named property of a column. Records without it are dropped.
pub struct ValuesOp {
    base: OperatorBase,
    input: BoxedOperator,
    column: usize,
    property: String,
}

impl ValuesOp {
    #[must_use]
    pub fn new(input: BoxedOperator, column: usize, property: impl Into<String>) -> Self {
        Self { base: OperatorBase::new("Values"), input, column, property: property.into() }
    }
}

impl Operator for ValuesOp {
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
        while let Some(mut record) = self.input.next()? {
            self.base.add_vertices_processed(1);
            if let Some(value) = field(&record, self.column, self.name())?.lookup(&self.property) {
                record.push(value);
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

// ============================================================================
// ProjectOp
// ============================================================================

/// Appends a [`Composite`] whose branches are named properties of a column.
///
/// Missing properties are left out of the composite; a record whose
/// default branch is missing is dropped.
pub struct ProjectOp {
    base: OperatorBase,
    input: BoxedOperator,
    column: usize,
    names: Vec<String>,
    default_key: String,
}

impl ProjectOp {
    #[must_use]
    pub fn new<I, S>(input: BoxedOperator, column: usize, names: I, default_key: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            base: OperatorBase::new("Project"),
            input,
            column,
            names: names.into_iter().map(Into::into).collect(),
            default_key: default_key.into(),
        }
    }

    fn project(&self, source: &Value) -> Option<Composite> {
        let mut entries = Mapping::with_capacity(self.names.len());
        for name in &self.names {
            if let Some(value) = source.lookup(name) {
                entries.insert(name.as_str(), value);
            }
        }
        Composite::new(entries, Value::from(self.default_key.as_str())).ok()
    }
}

impl Operator for ProjectOp {
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
        while let Some(mut record) = self.input.next()? {
            self.base.add_vertices_processed(1);
            if let Some(composite) = self.project(field(&record, self.column, self.name())?) {
                record.push(composite);
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

// ============================================================================
// SelectOp
// ============================================================================

/// Keeps the listed columns, in the listed order.
pub struct SelectOp {
    base: OperatorBase,
    input: BoxedOperator,
    columns: Vec<usize>,
}

impl SelectOp {
    #[must_use]
    pub fn new(input: BoxedOperator, columns: Vec<usize>) -> Self {
        Self { base: OperatorBase::new("Select"), input, columns }
    }
}

impl Operator for SelectOp {
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
        let Some(record) = self.input.next()? else {
            return self.base.finish();
        };
        let mut out = Record::new();
        for &column in &self.columns {
            out.push(field(&record, column, self.base.name())?.clone());
        }
        Ok(Some(out))
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
