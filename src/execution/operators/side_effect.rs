//! Side-effect collections and the store operator.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::execution::operator::{BoxedOperator, Operator, OperatorBase, OperatorState};
use crate::execution::Record;
use crate::model::Value;
use crate::Result;

use super::field;

/// Named collections written by pipelines and read after (or during) a run.
///
/// Clones share the same collections.
#[derive(Debug, Clone, Default)]
pub struct SideEffects {
    inner: Arc<RwLock<IndexMap<String, Vec<Value>>>>,
}

impl SideEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, key: &str, value: Value) {
        self.inner.write().entry(key.to_owned()).or_default().push(value);
    }

    /// The collection under `key`, as a `Collection` value.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.read().get(key).map(|items| Value::Collection(items.clone()))
    }

    pub fn len(&self, key: &str) -> usize {
        self.inner.read().get(key).map_or(0, Vec::len)
    }

    pub fn keys(&self) -> Vec<String> {
        self.inner.read().keys().cloned().collect()
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }
}

/// Appends a column value to a side-effect collection and passes the
/// record through unchanged.
pub struct StoreOp {
    base: OperatorBase,
    input: BoxedOperator,
    column: usize,
    key: String,
    effects: SideEffects,
}

impl StoreOp {
    #[must_use]
    pub fn new(input: BoxedOperator, column: usize, key: impl Into<String>, effects: SideEffects) -> Self {
        Self { base: OperatorBase::new("Store"), input, column, key: key.into(), effects }
    }
}

impl Operator for StoreOp {
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
        self.base.add_vertices_processed(1);
        let value = field(&record, self.column, self.base.name())?.clone();
        self.effects.append(&self.key, value);
        Ok(Some(record))
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
