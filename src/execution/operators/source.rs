//! Leaf operators: vertex scans, constants and externally fed input.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::document::{materialize_vertex, SpillTable};
use crate::execution::operator::{Operator, OperatorBase, OperatorState};
use crate::execution::Record;
use crate::model::Value;
use crate::storage::MemoryStore;
use crate::Result;

// ============================================================================
// VertexScanOp
// ============================================================================

/// Materializes stored vertex documents one at a time.
///
/// Emits `[vertex, forward adjacency, backward adjacency]`. A document
/// that fails to materialize aborts the scan with its integrity fault.
pub struct VertexScanOp {
    base: OperatorBase,
    documents: Vec<serde_json::Value>,
    spill: SpillTable,
    position: usize,
}

impl VertexScanOp {
    #[must_use]
    pub fn new(documents: Vec<serde_json::Value>, spill: SpillTable) -> Self {
        Self { base: OperatorBase::new("VertexScan"), documents, spill, position: 0 }
    }

    /// Scan a snapshot of every vertex in `store`.
    #[must_use]
    pub fn from_store(store: &MemoryStore) -> Self {
        Self::new(store.vertex_documents(), store.spill_table())
    }
}

impl Operator for VertexScanOp {
    fn open(&mut self) -> Result<()> {
        if self.base.state().is_open() {
            return Ok(());
        }
        self.position = 0;
        self.base.set_open();
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Record>> {
        if !self.base.begin_next()? {
            return Ok(None);
        }
        let Some(document) = self.documents.get(self.position) else {
            return self.base.finish();
        };
        self.position += 1;

        let vertex = match materialize_vertex(document, Some(&self.spill)) {
            Ok(vertex) => Arc::new(vertex),
            Err(e) => {
                // A corrupt document ends the scan; later documents are not served.
                self.base.set_exhausted();
                return Err(e);
            }
        };
        self.base.add_vertices_processed(1);

        let (forward, backward) = (Arc::clone(&vertex.forward), Arc::clone(&vertex.backward));
        let mut record = Record::new();
        record.push(Value::Vertex(vertex));
        record.push(Value::AdjacencyList(forward));
        record.push(Value::AdjacencyList(backward));
        Ok(Some(record))
    }

    fn close(&mut self) -> Result<()> {
        self.position = 0;
        self.base.set_closed();
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.position = 0;
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
// ConstantOp
// ============================================================================

/// Emits a fixed list of records.
pub struct ConstantOp {
    base: OperatorBase,
    records: Vec<Record>,
    position: usize,
}

impl ConstantOp {
    #[must_use]
    pub fn new(records: Vec<Record>) -> Self {
        Self { base: OperatorBase::new("Constant"), records, position: 0 }
    }
}

impl Operator for ConstantOp {
    fn open(&mut self) -> Result<()> {
        if self.base.state().is_open() {
            return Ok(());
        }
        self.position = 0;
        self.base.set_open();
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Record>> {
        if !self.base.begin_next()? {
            return Ok(None);
        }
        match self.records.get(self.position) {
            Some(record) => {
                self.position += 1;
                Ok(Some(record.clone()))
            }
            None => self.base.finish(),
        }
    }

    fn close(&mut self) -> Result<()> {
        self.position = 0;
        self.base.set_closed();
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.position = 0;
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
// InputOp
// ============================================================================

/// Queue of outer rows shared between a driver and an [`InputOp`].
///
/// Clones share the same queue.
#[derive(Debug, Clone, Default)]
pub struct InputSlot {
    rows: Arc<Mutex<VecDeque<Record>>>,
}

impl InputSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, record: Record) {
        self.rows.lock().push_back(record);
    }

    pub fn feed<I: IntoIterator<Item = Record>>(&self, records: I) {
        self.rows.lock().extend(records);
    }

    pub fn clear(&self) {
        self.rows.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.lock().is_empty()
    }

    fn pop(&self) -> Option<Record> {
        self.rows.lock().pop_front()
    }
}

/// Leaf that yields whatever has been fed into its [`InputSlot`].
///
/// An empty slot ends the stream; after `reset()` newly fed rows are read.
pub struct InputOp {
    base: OperatorBase,
    slot: InputSlot,
}

impl InputOp {
    #[must_use]
    pub fn new(slot: InputSlot) -> Self {
        Self { base: OperatorBase::new("Input"), slot }
    }
}

impl Operator for InputOp {
    fn open(&mut self) -> Result<()> {
        if !self.base.state().is_open() {
            self.base.set_open();
        }
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Record>> {
        if !self.base.begin_next()? {
            return Ok(None);
        }
        match self.slot.pop() {
            Some(record) => Ok(Some(record)),
            None => self.base.finish(),
        }
    }

    fn close(&mut self) -> Result<()> {
        self.base.set_closed();
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
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
