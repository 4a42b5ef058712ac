//! Graph operators: adjacency traversal and vertex lookup.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::execution::operator::{BoxedOperator, Operator, OperatorBase, OperatorState};
use crate::execution::{FromValue, Record};
use crate::model::{AdjacencyList, Direction, Edge, Value, Vertex};
use crate::storage::Connection;
use crate::Result;

use super::field;

// ============================================================================
// TraversalOp
// ============================================================================

/// Follows the adjacency of a vertex column.
///
/// For every incident edge (optionally restricted to one label) emits the
/// input fields followed by `[edge, counterpart vertex id]`. Edges come out
/// in ascending offset order, outgoing before incoming for
/// [`Direction::Both`].
///
/// When a connection is attached and the store does not mirror backward
/// edges, incoming adjacency is fetched through it instead of being read
/// from the vertex.
pub struct TraversalOp {
    base: OperatorBase,
    input: BoxedOperator,
    column: usize,
    direction: Direction,
    label: Option<String>,
    connection: Option<Arc<dyn Connection>>,
    pending: VecDeque<Record>,
}

impl TraversalOp {
    #[must_use]
    pub fn new(input: BoxedOperator, column: usize, direction: Direction) -> Self {
        Self {
            base: OperatorBase::new("Traversal"),
            input,
            column,
            direction,
            label: None,
            connection: None,
            pending: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_connection(mut self, connection: Arc<dyn Connection>) -> Self {
        self.connection = Some(connection);
        self
    }

    fn backward(&self, vertex: &Vertex) -> Result<Arc<AdjacencyList>> {
        match &self.connection {
            Some(conn) if !conn.mirrors_backward_edges() => {
                Ok(Arc::new(conn.fetch_backward_adjacency(&vertex.id)?))
            }
            _ => Ok(Arc::clone(&vertex.backward)),
        }
    }

    fn expand(&mut self, record: Record) -> Result<()> {
        let vertex = Arc::<Vertex>::from_value(field(&record, self.column, self.name())?)?;
        self.base.add_vertices_processed(1);

        if matches!(self.direction, Direction::Outgoing | Direction::Both) {
            let forward = Arc::clone(&vertex.forward);
            self.emit(&record, &forward, Edge::sink_id);
        }
        if matches!(self.direction, Direction::Incoming | Direction::Both) {
            let backward = self.backward(&vertex)?;
            self.emit(&record, &backward, Edge::source_id);
        }
        Ok(())
    }

    fn emit(&mut self, record: &Record, list: &AdjacencyList, counterpart: fn(&Edge) -> Option<&str>) {
        let label = self.label.as_deref();
        for edge in list.edges() {
            if label.is_some_and(|l| edge.label.as_deref() != Some(l)) {
                continue;
            }
            let mut out = record.clone();
            out.push(Value::Edge(Arc::clone(edge)));
            out.push(counterpart(edge).map_or_else(Value::null, Value::from));
            self.pending.push_back(out);
        }
    }
}

impl Operator for TraversalOp {
    fn open(&mut self) -> Result<()> {
        if self.base.state().is_open() {
            return Ok(());
        }
        self.input.open()?;
        self.pending.clear();
        self.base.set_open();
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Record>> {
        if !self.base.begin_next()? {
            return Ok(None);
        }
        loop {
            if let Some(record) = self.pending.pop_front() {
                return Ok(Some(record));
            }
            match self.input.next()? {
                Some(record) => self.expand(record)?,
                None => return self.base.finish(),
            }
        }
    }

    fn close(&mut self) -> Result<()> {
        self.input.close()?;
        self.pending.clear();
        self.base.set_closed();
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.input.reset()?;
        self.pending.clear();
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
// VertexLookupOp
// ============================================================================

/// Resolves a vertex id column through the connection and appends the vertex.
///
/// Ids with no stored vertex are dropped.
pub struct VertexLookupOp {
    base: OperatorBase,
    input: BoxedOperator,
    column: usize,
    connection: Arc<dyn Connection>,
}

impl VertexLookupOp {
    #[must_use]
    pub fn new(input: BoxedOperator, column: usize, connection: Arc<dyn Connection>) -> Self {
        Self { base: OperatorBase::new("VertexLookup"), input, column, connection }
    }
}

impl Operator for VertexLookupOp {
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
            let id = String::from_value(field(&record, self.column, self.name())?)?;
            match self.connection.fetch_vertex(&id)? {
                Some(vertex) => {
                    self.base.add_vertices_processed(1);
                    record.push(vertex);
                    return Ok(Some(record));
                }
                None => tracing::trace!(vertex_id = %id, "lookup found no vertex"),
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
