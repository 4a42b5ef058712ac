//! Repeat operator: runs an inner pipeline a fixed number of times.

use std::collections::VecDeque;

use crate::execution::operator::{BoxedOperator, Operator, OperatorBase, OperatorState};
use crate::execution::Record;
use crate::Result;

use super::InputSlot;

/// Re-drives `inner` `times` times, feeding each round's output back in.
///
/// `inner` must read from an [`InputOp`](super::InputOp) bound to `slot`
/// and produce records of the same shape it consumes. Before every round
/// the slot is refilled and `inner` is `reset()`. Blocking: the input is
/// drained first and the last round's output is emitted.
pub struct RepeatOp {
    base: OperatorBase,
    input: BoxedOperator,
    inner: BoxedOperator,
    slot: InputSlot,
    times: usize,
    output: Option<VecDeque<Record>>,
}

impl RepeatOp {
    #[must_use]
    pub fn new(input: BoxedOperator, inner: BoxedOperator, slot: InputSlot, times: usize) -> Self {
        Self { base: OperatorBase::new("Repeat"), input, inner, slot, times, output: None }
    }

    fn run(&mut self) -> Result<VecDeque<Record>> {
        let mut current = Vec::new();
        while let Some(record) = self.input.next()? {
            current.push(record);
        }
        self.base.add_vertices_processed(current.len() as u64);

        for round in 0..self.times {
            self.slot.clear();
            self.slot.feed(current.drain(..));
            self.inner.reset()?;
            while let Some(record) = self.inner.next()? {
                current.push(record);
            }
            tracing::trace!(round, records = current.len(), "repeat round finished");
        }
        Ok(current.into())
    }
}

impl Operator for RepeatOp {
    fn open(&mut self) -> Result<()> {
        if self.base.state().is_open() {
            return Ok(());
        }
        self.input.open()?;
        self.inner.open()?;
        self.output = None;
        self.base.set_open();
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Record>> {
        if !self.base.begin_next()? {
            return Ok(None);
        }
        if self.output.is_none() {
            self.output = Some(self.run()?);
        }
        match self.output.as_mut().and_then(VecDeque::pop_front) {
            Some(record) => Ok(Some(record)),
            None => self.base.finish(),
        }
    }

    fn close(&mut self) -> Result<()> {
        self.input.close()?;
        self.inner.close()?;
        self.slot.clear();
        self.output = None;
        self.base.set_closed();
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.input.reset()?;
        self.inner.reset()?;
        self.slot.clear();
        self.output = None;
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::operators::test_util::*;
    use crate::execution::operators::{
        FilterOp, InputOp, Operand, Predicate, SelectOp, TraversalOp, VertexLookupOp,
    };
    use crate::model::Direction;
    use crate::storage::{Connection, MemoryStore};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    /// `[vertex]` → `[out-neighbour vertex]`, one hop.
    fn out_hop(slot: &InputSlot, conn: Arc<dyn Connection>) -> BoxedOperator {
        let input = InputOp::new(slot.clone());
        let out = TraversalOp::new(Box::new(input), 0, Direction::Outgoing);
        let lookup = VertexLookupOp::new(Box::new(out), 2, conn);
        Box::new(SelectOp::new(Box::new(lookup), vec![3]))
    }

    fn store() -> Arc<dyn Connection> {
        let store = MemoryStore::new();
        for doc in modern_documents() {
            store.insert_vertex(doc).unwrap();
        }
        Arc::new(store)
    }

    fn marko() -> BoxedOperator {
        let only_marko = FilterOp::new(
            Predicate::Eq(Operand::property(0, "name"), Operand::constant("marko")),
            Box::new(modern_scan()),
        );
        Box::new(SelectOp::new(Box::new(only_marko), vec![0]))
    }

    #[test]
    fn test_two_hops() {
        let slot = InputSlot::new();
        let inner = out_hop(&slot, store());
        let mut op = RepeatOp::new(marko(), inner, slot, 2);
        // marko → {vadas, josh, lop} → josh → {ripple, lop}
        assert_eq!(column0(&drain(&mut op)), vec!["v[5]", "v[3]"]);
    }

    #[test]
    fn test_zero_times_is_identity() {
        let slot = InputSlot::new();
        let inner = out_hop(&slot, store());
        let mut op = RepeatOp::new(marko(), inner, slot, 0);
        assert_eq!(column0(&drain(&mut op)), vec!["v[1]"]);
    }

    #[test]
    fn test_close_open_replays() {
        let slot = InputSlot::new();
        let inner = out_hop(&slot, store());
        let mut op = RepeatOp::new(marko(), inner, slot, 1);
        let first = column0(&drain(&mut op));
        let second = column0(&drain(&mut op));
        assert_eq!(first, vec!["v[2]", "v[4]", "v[3]"]);
        assert_eq!(first, second);
    }
}
