//! Blocking aggregates: fold into a collection, fold paths into a tree.
//!
//! Both drain their input on the first `next()` and emit exactly one
//! record, even for empty input.

use crate::execution::operator::{BoxedOperator, Operator, OperatorBase, OperatorState};
use crate::execution::Record;
use crate::model::{PathTree, Value};
use crate::Result;

use super::field;

// ============================================================================
// FoldOp
// ============================================================================

/// Folds one column of every input record into a single `Collection`.
pub struct FoldOp {
    base: OperatorBase,
    input: BoxedOperator,
    column: usize,
    emitted: bool,
}

impl FoldOp {
    #[must_use]
    pub fn new(input: BoxedOperator, column: usize) -> Self {
        Self { base: OperatorBase::new("Fold"), input, column, emitted: false }
    }
}

impl Operator for FoldOp {
    fn open(&mut self) -> Result<()> {
        if self.base.state().is_open() {
            return Ok(());
        }
        self.input.open()?;
        self.emitted = false;
        self.base.set_open();
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Record>> {
        if !self.base.begin_next()? {
            return Ok(None);
        }
        if self.emitted {
            return self.base.finish();
        }

        let mut items = Vec::new();
        while let Some(record) = self.input.next()? {
            items.push(field(&record, self.column, self.base.name())?.clone());
        }
        self.base.add_vertices_processed(items.len() as u64);
        self.emitted = true;

        let mut out = Record::new();
        out.push(Value::Collection(items));
        Ok(Some(out))
    }

    fn close(&mut self) -> Result<()> {
        self.input.close()?;
        self.emitted = false;
        self.base.set_closed();
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.input.reset()?;
        self.emitted = false;
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
// TreeOp
// ============================================================================

/// Merges the path formed by `columns` of every input record into one
/// [`PathTree`].
pub struct TreeOp {
    base: OperatorBase,
    input: BoxedOperator,
    columns: Vec<usize>,
    emitted: bool,
}

impl TreeOp {
    #[must_use]
    pub fn new(input: BoxedOperator, columns: Vec<usize>) -> Self {
        Self { base: OperatorBase::new("Tree"), input, columns, emitted: false }
    }
}

impl Operator for TreeOp {
    fn open(&mut self) -> Result<()> {
        if self.base.state().is_open() {
            return Ok(());
        }
        self.input.open()?;
        self.emitted = false;
        self.base.set_open();
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Record>> {
        if !self.base.begin_next()? {
            return Ok(None);
        }
        if self.emitted {
            return self.base.finish();
        }

        let mut tree = PathTree::root();
        let mut paths = 0u64;
        while let Some(record) = self.input.next()? {
            let mut path = Vec::with_capacity(self.columns.len());
            for &column in &self.columns {
                path.push(field(&record, column, self.base.name())?.clone());
            }
            tree.insert_path(path);
            paths += 1;
        }
        self.base.add_vertices_processed(paths);
        self.emitted = true;

        let mut out = Record::new();
        out.push(tree);
        Ok(Some(out))
    }

    fn close(&mut self) -> Result<()> {
        self.input.close()?;
        self.emitted = false;
        self.base.set_closed();
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.input.reset()?;
        self.emitted = false;
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
    use crate::execution::operators::{ConstantOp, TraversalOp, ValuesOp};
    use crate::model::Direction;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fold_collects_column() {
        let names = ValuesOp::new(Box::new(modern_scan()), 0, "name");
        let mut op = FoldOp::new(Box::new(names), 3);
        let records = drain(&mut op);
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].to_string(),
            "[[vp[name->marko], vp[name->vadas], vp[name->lop], vp[name->josh], vp[name->ripple], vp[name->peter]]]"
        );
    }

    #[test]
    fn test_fold_of_nothing_is_empty_collection() {
        let mut op = FoldOp::new(Box::new(ConstantOp::new(Vec::new())), 0);
        let records = drain(&mut op);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get(0), Some(&Value::Collection(Vec::new())));
    }

    #[test]
    fn test_tree_merges_shared_prefixes() {
        let out = TraversalOp::new(Box::new(modern_scan()), 0, Direction::Outgoing);
        let mut op = TreeOp::new(Box::new(out), vec![0, 4]);
        let records = drain(&mut op);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].to_string(), "[[v[1]:[2:[], 4:[], 3:[]], v[4]:[5:[], 3:[]], v[6]:[3:[]]]]");
        assert_eq!(op.vertices_processed(), 6);
    }

    #[test]
    fn test_reset_emits_again() {
        let mut op = FoldOp::new(constant([1, 2]), 0);
        op.open().unwrap();
        assert!(op.next().unwrap().is_some());
        assert!(op.next().unwrap().is_none());
        op.reset().unwrap();
        assert_eq!(op.next().unwrap().map(|r| r.to_string()), Some("[[1, 2]]".to_string()));
    }
}
