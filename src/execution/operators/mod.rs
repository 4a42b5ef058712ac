//! Concrete operator implementations.
//!
//! # Operator Categories
//!
//! - **Sources**: [`source`] - vertex scans, constants, externally fed input
//! - **Graph**: [`graph`] - adjacency traversal, vertex lookup by id
//! - **Filter**: [`filter`] - predicate evaluation
//! - **Project**: [`project`] - property values, composites, column selection
//! - **Dedup / Limit / Sort**: [`dedup`], [`limit`], [`sort`]
//! - **Aggregate**: [`aggregate`] - fold into a collection or a path tree
//! - **Side effects**: [`side_effect`] - store into named collections
//! - **Repeat**: [`repeat`] - re-drive an inner pipeline

pub mod aggregate;
pub mod dedup;
pub mod filter;
pub mod graph;
pub mod limit;
pub mod project;
pub mod repeat;
pub mod side_effect;
pub mod sort;
pub mod source;

pub use aggregate::{FoldOp, TreeOp};
pub use dedup::DedupOp;
pub use filter::{FilterOp, Operand, Predicate};
pub use graph::{TraversalOp, VertexLookupOp};
pub use limit::LimitOp;
pub use project::{ProjectOp, SelectOp, ValuesOp};
pub use repeat::RepeatOp;
pub use side_effect::{SideEffects, StoreOp};
pub use sort::OrderOp;
pub use source::{ConstantOp, InputOp, InputSlot, VertexScanOp};

use super::Record;
use crate::model::Value;
use crate::{Error, Result};

/// Field `index` of `record`, or an execution error naming the operator.
pub(crate) fn field<'a>(record: &'a Record, index: usize, operator: &str) -> Result<&'a Value> {
    record.get(index).ok_or_else(|| {
        Error::ExecutionError(format!(
            "{operator}: column {index} out of range for record of {}",
            record.len()
        ))
    })
}
