//! Query execution: positional records pulled through operator trees.
//!
//! Pipelines are built bottom-up from [`operators`] and driven from the
//! root with `open` / `next` / `close`.

pub mod operator;
pub mod operators;
pub mod record;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::{Edge, Value, Vertex};
use crate::{Error, Result};

pub use operator::{BoxedOperator, Operator, OperatorBase, OperatorState};
pub use record::Record;

/// How final results are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One canonical string per record.
    #[default]
    Regular,
    /// A single GraphSON array.
    GraphSon,
}

/// Pull every record out of an operator tree: open, drain, close.
pub fn collect(root: &mut dyn Operator) -> Result<Vec<Record>> {
    root.open()?;
    let mut records = Vec::new();
    while let Some(record) = root.next()? {
        records.push(record);
    }
    root.close()?;
    Ok(records)
}

// ============================================================================
// Typed access to record fields
// ============================================================================

/// Convert from Value to concrete types.
pub trait FromValue: Sized {
    fn from_value(val: &Value) -> Result<Self>;
}

fn type_error(expected: &str, val: &Value) -> Error {
    Error::TypeError { expected: expected.into(), got: val.type_name().into() }
}

impl FromValue for Arc<Vertex> {
    fn from_value(val: &Value) -> Result<Self> {
        val.as_vertex().cloned().ok_or_else(|| type_error("VERTEX", val))
    }
}

impl FromValue for Arc<Edge> {
    fn from_value(val: &Value) -> Result<Self> {
        val.as_edge().cloned().ok_or_else(|| type_error("EDGE", val))
    }
}

impl FromValue for String {
    fn from_value(val: &Value) -> Result<Self> {
        match val {
            Value::Scalar(s) => Ok(s.text.clone()),
            Value::Property(p) => Ok(p.text().to_owned()),
            _ => Err(type_error("SCALAR", val)),
        }
    }
}

impl FromValue for i64 {
    fn from_value(val: &Value) -> Result<Self> {
        let text = String::from_value(val)?;
        text.parse().map_err(|_| Error::TypeError {
            expected: "integer".into(),
            got: text,
        })
    }
}

impl FromValue for f64 {
    fn from_value(val: &Value) -> Result<Self> {
        let text = String::from_value(val)?;
        text.parse().map_err(|_| Error::TypeError {
            expected: "number".into(),
            got: text,
        })
    }
}

impl FromValue for Vec<Value> {
    fn from_value(val: &Value) -> Result<Self> {
        val.as_collection().map(<[Value]>::to_vec).ok_or_else(|| type_error("COLLECTION", val))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_value() {
        assert_eq!(i64::from_value(&Value::from("42")).unwrap(), 42);
        assert_eq!(String::from_value(&Value::from(7)).unwrap(), "7");
        assert!(matches!(
            Arc::<Vertex>::from_value(&Value::from("1")),
            Err(Error::TypeError { .. })
        ));
        assert!(i64::from_value(&Value::from("abc")).is_err());
    }

    #[test]
    fn test_output_format_names() {
        let format: OutputFormat = serde_json::from_str("\"graphson\"").unwrap();
        assert_eq!(format, OutputFormat::GraphSon);
        assert_eq!(OutputFormat::default(), OutputFormat::Regular);
    }
}
