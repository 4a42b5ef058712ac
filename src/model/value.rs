//! Universal value type flowing between pipeline stages.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{keys, AdjacencyList, Edge, Mapping, PathTree, Property, Vertex};
use crate::{Error, Result};

/// JSON type a scalar was read from. Only `String` is quoted on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JsonType {
    String,
    Number,
    Boolean,
    Null,
    Object,
    Array,
}

impl JsonType {
    pub fn of(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(_) => JsonType::String,
            serde_json::Value::Number(_) => JsonType::Number,
            serde_json::Value::Bool(_) => JsonType::Boolean,
            serde_json::Value::Null => JsonType::Null,
            serde_json::Value::Object(_) => JsonType::Object,
            serde_json::Value::Array(_) => JsonType::Array,
        }
    }

    pub fn is_quoted(self) -> bool {
        matches!(self, JsonType::String)
    }
}

/// Text of a JSON value as entities keep it: strings raw, anything else as JSON text.
pub(crate) fn json_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// Scalar
// ============================================================================

/// Leaf value. Equality and hashing look at the text only.
#[derive(Debug, Clone)]
pub struct Scalar {
    pub text: String,
    pub json_type: JsonType,
}

impl Scalar {
    pub fn new(text: impl Into<String>, json_type: JsonType) -> Self {
        Self { text: text.into(), json_type }
    }

    pub fn string(text: impl Into<String>) -> Self {
        Self::new(text, JsonType::String)
    }

    pub fn from_json(value: &serde_json::Value) -> Self {
        Self::new(json_text(value), JsonType::of(value))
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.text.parse().ok()
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Scalar {}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

// ============================================================================
// Composite
// ============================================================================

/// Projection facade: a map of named branches plus the branch that stands
/// in for the whole value when rendered or compared.
#[derive(Debug, Clone)]
pub struct Composite {
    entries: Mapping,
    default_index: usize,
}

impl Composite {
    /// Fails if `default_key` has no branch in `entries`.
    pub fn new(entries: Mapping, default_key: Value) -> Result<Self> {
        let default_index = entries.get_index_of(&default_key).ok_or_else(|| {
            Error::ExecutionError(format!("composite default key {default_key} has no branch"))
        })?;
        Ok(Self { entries, default_index })
    }

    pub fn entries(&self) -> &Mapping {
        &self.entries
    }

    pub fn default_key(&self) -> &Value {
        self.default_branch().0
    }

    /// The branch this composite currently stands for.
    pub fn current(&self) -> &Value {
        self.default_branch().1
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.get(key)
    }

    fn default_branch(&self) -> (&Value, &Value) {
        self.entries
            .get_index(self.default_index)
            .expect("composite default branch is validated on construction")
    }
}

impl PartialEq for Composite {
    fn eq(&self, other: &Self) -> bool {
        self.default_key() == other.default_key() && self.entries == other.entries
    }
}

impl Eq for Composite {}

impl Hash for Composite {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.default_key().hash(state);
        self.entries.hash(state);
    }
}

// ============================================================================
// Value
// ============================================================================

/// Every datum a pipeline stage can see.
///
/// - Leaves: `Scalar`, `Property`
/// - Containers: `Collection`, `Mapping`, `Composite`, `PathTree`
/// - Graph: `Vertex`, `Edge`, `AdjacencyList`
///
/// Graph entities sit behind `Arc` so records can share them cheaply.
#[derive(Debug, Clone)]
pub enum Value {
    Scalar(Scalar),
    Collection(Vec<Value>),
    Mapping(Mapping),
    Composite(Composite),
    Property(Property),
    Edge(Arc<Edge>),
    AdjacencyList(Arc<AdjacencyList>),
    Vertex(Arc<Vertex>),
    PathTree(PathTree),
}

// ============================================================================
// Type checking
// ============================================================================

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "SCALAR",
            Value::Collection(_) => "COLLECTION",
            Value::Mapping(_) => "MAPPING",
            Value::Composite(_) => "COMPOSITE",
            Value::Property(_) => "PROPERTY",
            Value::Edge(_) => "EDGE",
            Value::AdjacencyList(_) => "ADJACENCY_LIST",
            Value::Vertex(_) => "VERTEX",
            Value::PathTree(_) => "PATH_TREE",
        }
    }

    pub fn null() -> Self {
        Value::Scalar(Scalar::new("null", JsonType::Null))
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_vertex(&self) -> Option<&Arc<Vertex>> {
        match self {
            Value::Vertex(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_edge(&self) -> Option<&Arc<Edge>> {
        match self {
            Value::Edge(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_adjacency_list(&self) -> Option<&Arc<AdjacencyList>> {
        match self {
            Value::AdjacencyList(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&[Value]> {
        match self {
            Value::Collection(items) => Some(items),
            _ => None,
        }
    }

    /// What comparison, ordering and grouping operators see.
    pub fn projected_scalar(&self) -> String {
        match self {
            Value::Scalar(s) => s.text.clone(),
            Value::Property(p) => p.text().to_owned(),
            Value::Vertex(v) => v.id.clone(),
            Value::Composite(c) => c.current().projected_scalar(),
            other => other.to_string(),
        }
    }

    /// Resolve a named attribute. Absence is `None`, never an error.
    ///
    /// `"*"` yields the vertex/edge itself; `_edge` and `_reverse_edge`
    /// yield a vertex's adjacency lists.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        match self {
            Value::Vertex(v) => match name {
                keys::SELF_REFERENCE => Some(self.clone()),
                keys::FORWARD_ADJACENCY => Some(Value::AdjacencyList(Arc::clone(&v.forward))),
                keys::BACKWARD_ADJACENCY => Some(Value::AdjacencyList(Arc::clone(&v.backward))),
                _ => v.property(name).cloned().map(Value::Property),
            },
            Value::Edge(e) => match name {
                keys::SELF_REFERENCE => Some(self.clone()),
                _ => e.property(name).cloned().map(Value::Property),
            },
            Value::Composite(c) => c
                .get(&Value::from(name))
                .cloned()
                .or_else(|| c.current().lookup(name)),
            Value::Mapping(m) => m.get(&Value::from(name)).cloned(),
            _ => None,
        }
    }

    /// Ordering on projected scalars: numeric when both sides parse as
    /// numbers, ordinal string order otherwise.
    pub fn compare(&self, other: &Value) -> Ordering {
        let (a, b) = (self.projected_scalar(), other.projected_scalar());
        match (a.parse::<f64>(), b.parse::<f64>()) {
            (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or_else(|| a.cmp(&b)),
            _ => a.cmp(&b),
        }
    }
}

// ============================================================================
// Conversions (From impls)
// ============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self { Value::Scalar(Scalar::new(v.to_string(), JsonType::Boolean)) }
}
impl From<i32> for Value {
    fn from(v: i32) -> Self { Value::Scalar(Scalar::new(v.to_string(), JsonType::Number)) }
}
impl From<i64> for Value {
    fn from(v: i64) -> Self { Value::Scalar(Scalar::new(v.to_string(), JsonType::Number)) }
}
impl From<f64> for Value {
    fn from(v: f64) -> Self {
        // Match serde_json's number text so document values and literals compare equal.
        let text = serde_json::Number::from_f64(v).map_or_else(|| v.to_string(), |n| n.to_string());
        Value::Scalar(Scalar::new(text, JsonType::Number))
    }
}
impl From<String> for Value {
    fn from(v: String) -> Self { Value::Scalar(Scalar::string(v)) }
}
impl From<&str> for Value {
    fn from(v: &str) -> Self { Value::Scalar(Scalar::string(v)) }
}
impl From<&serde_json::Value> for Value {
    fn from(v: &serde_json::Value) -> Self { Value::Scalar(Scalar::from_json(v)) }
}
impl From<Scalar> for Value {
    fn from(v: Scalar) -> Self { Value::Scalar(v) }
}
impl From<Property> for Value {
    fn from(v: Property) -> Self { Value::Property(v) }
}
impl From<Mapping> for Value {
    fn from(v: Mapping) -> Self { Value::Mapping(v) }
}
impl From<Composite> for Value {
    fn from(v: Composite) -> Self { Value::Composite(v) }
}
impl From<Edge> for Value {
    fn from(v: Edge) -> Self { Value::Edge(Arc::new(v)) }
}
impl From<Arc<Edge>> for Value {
    fn from(v: Arc<Edge>) -> Self { Value::Edge(v) }
}
impl From<AdjacencyList> for Value {
    fn from(v: AdjacencyList) -> Self { Value::AdjacencyList(Arc::new(v)) }
}
impl From<Vertex> for Value {
    fn from(v: Vertex) -> Self { Value::Vertex(Arc::new(v)) }
}
impl From<Arc<Vertex>> for Value {
    fn from(v: Arc<Vertex>) -> Self { Value::Vertex(v) }
}
impl From<PathTree> for Value {
    fn from(v: PathTree) -> Self { Value::PathTree(v) }
}
impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self { Value::Collection(v.into_iter().map(Into::into).collect()) }
}

// ============================================================================
// Display (canonical rendering)
// ============================================================================

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(s) => write!(f, "{s}"),
            Value::Collection(items) => {
                write!(f, "[")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Value::Mapping(m) => write!(f, "{m}"),
            Value::Composite(c) => write!(f, "{}", c.current()),
            Value::Property(p) => write!(f, "{p}"),
            Value::Edge(e) => write!(f, "{e}"),
            Value::AdjacencyList(a) => write!(f, "{a}"),
            Value::Vertex(v) => write!(f, "{v}"),
            Value::PathTree(t) => write!(f, "{t}"),
        }
    }
}

// ============================================================================
// Structural equality and hashing
// ============================================================================

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Scalar(a), Value::Scalar(b)) => a == b,
            (Value::Collection(a), Value::Collection(b)) => a == b,
            (Value::Mapping(a), Value::Mapping(b)) => a == b,
            (Value::Composite(a), Value::Composite(b)) => a == b,
            (Value::Property(a), Value::Property(b)) => a == b,
            (Value::Edge(a), Value::Edge(b)) => a == b,
            (Value::AdjacencyList(a), Value::AdjacencyList(b)) => a == b,
            (Value::Vertex(a), Value::Vertex(b)) => a == b,
            (Value::PathTree(a), Value::PathTree(b)) => a == b,
            // Incomparable variants are simply unequal.
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(self).hash(state);
        match self {
            Value::Scalar(s) => s.hash(state),
            Value::Collection(items) => items.hash(state),
            Value::Mapping(m) => m.hash(state),
            Value::Composite(c) => c.hash(state),
            Value::Property(p) => p.hash(state),
            Value::Edge(e) => e.hash(state),
            Value::AdjacencyList(a) => a.hash(state),
            Value::Vertex(v) => v.hash(state),
            Value::PathTree(t) => t.hash(state),
        }
    }
}
